//! The roll tracker service.
//!
//! A `RollTracker` acts for exactly one local identity. It classifies
//! incoming roll events, applies qualifying d20 results to that identity's
//! statistics under a per-user lock, persists them, and broadcasts
//! [`TrackerEvent`]s for the presentation layer.

use std::collections::HashMap;
use std::sync::Arc;

use rt_core::RollStats;
use tokio::sync::{Mutex, broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::access;
use crate::animation::{DiceAnimation, NoAnimation};
use crate::classifier::{Admission, RollClassifier};
use crate::config::{StreakBehaviour, TrackerConfig};
use crate::error::{TrackerError, TrackerResult};
use crate::event::{RollEvent, TrackerEvent, Visibility};
use crate::store::{FlagStore, StatsStore};
use crate::summary::{Comparison, Summary};
use crate::user::{User, UserId};

const EVENT_CAPACITY: usize = 64;

/// What happened to a roll event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The roll belongs to another user and was left alone.
    NotOwnRoll,
    /// The classifier rejected the roll.
    Filtered {
        /// Names of the failed checks.
        failed: Vec<&'static str>,
    },
    /// The roll was processed.
    Recorded {
        /// d20 results added to the statistics.
        counted: usize,
        /// d20 results skipped because they were out of range or their
        /// counter was full.
        skipped: usize,
        /// Statistics after the update.
        stats: RollStats,
    },
}

/// Tracks d20 statistics for the local user.
pub struct RollTracker<F> {
    local: User,
    config: TrackerConfig,
    classifier: RollClassifier,
    store: StatsStore<F>,
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
    events: broadcast::Sender<TrackerEvent>,
    animation: Arc<dyn DiceAnimation>,
}

impl<F: FlagStore> RollTracker<F> {
    /// Create a tracker acting for `local`.
    pub fn new(local: User, config: TrackerConfig, store: StatsStore<F>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            local,
            classifier: RollClassifier::new(&config),
            config,
            store,
            locks: Mutex::new(HashMap::new()),
            events,
            animation: Arc::new(NoAnimation),
        }
    }

    /// Delay streak announcements until the host's dice animation finishes.
    pub fn with_animation(mut self, animation: Arc<dyn DiceAnimation>) -> Self {
        self.animation = animation;
        self
    }

    /// The identity this tracker acts for.
    pub fn local_user(&self) -> &User {
        &self.local
    }

    /// The active configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The statistics store.
    pub fn store(&self) -> &StatsStore<F> {
        &self.store
    }

    /// Subscribe to tracker notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events.subscribe()
    }

    /// Classify a roll event and record its d20 results for the local user.
    pub async fn record(&self, event: &RollEvent) -> TrackerResult<RecordOutcome> {
        if event.roller.id != self.local.id {
            debug!(
                message_id = %event.message_id,
                roller = %event.roller.id,
                "ignoring roll made by another user"
            );
            return Ok(RecordOutcome::NotOwnRoll);
        }

        if let Admission::Rejected { failed } = self.classifier.admit(event) {
            debug!(message_id = %event.message_id, ?failed, "roll not counted");
            return Ok(RecordOutcome::Filtered { failed });
        }

        let user = &self.local.id;
        let (stats, counted, skipped, crossed) = {
            let lock = self.lock_for(user).await;
            let _guard = lock.lock().await;

            let mut stats = self.store.read(user).await?;
            let threshold = self.config.effective_streak_threshold();
            let mut counted = 0;
            let mut skipped = 0;
            let mut crossed = false;
            for roll in &event.rolls {
                for value in RollClassifier::countable_results(roll) {
                    match stats.update(value) {
                        Ok(()) => {
                            counted += 1;
                            // reset when a new run starts, set when this
                            // message carries the run to the threshold
                            match stats.streak().count() {
                                1 => crossed = false,
                                n if n == threshold => crossed = true,
                                _ => {}
                            }
                        }
                        Err(e) => {
                            warn!(message_id = %event.message_id, error = %e, "skipping die result");
                            skipped += 1;
                        }
                    }
                }
            }
            if counted > 0 {
                self.store.write(user, &stats).await?;
            }
            (stats, counted, skipped, crossed)
        };

        if counted > 0 {
            self.publish(TrackerEvent::StatsChanged {
                user: user.clone(),
                count: stats.count(),
                streak: stats.streak().to_snapshot(),
            });
            if crossed {
                self.announce_streak(event, &stats).await;
            }
        }

        Ok(RecordOutcome::Recorded {
            counted,
            skipped,
            stats,
        })
    }

    /// Record events from the host until the channel closes.
    ///
    /// Failures are logged and broadcast as [`TrackerEvent::RecordFailed`];
    /// processing continues with the next event.
    pub async fn run(&self, mut events: mpsc::Receiver<RollEvent>) {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.record(&event).await {
                error!(message_id = %event.message_id, error = %e, "failed to record roll");
                self.publish(TrackerEvent::RecordFailed {
                    message_id: event.message_id.clone(),
                    error: e.to_string(),
                });
            }
        }
        debug!("roll event channel closed");
    }

    /// Read a user's statistics on behalf of `viewer`.
    pub async fn stats(&self, viewer: &User, target: &UserId) -> TrackerResult<RollStats> {
        self.ensure(access::can_view(&self.config, viewer, target), viewer, target)?;
        Ok(self.store.read(target).await?)
    }

    /// Remove a user's statistics on behalf of `requester`.
    pub async fn clear(&self, requester: &User, target: &UserId) -> TrackerResult<()> {
        self.ensure(access::can_clear(requester, target), requester, target)?;

        {
            let lock = self.lock_for(target).await;
            let _guard = lock.lock().await;
            self.store.clear(target).await?;
        }

        info!(user = %target, by = %requester.id, "cleared roll stats");
        self.publish(TrackerEvent::StatsCleared {
            user: target.clone(),
        });
        Ok(())
    }

    /// A shareable summary of a user's statistics.
    pub async fn summary(&self, viewer: &User, target: &UserId) -> TrackerResult<Summary> {
        let stats = self.stats(viewer, target).await?;
        Ok(Summary::from_stats(target.clone(), &stats))
    }

    /// Compare several users' statistics. Every target must be viewable.
    pub async fn compare(&self, viewer: &User, targets: &[UserId]) -> TrackerResult<Comparison> {
        let mut entries = Vec::with_capacity(targets.len());
        for target in targets {
            entries.push((target.clone(), self.stats(viewer, target).await?));
        }
        Ok(Comparison::of(&entries))
    }

    fn ensure(&self, allowed: bool, requester: &User, target: &UserId) -> TrackerResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(TrackerError::NotPermitted {
                requester: requester.id.clone(),
                target: target.clone(),
            })
        }
    }

    async fn lock_for(&self, user: &UserId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(user.clone()).or_default())
    }

    /// Announce the current streak, which reached the threshold during
    /// `event`. Longer runs of the same streak are not announced again.
    async fn announce_streak(&self, event: &RollEvent, stats: &RollStats) {
        let streak = stats.streak();
        let Some(face) = streak.last() else {
            return;
        };

        let visibility = match self.config.streak_behaviour {
            StreakBehaviour::Disable => return,
            StreakBehaviour::Hidden => Visibility::GmOnly,
            StreakBehaviour::Shown if event.blind => Visibility::GmOnly,
            StreakBehaviour::Shown => Visibility::Everyone,
        };

        if event.content_visible {
            self.animation.wait_for(&event.message_id).await;
        }

        self.publish(TrackerEvent::StreakReached {
            user: self.local.id.clone(),
            face,
            length: streak.count(),
            visibility,
        });
    }

    fn publish(&self, event: TrackerEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}
