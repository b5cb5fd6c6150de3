//! Waiting for the host's dice animation before announcing results.
//!
//! Only notifications are delayed; statistics are persisted before any
//! wait begins.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use crate::event::MessageId;

/// Something that knows when a message's dice animation has finished.
#[async_trait]
pub trait DiceAnimation: Send + Sync {
    /// Resolve once the animation for `message_id` has completed.
    async fn wait_for(&self, message_id: &MessageId);
}

/// For hosts without dice animations: never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnimation;

#[async_trait]
impl DiceAnimation for NoAnimation {
    async fn wait_for(&self, _message_id: &MessageId) {}
}

/// Animation gate driven by the host reporting completed messages.
///
/// Completions that arrive before anyone waits are remembered, so the order
/// of `complete` and `wait_for` does not matter.
#[derive(Debug, Default)]
pub struct AnimationSignal {
    completed: Mutex<HashSet<MessageId>>,
    notify: Notify,
}

impl AnimationSignal {
    /// Create a signal with no completed animations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that the animation for `message_id` finished.
    pub async fn complete(&self, message_id: MessageId) {
        self.completed.lock().await.insert(message_id);
        self.notify.notify_waiters();
    }
}

#[async_trait]
impl DiceAnimation for AnimationSignal {
    async fn wait_for(&self, message_id: &MessageId) {
        loop {
            let notified = self.notify.notified();
            if self.completed.lock().await.remove(message_id) {
                return;
            }
            notified.await;
        }
    }
}
