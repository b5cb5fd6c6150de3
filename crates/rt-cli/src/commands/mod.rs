pub mod clear;
pub mod compare;
pub mod record;
pub mod roll;
pub mod show;
pub mod summary;

use std::path::{Path, PathBuf};

use colored::Colorize;
use rt_tracker::{
    DiceGroup, Die, JsonFileFlagStore, RecordOutcome, RollEvent, RollTracker, StatsStore,
    TrackerConfig, TrackerEvent, User, Visibility,
};
use tokio::sync::broadcast;
use tracing::debug;

use crate::Identity;

/// Store location and configuration shared by every command.
pub struct Context {
    dir: PathBuf,
    config: TrackerConfig,
}

impl Context {
    /// Read the optional JSON config and remember the store directory.
    pub fn load(dir: &Path, config: Option<&Path>) -> Result<Self, String> {
        let config: TrackerConfig = match config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
                serde_json::from_str(&text)
                    .map_err(|e| format!("invalid config {}: {e}", path.display()))?
            }
            None => TrackerConfig::default(),
        };
        debug!(dir = %dir.display(), system = %config.system, "loaded tracker config");
        Ok(Self {
            dir: dir.to_path_buf(),
            config,
        })
    }

    /// A tracker acting for `local`, backed by the flag directory.
    pub fn tracker(&self, local: User) -> RollTracker<JsonFileFlagStore> {
        RollTracker::new(
            local,
            self.config.clone(),
            StatsStore::new(JsonFileFlagStore::new(&self.dir)),
        )
    }
}

/// A user with the GM role when `gm` is set.
pub fn user_with_role(id: &str, gm: bool) -> User {
    if gm { User::gm(id) } else { User::player(id) }
}

/// The user running the command, defaulting to `default_user`.
pub fn acting_user(identity: &Identity, default_user: &str) -> User {
    let id = identity.acting.as_deref().unwrap_or(default_user);
    user_with_role(id, identity.gm)
}

/// The user who made a roll. `--gm` describes the acting user, so it only
/// applies when that is the roller; `roller_gm` always does.
pub fn roller(identity: &Identity, user: &str, roller_gm: bool) -> User {
    let is_acting = identity.acting.as_deref().is_none_or(|id| id == user);
    let gm = roller_gm || (is_acting && identity.gm);
    user_with_role(user, gm)
}

/// Parse `key=value` tags.
pub fn parse_tags(tags: &[String]) -> Result<Vec<(String, String)>, String> {
    tags.iter()
        .map(|tag| {
            tag.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| format!("invalid tag '{tag}' (expected KEY=VALUE)"))
        })
        .collect()
}

/// Parse `d20:5,17`, `d6:3` or a bare `12` (a d20) into a dice group.
pub fn parse_dice(spec: &str) -> Result<DiceGroup, String> {
    let (die, values) = match spec.split_once(':') {
        Some((die, values)) => {
            let die = Die::from_str_tag(die).ok_or_else(|| format!("unknown die '{die}'"))?;
            (die, values)
        }
        None => (Die::D20, spec),
    };

    let results = values
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid result '{v}' in '{spec}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DiceGroup::new(die, results))
}

/// Record an event and print what happened.
pub async fn record_and_report(
    tracker: &RollTracker<JsonFileFlagStore>,
    event: &RollEvent,
) -> Result<(), String> {
    let mut notices = tracker.subscribe();
    let outcome = tracker.record(event).await.map_err(|e| e.to_string())?;

    match outcome {
        RecordOutcome::NotOwnRoll => {
            println!(
                "  Roll belongs to {}; not recorded for {}.",
                event.roller.id,
                tracker.local_user().id
            );
        }
        RecordOutcome::Filtered { failed } => {
            println!(
                "  Roll not counted {}",
                format!("(failed: {})", failed.join(", ")).dimmed()
            );
        }
        RecordOutcome::Recorded {
            counted,
            skipped,
            stats,
        } => {
            println!(
                "  Recorded {counted} d20 result{} for {} ({} total)",
                if counted == 1 { "" } else { "s" },
                event.roller.id.to_string().bold(),
                stats.count()
            );
            if skipped > 0 {
                println!(
                    "  {}",
                    format!("Skipped {skipped} invalid result(s)").yellow()
                );
            }
        }
    }

    print_streaks(&mut notices);
    Ok(())
}

fn print_streaks(notices: &mut broadcast::Receiver<TrackerEvent>) {
    while let Ok(event) = notices.try_recv() {
        if let TrackerEvent::StreakReached {
            user,
            face,
            length,
            visibility,
        } = event
        {
            let audience = match visibility {
                Visibility::Everyone => "",
                Visibility::GmOnly => " (GM only)",
            };
            println!(
                "  {} {user} rolled {face} {length} times in a row{}",
                "Streak!".bold().magenta(),
                audience.dimmed()
            );
        }
    }
}
