//! Consecutive-result streak tracking.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// The run of identical face values at the end of a user's roll history.
///
/// `count` is zero exactly when no value has been recorded yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streak {
    last: Option<u32>,
    count: u32,
}

/// Persisted form of a [`Streak`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSnapshot {
    /// Last recorded face value, `null` when nothing was recorded.
    pub last: Option<u32>,
    /// Number of consecutive results equal to `last`.
    pub count: u32,
}

impl Streak {
    /// Create an empty streak.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently recorded value.
    pub fn last(&self) -> Option<u32> {
        self.last
    }

    /// How many consecutive updates matched [`Streak::last`].
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether nothing has been recorded since creation or the last clear.
    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    /// The streak length after recording `value`, or `None` on overflow.
    pub fn next_count(&self, value: u32) -> Option<u32> {
        if self.last == Some(value) {
            self.count.checked_add(1)
        } else {
            Some(1)
        }
    }

    /// Record a value, extending the streak or starting a new one.
    ///
    /// A streak already at `u32::MAX` stays there.
    pub fn update(&mut self, value: u32) {
        if self.last == Some(value) {
            self.count = self.count.saturating_add(1);
        } else {
            self.last = Some(value);
            self.count = 1;
        }
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        self.last = None;
        self.count = 0;
    }

    /// Produce the persisted `{last, count}` pair.
    pub fn to_snapshot(&self) -> StreakSnapshot {
        StreakSnapshot {
            last: self.last,
            count: self.count,
        }
    }

    /// Restore a streak from its persisted form.
    ///
    /// Rejects pairs where `count` and `last` disagree about emptiness.
    pub fn from_snapshot(snapshot: StreakSnapshot) -> StatsResult<Self> {
        match (snapshot.last, snapshot.count) {
            (None, 0) => Ok(Self::new()),
            (Some(_), 0) => Err(StatsError::MalformedSnapshot(
                "streak has a last value but a count of 0".to_string(),
            )),
            (None, n) => Err(StatsError::MalformedSnapshot(format!(
                "streak has a count of {n} but no last value"
            ))),
            (Some(last), count) => Ok(Self {
                last: Some(last),
                count,
            }),
        }
    }
}

impl std::fmt::Display for Streak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last {
            Some(last) => write!(f, "{last} x{}", self.count),
            None => write!(f, "none"),
        }
    }
}
