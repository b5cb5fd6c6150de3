//! Roll statistics engine for Rolltrack.
//!
//! Tracks a per-user histogram of d20 outcomes together with the current
//! streak of identical results, and derives mean, median, mode and
//! percentage breakdowns from it. Snapshots give the plain persisted form
//! stored by the host.

pub mod error;
pub mod stats;
pub mod streak;

pub use error::{StatsError, StatsResult};
pub use stats::{FACES, Mode, RollStats, RollStatsSnapshot};
pub use streak::{Streak, StreakSnapshot};
