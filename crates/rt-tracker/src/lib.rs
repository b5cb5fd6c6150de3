//! Roll tracking for a virtual-tabletop host.
//!
//! Receives typed roll events, decides which d20 results count under the
//! active [`TrackerConfig`], and accumulates them into per-user
//! [`rt_core::RollStats`] persisted through a [`FlagStore`]. Read-modify-write
//! cycles are serialised per user so concurrent rolls never lose an update.

pub mod access;
pub mod animation;
pub mod classifier;
pub mod config;
pub mod error;
pub mod event;
pub mod store;
pub mod summary;
pub mod tracker;
pub mod user;

pub use animation::{AnimationSignal, DiceAnimation, NoAnimation};
pub use classifier::{Admission, RollClassifier};
pub use config::{GameSystem, StreakBehaviour, TrackerConfig};
pub use error::{StoreError, StoreResult, TrackerError, TrackerResult};
pub use event::{DiceGroup, Die, MessageId, Roll, RollContext, RollEvent, TrackerEvent, Visibility};
pub use store::{FlagStore, JsonFileFlagStore, MemoryFlagStore, StatsStore};
pub use summary::{Comparison, Leader, Summary};
pub use tracker::{RecordOutcome, RollTracker};
pub use user::{Role, User, UserId};
