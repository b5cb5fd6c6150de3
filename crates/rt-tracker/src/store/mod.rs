//! Persistence of roll statistics as per-user flags.
//!
//! The host owns storage; the tracker only sees a namespaced key-value
//! interface ([`FlagStore`]). [`StatsStore`] layers the roll-stats record on
//! top of it.

pub mod file;
pub mod memory;

pub use file::JsonFileFlagStore;
pub use memory::MemoryFlagStore;

use async_trait::async_trait;
use rt_core::{RollStats, RollStatsSnapshot};
use serde_json::Value;
use tracing::warn;

use crate::error::StoreResult;
use crate::user::UserId;

/// Namespace under which all tracker flags live.
pub const FLAG_SCOPE: &str = "roll-tracker";

/// Key of the roll statistics flag.
pub const ROLL_STATS_FLAG: &str = "roll-stats";

/// A namespaced JSON record store attached to users.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read a flag, `None` when it was never set.
    async fn get_flag(&self, user: &UserId, scope: &str, key: &str) -> StoreResult<Option<Value>>;

    /// Write a flag, replacing any previous value.
    async fn set_flag(&self, user: &UserId, scope: &str, key: &str, value: Value)
    -> StoreResult<()>;

    /// Remove a flag. Removing a missing flag is not an error.
    async fn unset_flag(&self, user: &UserId, scope: &str, key: &str) -> StoreResult<()>;

    /// Every user that currently has at least one flag.
    async fn users(&self) -> StoreResult<Vec<UserId>>;
}

/// Reads and writes [`RollStats`] snapshots through a [`FlagStore`].
#[derive(Debug, Clone, Default)]
pub struct StatsStore<F> {
    flags: F,
}

impl<F: FlagStore> StatsStore<F> {
    /// Wrap a flag store.
    pub fn new(flags: F) -> Self {
        Self { flags }
    }

    /// The underlying flag store.
    pub fn flags(&self) -> &F {
        &self.flags
    }

    /// Load a user's statistics, zero-state when nothing is stored.
    pub async fn read(&self, user: &UserId) -> StoreResult<RollStats> {
        let Some(value) = self.flags.get_flag(user, FLAG_SCOPE, ROLL_STATS_FLAG).await? else {
            return Ok(RollStats::new());
        };
        let snapshot: RollStatsSnapshot = serde_json::from_value(value)?;
        Ok(RollStats::from_snapshot(snapshot)?)
    }

    /// Persist a user's statistics, overwriting the previous snapshot.
    pub async fn write(&self, user: &UserId, stats: &RollStats) -> StoreResult<()> {
        let value = serde_json::to_value(stats.to_snapshot())?;
        self.flags
            .set_flag(user, FLAG_SCOPE, ROLL_STATS_FLAG, value)
            .await
    }

    /// Remove a user's statistics entirely.
    pub async fn clear(&self, user: &UserId) -> StoreResult<()> {
        self.flags.unset_flag(user, FLAG_SCOPE, ROLL_STATS_FLAG).await
    }

    /// Users with stored statistics.
    ///
    /// Entries whose flags cannot be read are not flag documents of ours
    /// (a stray config file next to the store, say) and are skipped.
    pub async fn users(&self) -> StoreResult<Vec<UserId>> {
        let mut tracked = Vec::new();
        for user in self.flags.users().await? {
            match self.flags.get_flag(&user, FLAG_SCOPE, ROLL_STATS_FLAG).await {
                Ok(Some(_)) => tracked.push(user),
                Ok(None) => {}
                Err(e) => warn!(%user, error = %e, "skipping unreadable flag document"),
            }
        }
        Ok(tracked)
    }
}
