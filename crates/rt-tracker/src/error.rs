//! Error types for the tracker.

use rt_core::StatsError;
use thiserror::Error;

use crate::user::UserId;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while reading or writing persisted flags.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted snapshot describes an impossible state.
    #[error("{0}")]
    Stats(#[from] StatsError),

    /// A flag could not be encoded or decoded as JSON.
    #[error("invalid flag data: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backing file system failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the operation.
    #[error("store error: {0}")]
    Backend(String),
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors surfaced by the tracker service.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Persistence failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The requesting user may not see or change the target's statistics.
    #[error("{requester} is not permitted to access roll stats for {target}")]
    NotPermitted {
        /// The user making the request.
        requester: UserId,
        /// The user whose statistics were requested.
        target: UserId,
    },
}
