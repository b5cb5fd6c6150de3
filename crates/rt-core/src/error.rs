//! Error types for the statistics engine.

/// Errors that can occur while updating or restoring roll statistics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// A face value outside 1..=20 was recorded.
    #[error("face value {0} is out of range (expected 1-20)")]
    FaceOutOfRange(u32),

    /// Recording another `face` would overflow its counter.
    #[error("counter for face value {0} is full")]
    CounterOverflow(u32),

    /// A persisted snapshot does not describe a reachable state.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

/// Convenience result type for statistics operations.
pub type StatsResult<T> = Result<T, StatsError>;
