use thiserror::Error;

/// Errors from static reference data (the move database).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("malformed move database: {0}")]
    MalformedDatabase(String),
}

/// State-invariant violations. Per-turn validation failures (unknown move,
/// exhausted PP) are *not* errors: the resolver reports them as turn-log
/// events and the turn proceeds as a no-op for that side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("battle {battle_id} is already finished")]
    BattleFinished { battle_id: String },
    #[error("malformed battle state: {0}")]
    MalformedState(String),
    #[error("agent level {0} outside the 1-100 band")]
    InvalidLevel(u8),
}

pub type DataResult<T> = Result<T, DataError>;
pub type BattleResult<T> = Result<T, BattleError>;
