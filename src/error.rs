use thiserror::Error;

use crate::types::TeamId;

/// The only failures that cross the engine boundary. Everything else is
/// absorbed into per-component `insufficient_data` diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Preflight validation failed; install a complete snapshot or change
    /// the request.
    #[error("snapshot not ready: {0}")]
    NotReady(String),

    /// Team identifier not present in the stores.
    #[error("unknown team: {0}")]
    UnknownTeam(TeamId),

    /// Non-finite arithmetic inside the scoring path. The current snapshot
    /// is invalid until replaced.
    #[error("data corruption: non-finite {0}")]
    DataCorruption(&'static str),

    /// Caller-requested cancellation; no side effects occurred.
    #[error("prediction cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, EngineError>;
