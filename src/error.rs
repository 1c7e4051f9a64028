//! Error types for the decision kernel

use thiserror::Error;

/// Kernel-level failure kinds, per the error handling design: every variant
/// is recovered locally by its caller rather than propagated as a panic.
#[derive(Error, Debug)]
pub enum KernelError {
    /// Rejected by the simulator. Caller skips that move.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Time budget expired between depths. Caller returns the last completed
    /// depth's best move.
    #[error("search timed out after {0}ms")]
    Timeout(u64),

    /// Move generation returned nothing usable at a node. Caller returns the
    /// static evaluation with a null move.
    #[error("no legal moves available")]
    NoLegalMoves,

    /// Unexpected failure from the simulator. Caller skips that move and
    /// records a warning.
    #[error("simulator internal error: {0}")]
    SimulatorInternal(String),

    /// Entity arena lookup against a stale or foreign id.
    #[error("entity not found: {0}")]
    EntityNotFound(u32),
}

pub type Result<T> = std::result::Result<T, KernelError>;
