//! Error types for the OT core
//!
//! Only two kinds exist. `OutOfBounds` is an ordinary, reportable outcome of
//! applying an operation to a buffer it does not fit. `InvariantViolation`
//! means a malformed operation reached the core and indicates a bug upstream.

use thiserror::Error;

/// Result type alias for OT operations
pub type Result<T> = std::result::Result<T, OtError>;

/// Errors produced by the OT core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtError {
    /// The operation does not fit the buffer it was applied to.
    ///
    /// `num` is the deletion count, or `0` for inserts.
    #[error("Operation out of bounds: position {position}, num {num} (buffer length: {length})")]
    OutOfBounds {
        position: i64,
        num: usize,
        length: usize,
    },

    /// The operation is structurally malformed
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl OtError {
    /// True for errors the caller may recover from by re-deriving the operation
    pub fn is_recoverable(&self) -> bool {
        matches!(self, OtError::OutOfBounds { .. })
    }
}
