//! Error types for device buffer operations.

use thiserror::Error;

/// Result type for device buffer operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in the device memory layer.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Device allocation failed.
    #[error("Device allocation of {size} bytes failed: {reason}")]
    AllocationFailed {
        /// Requested allocation size in bytes.
        size: usize,
        /// Backend-specific failure description.
        reason: String,
    },

    /// Buffer lengths do not match for a copy or pairwise operation.
    #[error("Buffer size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch {
        /// Element count the operation requires.
        expected: usize,
        /// Element count actually supplied.
        actual: usize,
    },

    /// Cell index out of bounds.
    #[error("Index {0} out of bounds")]
    InvalidIndex(usize),

    /// Invalid argument to a device operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CoreError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
