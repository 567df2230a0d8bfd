//! Error types for streamformat.
//!
//! Building, comparing and projecting a [`MediaFormat`](crate::MediaFormat)
//! never fails. Errors only come from the edges: reading typed values back
//! out of a native format, and snapshot encoding.

use thiserror::Error;

/// Result type for streamformat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for streamformat operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A native format key holds a value of a different type than requested.
    #[error("Native format key '{key}' holds {found}, expected {expected}")]
    ValueType {
        /// The key that was read.
        key: String,
        /// The value type the caller asked for.
        expected: &'static str,
        /// The value type actually stored under the key.
        found: &'static str,
    },

    /// A format snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a value type mismatch error.
    pub fn value_type(key: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::ValueType {
            key: key.into(),
            expected,
            found,
        }
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl std::fmt::Display) -> Self {
        Self::Serialization(msg.to_string())
    }
}
