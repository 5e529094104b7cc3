//! Error types for the binary format and header.

use std::io;

use mignet_core::NodeId;

/// Errors that can occur while encoding or decoding migration files.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("node {node} has {degree} outbound links but records hold only {capacity}")]
    CapacityExceeded {
        node: NodeId,
        degree: usize,
        capacity: usize,
    },

    #[error("network must be validated before it is serialized")]
    NotValidated,

    #[error("byte offset {offset} of node {node} does not fit in 32 bits")]
    OffsetOverflow { node: NodeId, offset: u64 },

    #[error("binary size mismatch: expected {expected} bytes, found {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for format operations.
pub type Result<T> = std::result::Result<T, FormatError>;
