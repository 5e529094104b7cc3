//! Error types for input loading.

use std::path::PathBuf;

use mignet_core::{AddressError, LinkRole, NetworkError, NodeId};

/// Errors that can occur while reading demographics or rate files.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// A file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rate line could not be read, e.g. it is not valid UTF-8.
    #[error("line {line}: cannot read line: {source}")]
    Unreadable {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// The demographics document is not valid JSON.
    #[error("malformed demographics input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// A required key is absent.
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A key is present but holds the wrong kind of value.
    #[error("field '{field}' has the wrong type: expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    /// Node id 0 appears in the roster.
    #[error("node at index {index} uses reserved id 0")]
    ReservedNodeId { index: usize },

    /// The same node id appears twice in the roster.
    #[error("duplicate node id {id} at index {index}")]
    DuplicateNode { id: NodeId, index: usize },

    /// The roster cannot back a network.
    #[error("invalid roster: {0}")]
    Roster(NetworkError),

    /// Demographics metadata declares an unsupported grid resolution.
    #[error("invalid demographics resolution: {0}")]
    Resolution(#[from] AddressError),

    /// A rate line does not hold exactly `source destination rate`.
    #[error("line {line}: expected 'source destination rate', got '{raw}'")]
    MalformedLine { line: usize, raw: String },

    /// The rate token is not a finite, non-negative number.
    #[error("line {line}: invalid rate in '{raw}': must be a finite, non-negative number")]
    InvalidRate { line: usize, raw: String },

    /// A link references a node that is not in the roster.
    #[error("line {line}: {role} node {node} is not in the demographics roster")]
    UnknownNode {
        line: usize,
        role: LinkRole,
        node: NodeId,
    },

    /// A link goes from a node to itself.
    #[error("line {line}: self-loop on node {node}")]
    SelfLoop { line: usize, node: NodeId },

    /// A link repeats an earlier (source, destination) pair.
    #[error("line {line}: duplicate link from {src} to {dst}")]
    DuplicateLink {
        line: usize,
        src: NodeId,
        dst: NodeId,
    },

    /// Any other network construction failure.
    #[error("line {line}: {source}")]
    Network {
        line: usize,
        #[source]
        source: NetworkError,
    },
}

impl InputError {
    /// Attach a rate-file line number to a network construction error.
    pub(crate) fn at_line(line: usize, raw: &str, err: NetworkError) -> Self {
        match err {
            NetworkError::UnknownNode { role, node } => InputError::UnknownNode { line, role, node },
            NetworkError::SelfLoop(node) => InputError::SelfLoop { line, node },
            NetworkError::DuplicateLink { src, dst } => InputError::DuplicateLink { line, src, dst },
            NetworkError::InvalidRate { .. } => InputError::InvalidRate {
                line,
                raw: raw.to_string(),
            },
            other => InputError::Network {
                line,
                source: other,
            },
        }
    }
}

/// Result type for input operations.
pub type Result<T> = std::result::Result<T, InputError>;
