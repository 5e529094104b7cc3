//! Error types for addressing and network construction.

use crate::network::{LinkRole, NodeId};

/// Errors from the node addressing scheme.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("unsupported grid resolution {0} arc-seconds (expected 30 or 150)")]
    UnsupportedResolution(u32),

    #[error("'{0}' is not a grid resolution in arc-seconds")]
    InvalidResolution(String),

    #[error("node id 0 is reserved and has no spatial address")]
    ReservedNodeId,

    #[error("node id {id} lies outside the {resolution} arc-second grid (column {column}, row {row})")]
    OutsideGrid {
        id: NodeId,
        resolution: u32,
        column: u32,
        row: u32,
    },

    #[error("coordinate ({lat}, {lon}) arc-seconds is outside the grid domain")]
    OutOfDomain { lat: f64, lon: f64 },
}

/// Errors from building a [`MigrationNetwork`](crate::MigrationNetwork).
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("node id 0 is reserved as the empty-slot marker and cannot appear in the roster")]
    ReservedNodeId,

    #[error("duplicate node id {0} in roster")]
    DuplicateNode(NodeId),

    #[error("{role} node {node} is not in the roster")]
    UnknownNode { role: LinkRole, node: NodeId },

    #[error("self-loop on node {0}")]
    SelfLoop(NodeId),

    #[error("duplicate link from {src} to {dst}")]
    DuplicateLink { src: NodeId, dst: NodeId },

    #[error("invalid rate {rate} on link from {src} to {dst}: must be finite and non-negative")]
    InvalidRate { src: NodeId, dst: NodeId, rate: f64 },

    #[error("network has been validated; links can no longer be added")]
    Sealed,

    #[error("unknown migration type '{0}' (expected LOCAL, REGIONAL, SEA, or AIR)")]
    UnknownMigrationType(String),

    #[error("ambiguous migration type '{input}': matches {}", candidates.join(", "))]
    AmbiguousMigrationType {
        input: String,
        candidates: Vec<&'static str>,
    },
}

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = NetworkError::UnknownNode {
            role: LinkRole::Destination,
            node: 42,
        };
        assert_eq!(err.to_string(), "destination node 42 is not in the roster");

        let err = AddressError::UnsupportedResolution(60);
        assert!(err.to_string().contains("60"));
    }

    #[test]
    fn ambiguous_lists_candidates() {
        let err = NetworkError::AmbiguousMigrationType {
            input: "x".into(),
            candidates: vec!["SEA", "AIR"],
        };
        assert!(err.to_string().ends_with("SEA, AIR"));
    }
}
