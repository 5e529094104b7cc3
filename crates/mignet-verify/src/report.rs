//! Validation warnings and the report that collects them.

use std::fmt;

use mignet_core::NodeId;

/// Category of a validation warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    SourceCoverage,
    OverCapacity,
    InboundCoverage,
}

/// An advisory finding about the network. None of these block a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The node has no outbound links.
    SourceCoverage(NodeId),
    /// The node has more outbound links than its record can hold.
    OverCapacity {
        node: NodeId,
        degree: usize,
        capacity: usize,
    },
    /// No link ends at the node.
    InboundCoverage(NodeId),
}

impl Warning {
    pub fn kind(&self) -> WarningKind {
        match self {
            Warning::SourceCoverage(_) => WarningKind::SourceCoverage,
            Warning::OverCapacity { .. } => WarningKind::OverCapacity,
            Warning::InboundCoverage(_) => WarningKind::InboundCoverage,
        }
    }

    /// The node the warning is about.
    pub fn node(&self) -> NodeId {
        match self {
            Warning::SourceCoverage(node)
            | Warning::OverCapacity { node, .. }
            | Warning::InboundCoverage(node) => *node,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SourceCoverage(node) => {
                write!(f, "node {node} has no outbound links (island or sink)")
            }
            Warning::OverCapacity {
                node,
                degree,
                capacity,
            } => write!(
                f,
                "node {node} has {degree} outbound links but records hold only {capacity}"
            ),
            Warning::InboundCoverage(node) => write!(f, "node {node} has no inbound links"),
        }
    }
}

/// Outcome of validating a network.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Warnings: per-node findings in roster order, then inbound coverage
    /// findings in roster order.
    pub warnings: Vec<Warning>,
    /// Nodes that received an empty link set, in roster order.
    pub filled: Vec<NodeId>,
}

impl ValidationReport {
    /// True when no warnings were recorded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of warnings of the given kind.
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind() == kind).count()
    }

    /// Warnings of the given kind, in report order.
    pub fn of_kind(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind() == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "network is clean");
        }
        write!(
            f,
            "{} warning(s): {} without outbound links, {} without inbound links, {} over capacity",
            self.warnings.len(),
            self.count(WarningKind::SourceCoverage),
            self.count(WarningKind::InboundCoverage),
            self.count(WarningKind::OverCapacity),
        )
    }
}
