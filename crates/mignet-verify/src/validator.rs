//! Coverage and capacity checks over a parsed network.

use std::collections::HashSet;

use mignet_core::{MigrationNetwork, MigrationType, NodeId};

use crate::report::{ValidationReport, Warning};

/// Validates networks against the link capacity of one migration type.
#[derive(Debug, Clone, Copy)]
pub struct NetworkValidator {
    capacity: usize,
}

impl NetworkValidator {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Validator for the capacity of `migration_type`.
    pub fn for_type(migration_type: MigrationType) -> Self {
        Self::new(migration_type.link_capacity())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Complete and check a network.
    ///
    /// First gives every roster node without a link set an empty one, then
    /// computes warnings over the completed network. The returned network is
    /// sealed against further links.
    pub fn validate(&self, mut network: MigrationNetwork) -> (MigrationNetwork, ValidationReport) {
        let filled = network.fill_missing_sources();
        let warnings = check_network(&network, self.capacity);
        network.mark_validated();

        log::debug!(
            "validated {} nodes: {} filled, {} warning(s)",
            network.node_count(),
            filled.len(),
            warnings.len()
        );

        (network, ValidationReport { warnings, filled })
    }
}

/// Compute coverage and capacity warnings without modifying the network.
///
/// Per-node warnings (no outbound links, over capacity) come first in roster
/// order, followed by inbound coverage warnings in roster order.
pub fn check_network(network: &MigrationNetwork, capacity: usize) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let mut reached: HashSet<NodeId> = HashSet::new();

    for &node in network.roster() {
        let links = network.links_from(node);
        if links.is_empty() {
            warnings.push(Warning::SourceCoverage(node));
        }
        if links.len() > capacity {
            warnings.push(Warning::OverCapacity {
                node,
                degree: links.len(),
                capacity,
            });
        }
        reached.extend(links.iter().map(|link| link.destination));
    }

    warnings.extend(
        network
            .roster()
            .iter()
            .filter(|node| !reached.contains(*node))
            .map(|&node| Warning::InboundCoverage(node)),
    );

    warnings
}
