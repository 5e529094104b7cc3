//! The migration network: roster order plus outbound links per source.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{NetworkError, Result};

/// Identifier of a node in the demographics roster. `0` is reserved.
pub type NodeId = u32;

/// Which end of a link a node id was referenced as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    Source,
    Destination,
}

impl fmt::Display for LinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkRole::Source => f.write_str("source"),
            LinkRole::Destination => f.write_str("destination"),
        }
    }
}

/// A directed, rated migration pathway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MigrationLink {
    pub source: NodeId,
    pub destination: NodeId,
    pub rate: f64,
}

/// Roster plus outbound links, keyed by source node.
///
/// The roster is fixed at construction and never re-sorted; it decides the
/// order of records in the binary file. Links keep the order in which they
/// were added, which becomes their slot order.
#[derive(Debug, Clone)]
pub struct MigrationNetwork {
    id_reference: String,
    roster: Vec<NodeId>,
    members: HashSet<NodeId>,
    links: HashMap<NodeId, Vec<MigrationLink>>,
    /// Index: every (source, destination) pair already linked.
    pairs: HashSet<(NodeId, NodeId)>,
    validated: bool,
}

impl MigrationNetwork {
    /// Create an empty network over the given roster.
    pub fn new(id_reference: impl Into<String>, roster: Vec<NodeId>) -> Result<Self> {
        let mut members = HashSet::with_capacity(roster.len());
        for &id in &roster {
            if id == 0 {
                return Err(NetworkError::ReservedNodeId);
            }
            if !members.insert(id) {
                return Err(NetworkError::DuplicateNode(id));
            }
        }
        Ok(Self {
            id_reference: id_reference.into(),
            roster,
            members,
            links: HashMap::new(),
            pairs: HashSet::new(),
            validated: false,
        })
    }

    /// The demographics id-reference string this network was built against.
    pub fn id_reference(&self) -> &str {
        &self.id_reference
    }

    /// Node ids in roster order.
    pub fn roster(&self) -> &[NodeId] {
        &self.roster
    }

    pub fn node_count(&self) -> usize {
        self.roster.len()
    }

    /// Whether `id` is part of the roster.
    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    /// Add a directed link. Both endpoints must be roster nodes, distinct,
    /// not yet linked in this direction, and the rate finite and non-negative.
    pub fn add_link(&mut self, source: NodeId, destination: NodeId, rate: f64) -> Result<()> {
        if self.validated {
            return Err(NetworkError::Sealed);
        }
        if !self.contains(source) {
            return Err(NetworkError::UnknownNode {
                role: LinkRole::Source,
                node: source,
            });
        }
        if !self.contains(destination) {
            return Err(NetworkError::UnknownNode {
                role: LinkRole::Destination,
                node: destination,
            });
        }
        if source == destination {
            return Err(NetworkError::SelfLoop(source));
        }
        if self.pairs.contains(&(source, destination)) {
            return Err(NetworkError::DuplicateLink {
                src: source,
                dst: destination,
            });
        }
        if !rate.is_finite() || rate < 0.0 {
            return Err(NetworkError::InvalidRate {
                src: source,
                dst: destination,
                rate,
            });
        }

        self.pairs.insert((source, destination));
        self.links.entry(source).or_default().push(MigrationLink {
            source,
            destination,
            rate,
        });
        Ok(())
    }

    /// Outbound links of `id` in insertion order (empty if it has none).
    pub fn links_from(&self, id: NodeId) -> &[MigrationLink] {
        self.links.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of outbound links of `id`.
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.links_from(id).len()
    }

    /// Whether `id` has an entry in the link map, even an empty one.
    pub fn has_link_set(&self, id: NodeId) -> bool {
        self.links.contains_key(&id)
    }

    /// Total number of links across all sources.
    pub fn link_count(&self) -> usize {
        self.links.values().map(Vec::len).sum()
    }

    /// Give every roster node without a link-set entry an empty one.
    ///
    /// Returns the ids that were filled, in roster order. Existing links are
    /// never touched.
    pub fn fill_missing_sources(&mut self) -> Vec<NodeId> {
        let mut filled = Vec::new();
        for &id in &self.roster {
            if !self.links.contains_key(&id) {
                self.links.insert(id, Vec::new());
                filled.push(id);
            }
        }
        filled
    }

    /// Seal the network after validation. No further links may be added.
    pub fn mark_validated(&mut self) {
        self.validated = true;
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MigrationNetwork {
        MigrationNetwork::new("Gridded world grump2.5arcmin", vec![10, 3, 7]).unwrap()
    }

    #[test]
    fn roster_order_preserved() {
        let net = sample();
        assert_eq!(net.roster(), &[10, 3, 7]);
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.id_reference(), "Gridded world grump2.5arcmin");
    }

    #[test]
    fn links_keep_insertion_order() {
        let mut net = sample();
        net.add_link(10, 7, 0.2).unwrap();
        net.add_link(10, 3, 0.1).unwrap();
        net.add_link(3, 10, 0.5).unwrap();

        let dests: Vec<_> = net.links_from(10).iter().map(|l| l.destination).collect();
        assert_eq!(dests, vec![7, 3]);
        assert_eq!(net.out_degree(3), 1);
        assert_eq!(net.out_degree(7), 0);
        assert_eq!(net.link_count(), 3);
    }

    #[test]
    fn reserved_and_duplicate_roster_ids_rejected() {
        assert!(matches!(
            MigrationNetwork::new("x", vec![1, 0]),
            Err(NetworkError::ReservedNodeId)
        ));
        assert!(matches!(
            MigrationNetwork::new("x", vec![1, 2, 1]),
            Err(NetworkError::DuplicateNode(1))
        ));
    }

    #[test]
    fn invalid_links_rejected() {
        let mut net = sample();
        assert!(matches!(
            net.add_link(99, 3, 0.1),
            Err(NetworkError::UnknownNode {
                role: LinkRole::Source,
                node: 99
            })
        ));
        assert!(matches!(
            net.add_link(3, 99, 0.1),
            Err(NetworkError::UnknownNode {
                role: LinkRole::Destination,
                node: 99
            })
        ));
        assert!(matches!(net.add_link(3, 3, 0.1), Err(NetworkError::SelfLoop(3))));
        assert!(matches!(
            net.add_link(3, 7, -0.1),
            Err(NetworkError::InvalidRate { .. })
        ));
        assert!(matches!(
            net.add_link(3, 7, f64::NAN),
            Err(NetworkError::InvalidRate { .. })
        ));

        net.add_link(3, 7, 0.1).unwrap();
        assert!(matches!(
            net.add_link(3, 7, 0.2),
            Err(NetworkError::DuplicateLink { src: 3, dst: 7 })
        ));
        // The reverse direction is a different link.
        net.add_link(7, 3, 0.2).unwrap();
        assert_eq!(net.link_count(), 2);
    }

    #[test]
    fn fill_missing_sources_only_adds_empty_sets() {
        let mut net = sample();
        net.add_link(3, 7, 0.4).unwrap();
        assert!(!net.has_link_set(10));

        let filled = net.fill_missing_sources();
        assert_eq!(filled, vec![10, 7]);
        assert!(net.roster().iter().all(|&id| net.has_link_set(id)));
        assert_eq!(net.links_from(3)[0].rate, 0.4);
        assert_eq!(net.link_count(), 1);

        assert!(net.fill_missing_sources().is_empty());
    }

    #[test]
    fn sealed_after_validation() {
        let mut net = sample();
        net.mark_validated();
        assert!(net.is_validated());
        assert!(matches!(net.add_link(3, 7, 0.1), Err(NetworkError::Sealed)));
    }

    #[test]
    fn role_display() {
        assert_eq!(LinkRole::Source.to_string(), "source");
    }
}
