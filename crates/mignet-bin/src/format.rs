//! Fixed-record binary encoding of a migration network.
//!
//! Every node gets exactly `capacity` destination slots followed by
//! `capacity` rate slots. Slot order is the order links were added to the
//! network; unused slots are zero.

use std::io::Write;

use sha2::{Digest, Sha256};

use mignet_core::{MigrationNetwork, NodeId, SLOT_SIZE};

use crate::error::{FormatError, Result};

/// Size in bytes of one node record for the given link capacity.
pub const fn record_size(capacity: usize) -> usize {
    capacity * SLOT_SIZE
}

/// Hex SHA-256 digest of an encoded file.
pub fn content_digest(data: &[u8]) -> String {
    let hash: [u8; 32] = Sha256::digest(data).into();
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// The outbound links of one node, as stored in its record.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub node: NodeId,
    /// `(destination, rate)` pairs in slot order, padding excluded.
    pub links: Vec<(NodeId, f64)>,
}

/// A migration binary: one record per roster node.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationFile {
    /// Slots per record.
    pub capacity: usize,
    /// Records in file order.
    pub records: Vec<NodeRecord>,
}

impl MigrationFile {
    /// Lay out a validated network as fixed-size records in roster order.
    ///
    /// Every node is checked against `capacity` before anything is produced,
    /// so an oversized node never yields a partial file.
    pub fn from_network(network: &MigrationNetwork, capacity: usize) -> Result<Self> {
        if !network.is_validated() {
            return Err(FormatError::NotValidated);
        }

        if let Some(&node) = network
            .roster()
            .iter()
            .find(|&&node| network.out_degree(node) > capacity)
        {
            return Err(FormatError::CapacityExceeded {
                node,
                degree: network.out_degree(node),
                capacity,
            });
        }

        let records = network
            .roster()
            .iter()
            .map(|&node| NodeRecord {
                node,
                links: network
                    .links_from(node)
                    .iter()
                    .map(|link| (link.destination, link.rate))
                    .collect(),
            })
            .collect::<Vec<_>>();

        log::debug!(
            "encoding {} records of {} bytes",
            records.len(),
            record_size(capacity)
        );
        Ok(Self { capacity, records })
    }

    /// Total encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        self.records.len() * record_size(self.capacity)
    }

    /// Serialize every record to a writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for record in &self.records {
            if record.links.len() > self.capacity {
                return Err(FormatError::CapacityExceeded {
                    node: record.node,
                    degree: record.links.len(),
                    capacity: self.capacity,
                });
            }
        }

        let mut buf = Vec::with_capacity(record_size(self.capacity));
        for record in &self.records {
            buf.clear();
            encode_record(record, self.capacity, &mut buf);
            writer.write_all(&buf)?;
        }
        Ok(())
    }

    /// Serialize to a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Decode a file whose records follow `roster` back to back.
    pub fn from_bytes(data: &[u8], capacity: usize, roster: &[NodeId]) -> Result<Self> {
        let expected = roster.len() * record_size(capacity);
        if data.len() != expected {
            return Err(FormatError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let index: Vec<(NodeId, u64)> = roster
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, (i * record_size(capacity)) as u64))
            .collect();
        Self::from_index(data, capacity, &index)
    }

    /// Decode the record of each `(node, byte offset)` entry of an index.
    pub fn from_index(data: &[u8], capacity: usize, index: &[(NodeId, u64)]) -> Result<Self> {
        let size = record_size(capacity);
        let mut records = Vec::with_capacity(index.len());
        for &(node, offset) in index {
            let start = usize::try_from(offset).map_err(|_| {
                FormatError::InvalidHeader(format!("offset {offset} of node {node} is not addressable"))
            })?;
            let bytes = start
                .checked_add(size)
                .and_then(|end| data.get(start..end))
                .ok_or(FormatError::SizeMismatch {
                    expected: start.saturating_add(size),
                    actual: data.len(),
                })?;
            records.push(decode_record(node, bytes, capacity));
        }
        Ok(Self { capacity, records })
    }

    /// The record of `node`, if present.
    pub fn record(&self, node: NodeId) -> Option<&NodeRecord> {
        self.records.iter().find(|r| r.node == node)
    }
}

fn encode_record(record: &NodeRecord, capacity: usize, buf: &mut Vec<u8>) {
    let padding = capacity - record.links.len();

    for &(destination, _) in &record.links {
        buf.extend_from_slice(&destination.to_le_bytes());
    }
    buf.extend(std::iter::repeat(0u8).take(padding * 4));

    for &(_, rate) in &record.links {
        buf.extend_from_slice(&rate.to_le_bytes());
    }
    buf.extend(std::iter::repeat(0u8).take(padding * 8));
}

fn decode_record(node: NodeId, bytes: &[u8], capacity: usize) -> NodeRecord {
    let (ids, rates) = bytes.split_at(capacity * 4);
    let links = ids
        .chunks_exact(4)
        .zip(rates.chunks_exact(8))
        .filter_map(|(id, rate)| {
            let mut id_bytes = [0u8; 4];
            id_bytes.copy_from_slice(id);
            let mut rate_bytes = [0u8; 8];
            rate_bytes.copy_from_slice(rate);
            let destination = u32::from_le_bytes(id_bytes);
            (destination != 0).then(|| (destination, f64::from_le_bytes(rate_bytes)))
        })
        .collect();
    NodeRecord { node, links }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validated(roster: &[NodeId], links: &[(NodeId, NodeId, f64)]) -> MigrationNetwork {
        let mut net = MigrationNetwork::new("test", roster.to_vec()).unwrap();
        for &(src, dst, rate) in links {
            net.add_link(src, dst, rate).unwrap();
        }
        net.fill_missing_sources();
        net.mark_validated();
        net
    }

    fn slot_id(bytes: &[u8], record: usize, capacity: usize, slot: usize) -> u32 {
        let at = record * record_size(capacity) + slot * 4;
        u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn slot_rate(bytes: &[u8], record: usize, capacity: usize, slot: usize) -> f64 {
        let at = record * record_size(capacity) + capacity * 4 + slot * 8;
        f64::from_le_bytes(bytes[at..at + 8].try_into().unwrap())
    }

    #[test]
    fn chain_layout() {
        let net = validated(&[1, 2, 3], &[(1, 2, 0.15), (2, 3, 0.10)]);
        let bytes = MigrationFile::from_network(&net, 8).unwrap().to_bytes().unwrap();

        assert_eq!(bytes.len(), 3 * 8 * 12);
        assert_eq!(slot_id(&bytes, 0, 8, 0), 2);
        assert_eq!(slot_rate(&bytes, 0, 8, 0), 0.15);
        for slot in 1..8 {
            assert_eq!(slot_id(&bytes, 0, 8, slot), 0);
            assert_eq!(slot_rate(&bytes, 0, 8, slot), 0.0);
        }
        assert_eq!(slot_id(&bytes, 1, 8, 0), 3);
        assert_eq!(slot_rate(&bytes, 1, 8, 0), 0.10);
        assert!(bytes[192..288].iter().all(|&b| b == 0));
    }

    #[test]
    fn ids_and_rates_are_parallel_arrays() {
        let net = validated(&[1, 2, 3], &[(1, 3, 0.5), (1, 2, 0.25)]);
        let bytes = MigrationFile::from_network(&net, 2).unwrap().to_bytes().unwrap();
        // [3, 2] then [0.5, 0.25]
        assert_eq!(&bytes[0..4], &3u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2u32.to_le_bytes());
        assert_eq!(&bytes[8..16], &0.5f64.to_le_bytes());
        assert_eq!(&bytes[16..24], &0.25f64.to_le_bytes());
    }

    #[test]
    fn size_independent_of_warnings() {
        let net = validated(&[4, 5, 6, 7], &[(4, 5, 1.0)]);
        let file = MigrationFile::from_network(&net, 30).unwrap();
        assert_eq!(file.to_bytes().unwrap().len(), 4 * 30 * 12);
        assert_eq!(file.encoded_len(), 4 * 30 * 12);
    }

    #[test]
    fn serialization_is_idempotent() {
        let net = validated(&[1, 2, 3], &[(1, 2, 0.15), (2, 3, 0.10), (3, 1, 2.5)]);
        let a = MigrationFile::from_network(&net, 5).unwrap().to_bytes().unwrap();
        let b = MigrationFile::from_network(&net, 5).unwrap().to_bytes().unwrap();
        assert_eq!(a, b);
        assert_eq!(content_digest(&a), content_digest(&b));
        assert_eq!(content_digest(&a).len(), 64);
    }

    #[test]
    fn full_record_has_no_padding() {
        let net = validated(&[1, 2, 3], &[(1, 2, 0.1), (1, 3, 0.2)]);
        let bytes = MigrationFile::from_network(&net, 2).unwrap().to_bytes().unwrap();
        assert_eq!(slot_id(&bytes, 0, 2, 0), 2);
        assert_eq!(slot_id(&bytes, 0, 2, 1), 3);
        assert_eq!(slot_rate(&bytes, 0, 2, 1), 0.2);
    }

    #[test]
    fn one_over_capacity_fails() {
        let net = validated(&[1, 2, 3], &[(1, 2, 0.1), (1, 3, 0.2)]);
        let err = MigrationFile::from_network(&net, 1).unwrap_err();
        assert!(matches!(
            err,
            FormatError::CapacityExceeded {
                node: 1,
                degree: 2,
                capacity: 1
            }
        ));
    }

    #[test]
    fn oversized_record_writes_nothing() {
        let file = MigrationFile {
            capacity: 1,
            records: vec![
                NodeRecord {
                    node: 1,
                    links: vec![(2, 0.1)],
                },
                NodeRecord {
                    node: 2,
                    links: vec![(1, 0.1), (3, 0.1)],
                },
            ],
        };
        let mut out = Vec::new();
        assert!(file.write_to(&mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn unvalidated_network_rejected() {
        let net = MigrationNetwork::new("test", vec![1, 2]).unwrap();
        assert!(matches!(
            MigrationFile::from_network(&net, 8),
            Err(FormatError::NotValidated)
        ));
    }

    #[test]
    fn decode_recovers_links() {
        let net = validated(&[9, 4, 6], &[(9, 4, 0.3), (9, 6, 0.7), (6, 9, 0.01)]);
        let file = MigrationFile::from_network(&net, 8).unwrap();
        let bytes = file.to_bytes().unwrap();

        let decoded = MigrationFile::from_bytes(&bytes, 8, &[9, 4, 6]).unwrap();
        assert_eq!(decoded, file);
        assert_eq!(decoded.record(9).unwrap().links, vec![(4, 0.3), (6, 0.7)]);
        assert!(decoded.record(4).unwrap().links.is_empty());
        assert!(decoded.record(5).is_none());
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let err = MigrationFile::from_bytes(&[0u8; 95], 8, &[1]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::SizeMismatch {
                expected: 96,
                actual: 95
            }
        ));
    }

    #[test]
    fn decode_rejects_offset_past_end() {
        let err = MigrationFile::from_index(&[0u8; 96], 8, &[(1, 0), (2, 96)]).unwrap_err();
        assert!(matches!(err, FormatError::SizeMismatch { .. }));
    }
}
