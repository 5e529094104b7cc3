//! JSON side-file describing a migration binary.
//!
//! ```json
//! {
//!   "Metadata": {
//!     "DateCreated": "2026-10-19T08:15:00Z",
//!     "Tool": "mignet 0.1.0",
//!     "Author": "jane",
//!     "IdReference": "Gridded world grump2.5arcmin",
//!     "NodeCount": 3,
//!     "DatavalueCount": 8
//!   },
//!   "NodeOffsets": "0000000100000000000000020000006000000003000000C0"
//! }
//! ```
//!
//! `NodeOffsets` concatenates, per roster node, the node id and the byte
//! offset of its record as 8 upper-case hex digits each.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use mignet_core::{MigrationNetwork, NodeId};

use crate::error::{FormatError, Result};
use crate::format::record_size;

/// Hex digits per encoded id or offset.
const FIELD_WIDTH: usize = 8;

/// Hex digits per (id, offset) entry.
const ENTRY_WIDTH: usize = 2 * FIELD_WIDTH;

/// Who built a file, with what, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub tool: String,
    pub author: String,
    /// Creation timestamp, stored verbatim.
    pub date_created: String,
}

/// The `Metadata` block of the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeaderMetadata {
    pub date_created: String,
    pub tool: String,
    pub author: String,
    pub id_reference: String,
    pub node_count: usize,
    /// Link slots per node record.
    pub datavalue_count: usize,
}

/// Header side-file of a migration binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationHeader {
    #[serde(rename = "Metadata")]
    pub metadata: HeaderMetadata,
    #[serde(rename = "NodeOffsets")]
    pub node_offsets: String,
}

impl MigrationHeader {
    /// Describe a binary holding one record of `capacity` slots per roster node.
    pub fn new(
        roster: &[NodeId],
        capacity: usize,
        id_reference: &str,
        build: &BuildInfo,
    ) -> Result<Self> {
        Ok(Self {
            metadata: HeaderMetadata {
                date_created: build.date_created.clone(),
                tool: build.tool.clone(),
                author: build.author.clone(),
                id_reference: id_reference.to_string(),
                node_count: roster.len(),
                datavalue_count: capacity,
            },
            node_offsets: encode_offsets(roster, capacity)?,
        })
    }

    /// Header for the binary of `network`.
    pub fn for_network(network: &MigrationNetwork, capacity: usize, build: &BuildInfo) -> Result<Self> {
        Self::new(network.roster(), capacity, network.id_reference(), build)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode the offset index, checking it against `NodeCount`.
    pub fn offsets(&self) -> Result<Vec<(NodeId, u64)>> {
        let offsets = decode_offsets(&self.node_offsets)?;
        if offsets.len() != self.metadata.node_count {
            return Err(FormatError::InvalidHeader(format!(
                "NodeOffsets lists {} nodes but NodeCount is {}",
                offsets.len(),
                self.metadata.node_count
            )));
        }
        Ok(offsets)
    }

    /// Node ids in index order.
    pub fn roster(&self) -> Result<Vec<NodeId>> {
        Ok(self.offsets()?.into_iter().map(|(node, _)| node).collect())
    }

    /// Expected size of the described binary.
    pub fn binary_len(&self) -> usize {
        self.metadata.node_count * record_size(self.metadata.datavalue_count)
    }
}

/// Encode the id/offset index for `roster` with `capacity` slots per record.
pub fn encode_offsets(roster: &[NodeId], capacity: usize) -> Result<String> {
    let step = record_size(capacity) as u64;
    let mut out = String::with_capacity(roster.len() * ENTRY_WIDTH);
    let mut offset: u64 = 0;
    for &node in roster {
        let encoded = u32::try_from(offset).map_err(|_| FormatError::OffsetOverflow { node, offset })?;
        // Writing into a String cannot fail.
        let _ = write!(out, "{node:08X}{encoded:08X}");
        offset += step;
    }
    Ok(out)
}

/// Decode an id/offset index.
pub fn decode_offsets(encoded: &str) -> Result<Vec<(NodeId, u64)>> {
    if !encoded.is_ascii() || encoded.len() % ENTRY_WIDTH != 0 {
        return Err(FormatError::InvalidHeader(format!(
            "NodeOffsets length {} is not a multiple of {ENTRY_WIDTH}",
            encoded.len()
        )));
    }

    let field = |at: usize| -> Result<u32> {
        let digits = &encoded[at..at + FIELD_WIDTH];
        u32::from_str_radix(digits, 16).map_err(|_| {
            FormatError::InvalidHeader(format!("'{digits}' at position {at} is not hexadecimal"))
        })
    };

    (0..encoded.len())
        .step_by(ENTRY_WIDTH)
        .map(|at| Ok((field(at)?, u64::from(field(at + FIELD_WIDTH)?))))
        .collect()
}
