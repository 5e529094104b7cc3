//! Demographics roster loading.
//!
//! Only the keys this builder needs are read; everything else in the
//! document is ignored:
//!
//! ```json
//! {
//!   "Metadata": { "IdReference": "Gridded world grump2.5arcmin", "Resolution": 150 },
//!   "Nodes": [ { "NodeID": 1 }, { "NodeID": 2 } ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde_json::{Map, Value};

use mignet_core::{MigrationNetwork, NodeId, Resolution};

use crate::error::{InputError, Result};

/// The parts of a demographics file that define the node universe.
#[derive(Debug, Clone, PartialEq)]
pub struct Demographics {
    /// Free-form identifier of the node-id scheme.
    pub id_reference: String,
    /// Node ids in the order they appear in the file.
    pub roster: Vec<NodeId>,
    /// Grid resolution, if the metadata declares one.
    pub resolution: Option<Resolution>,
}

impl Demographics {
    /// An empty network over this roster, ready to receive links.
    pub fn to_network(&self) -> Result<MigrationNetwork> {
        MigrationNetwork::new(self.id_reference.clone(), self.roster.clone())
            .map_err(InputError::Roster)
    }
}

/// Load demographics from a JSON file.
pub fn load_demographics(path: &Path) -> Result<Demographics> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let demographics = parse_demographics(&content)?;
    log::debug!(
        "loaded {} nodes from {} (IdReference '{}')",
        demographics.roster.len(),
        path.display(),
        demographics.id_reference
    );
    Ok(demographics)
}

/// Parse demographics from a JSON string.
pub fn parse_demographics(json: &str) -> Result<Demographics> {
    let root: Map<String, Value> = serde_json::from_str(json)?;
    let root = &root;

    let metadata = required(root, "Metadata", "Metadata")?
        .as_object()
        .ok_or_else(|| InputError::TypeMismatch {
            field: "Metadata".into(),
            expected: "an object",
        })?;

    let id_reference = required(metadata, "IdReference", "Metadata.IdReference")?
        .as_str()
        .ok_or_else(|| InputError::TypeMismatch {
            field: "Metadata.IdReference".into(),
            expected: "a string",
        })?
        .to_string();

    let resolution = match metadata.get("Resolution") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let arcsec = value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| InputError::TypeMismatch {
                    field: "Metadata.Resolution".into(),
                    expected: "an integer number of arc-seconds",
                })?;
            Some(Resolution::from_arcsec(arcsec)?)
        }
    };

    let nodes = required(root, "Nodes", "Nodes")?
        .as_array()
        .ok_or_else(|| InputError::TypeMismatch {
            field: "Nodes".into(),
            expected: "an array of node records",
        })?;

    let mut roster = Vec::with_capacity(nodes.len());
    let mut seen = HashSet::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        let record = node.as_object().ok_or_else(|| InputError::TypeMismatch {
            field: format!("Nodes[{index}]"),
            expected: "a node record object",
        })?;
        let field = format!("Nodes[{index}].NodeID");
        let id = record
            .get("NodeID")
            .ok_or_else(|| InputError::MissingField(field.clone()))?
            .as_u64()
            .and_then(|v| NodeId::try_from(v).ok())
            .ok_or(InputError::TypeMismatch {
                field,
                expected: "an unsigned 32-bit integer",
            })?;

        if id == 0 {
            return Err(InputError::ReservedNodeId { index });
        }
        if !seen.insert(id) {
            return Err(InputError::DuplicateNode { id, index });
        }
        roster.push(id);
    }

    Ok(Demographics {
        id_reference,
        roster,
        resolution,
    })
}

fn required<'a>(object: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| InputError::MissingField(path.to_string()))
}
