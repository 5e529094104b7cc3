//! `mignet inspect`: decode a migration binary through its header.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use mignet_bin::{content_digest, MigrationFile, MigrationHeader};
use mignet_core::{id_to_degrees, NodeId, Resolution};

use crate::commands::build::default_header_path;

/// Read a binary and its header, checking that they agree.
pub fn load(binary: &Path, header: Option<&Path>) -> Result<(MigrationHeader, MigrationFile, Vec<u8>)> {
    let header_path = header
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_header_path(binary));

    let json = fs::read_to_string(&header_path)
        .with_context(|| format!("reading {}", header_path.display()))?;
    let header = MigrationHeader::from_json(&json)
        .with_context(|| format!("parsing {}", header_path.display()))?;

    let bytes = fs::read(binary).with_context(|| format!("reading {}", binary.display()))?;
    if bytes.len() != header.binary_len() {
        bail!(
            "{} is {} bytes but {} describes {} nodes of {} bytes",
            binary.display(),
            bytes.len(),
            header_path.display(),
            header.metadata.node_count,
            mignet_bin::record_size(header.metadata.datavalue_count)
        );
    }

    let index = header
        .offsets()
        .with_context(|| format!("decoding offsets in {}", header_path.display()))?;
    let file = MigrationFile::from_index(&bytes, header.metadata.datavalue_count, &index)
        .with_context(|| format!("decoding {}", binary.display()))?;

    Ok((header, file, bytes))
}

/// Print the header metadata and the links of every node (or one node).
pub fn run(
    binary: &Path,
    header: Option<&Path>,
    resolution: Option<Resolution>,
    node: Option<NodeId>,
) -> Result<()> {
    let (header, file, bytes) = load(binary, header)?;
    let meta = &header.metadata;

    println!("--- {} ---", binary.display());
    println!("  IdReference:    {}", meta.id_reference);
    println!("  Created:        {} by {} ({})", meta.date_created, meta.author, meta.tool);
    println!("  Nodes:          {}", meta.node_count);
    println!("  Slots per node: {}", meta.datavalue_count);
    println!("  SHA-256:        {}", content_digest(&bytes));
    println!();

    let records: Vec<_> = match node {
        Some(id) => vec![file
            .record(id)
            .with_context(|| format!("node {id} is not in {}", binary.display()))?],
        None => file.records.iter().collect(),
    };

    for record in records {
        match resolution {
            Some(res) => match id_to_degrees(record.node, res) {
                Ok((lat, lon)) => println!(
                    "node {} ({lat:.5}, {lon:.5}): {} link(s)",
                    record.node,
                    record.links.len()
                ),
                Err(e) => println!("node {} (no address: {e}): {} link(s)", record.node, record.links.len()),
            },
            None => println!("node {}: {} link(s)", record.node, record.links.len()),
        }
        for (destination, rate) in &record.links {
            println!("  -> {destination:<10} {rate}");
        }
    }

    Ok(())
}
