//! Migration rate file parsing.
//!
//! One directed link per line, `#` starts a comment, blank lines are skipped:
//!
//! ```text
//! # source  destination  rate
//! 1 2 0.15
//! 2 3 0.10   # river crossing
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use mignet_core::{MigrationNetwork, NodeId};

use crate::demographics::Demographics;
use crate::error::{InputError, Result};

/// Load a rate file into a network over the demographics roster.
pub fn load_rates(demographics: &Demographics, path: &Path) -> Result<MigrationNetwork> {
    let file = File::open(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let network = parse_rates(demographics, BufReader::new(file))?;
    log::debug!(
        "parsed {} links from {}",
        network.link_count(),
        path.display()
    );
    Ok(network)
}

/// Parse rate lines into a network over the demographics roster.
///
/// Parsing stops at the first bad line. Links from each source keep
/// file order.
pub fn parse_rates<R: BufRead>(demographics: &Demographics, reader: R) -> Result<MigrationNetwork> {
    let mut network = demographics.to_network()?;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| InputError::Unreadable {
            line: line_number,
            source,
        })?;
        let Some((source, destination, rate)) = parse_line(line_number, &line)? else {
            continue;
        };
        network
            .add_link(source, destination, rate)
            .map_err(|err| InputError::at_line(line_number, line.trim(), err))?;
    }

    Ok(network)
}

/// Split one line into `(source, destination, rate)`; `None` for blank and
/// comment-only lines.
fn parse_line(line_number: usize, line: &str) -> Result<Option<(NodeId, NodeId, f64)>> {
    let content = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    };
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let malformed = || InputError::MalformedLine {
        line: line_number,
        raw: line.trim().to_string(),
    };

    match tokens.as_slice() {
        [] => Ok(None),
        [source, destination, rate] => {
            let source: NodeId = source.parse().map_err(|_| malformed())?;
            let destination: NodeId = destination.parse().map_err(|_| malformed())?;
            // An unparseable rate is passed on as NaN so that node checks in
            // `add_link` report first; the rate check then rejects it.
            let rate: f64 = rate.parse().unwrap_or(f64::NAN);
            Ok(Some((source, destination, rate)))
        }
        _ => Err(malformed()),
    }
}
