//! `mignet locate`: convert between node ids and grid coordinates.

use anyhow::{bail, Result};
use mignet_core::{degrees_to_id, id_to_degrees, NodeId, Resolution};

/// What to convert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    /// Node id to cell-centre coordinates.
    Id(NodeId),
    /// Coordinates in degrees to node id.
    Coordinates { lat: f64, lon: f64 },
}

/// Resolve a query to a printable line.
pub fn resolve(query: Query, resolution: Resolution) -> Result<String> {
    match query {
        Query::Id(id) => {
            let (lat, lon) = id_to_degrees(id, resolution)?;
            Ok(format!("node {id} -> lat {lat:.6}, lon {lon:.6} ({resolution} grid)"))
        }
        Query::Coordinates { lat, lon } => {
            let id = degrees_to_id(lat, lon, resolution)?;
            Ok(format!("lat {lat}, lon {lon} -> node {id} ({resolution} grid)"))
        }
    }
}

pub fn run(
    id: Option<NodeId>,
    lat: Option<f64>,
    lon: Option<f64>,
    resolution: Option<Resolution>,
) -> Result<()> {
    let Some(resolution) = resolution else {
        bail!("no grid resolution given: pass --resolution or set grid.resolution");
    };
    let query = match (id, lat, lon) {
        (Some(id), None, None) => Query::Id(id),
        (None, Some(lat), Some(lon)) => Query::Coordinates { lat, lon },
        _ => bail!("specify either --id <id> or both --lat and --lon"),
    };
    println!("{}", resolve(query, resolution)?);
    Ok(())
}
