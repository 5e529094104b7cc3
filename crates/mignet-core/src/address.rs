//! Node id <-> grid coordinate addressing.
//!
//! A node id packs the grid column into the high 16 bits and the grid row
//! into the low 16 bits of `id - 1`:
//!
//! ```text
//! id - 1 = (column << 16) | row
//! lat    = (row    + 0.5) * resolution - 90°
//! lon    = (column + 0.5) * resolution - 180°
//! ```
//!
//! Coordinates are expressed in arc-seconds and always name the centre of
//! the grid cell. Only the 30" and 150" grids are supported.

use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;
use crate::network::NodeId;

/// Arc-seconds per degree.
pub const ARCSEC_PER_DEGREE: f64 = 3600.0;

const ROW_BITS: u32 = 16;
const ROW_MASK: u32 = (1 << ROW_BITS) - 1;

const LAT_OFFSET: f64 = 90.0 * ARCSEC_PER_DEGREE;
const LON_OFFSET: f64 = 180.0 * ARCSEC_PER_DEGREE;

/// Grid spacing of the node addressing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// 30 arc-second cells (~1 km at the equator).
    Arcsec30,
    /// 150 arc-second cells (~5 km at the equator).
    Arcsec150,
}

impl Resolution {
    /// Every supported resolution.
    pub const ALL: [Resolution; 2] = [Resolution::Arcsec30, Resolution::Arcsec150];

    /// Resolve a grid spacing given in arc-seconds.
    pub fn from_arcsec(arcsec: u32) -> Result<Self, AddressError> {
        match arcsec {
            30 => Ok(Resolution::Arcsec30),
            150 => Ok(Resolution::Arcsec150),
            other => Err(AddressError::UnsupportedResolution(other)),
        }
    }

    /// Cell size in arc-seconds.
    pub const fn arcsec(self) -> u32 {
        match self {
            Resolution::Arcsec30 => 30,
            Resolution::Arcsec150 => 150,
        }
    }

    /// Number of rows spanning -90°..+90°.
    pub const fn rows(self) -> u32 {
        180 * 3600 / self.arcsec()
    }

    /// Number of columns spanning -180°..+180°.
    pub const fn columns(self) -> u32 {
        360 * 3600 / self.arcsec()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\"", self.arcsec())
    }
}

impl FromStr for Resolution {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('"');
        let arcsec = trimmed
            .parse::<u32>()
            .map_err(|_| AddressError::InvalidResolution(s.trim().to_string()))?;
        Resolution::from_arcsec(arcsec)
    }
}

/// Centre of a grid cell, in arc-seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialAddress {
    pub lat_arcsec: f64,
    pub lon_arcsec: f64,
}

impl SpatialAddress {
    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.lat_arcsec / ARCSEC_PER_DEGREE
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.lon_arcsec / ARCSEC_PER_DEGREE
    }
}

/// Split a node id into its (column, row) grid indices.
pub fn grid_indices(id: NodeId, resolution: Resolution) -> Result<(u32, u32), AddressError> {
    if id == 0 {
        return Err(AddressError::ReservedNodeId);
    }
    let packed = id - 1;
    let row = packed & ROW_MASK;
    let column = packed >> ROW_BITS;
    if row >= resolution.rows() || column >= resolution.columns() {
        return Err(AddressError::OutsideGrid {
            id,
            resolution: resolution.arcsec(),
            column,
            row,
        });
    }
    Ok((column, row))
}

/// Map a node id to the centre of its grid cell.
pub fn id_to_address(id: NodeId, resolution: Resolution) -> Result<SpatialAddress, AddressError> {
    let (column, row) = grid_indices(id, resolution)?;
    let res = f64::from(resolution.arcsec());
    Ok(SpatialAddress {
        lat_arcsec: (f64::from(row) + 0.5) * res - LAT_OFFSET,
        lon_arcsec: (f64::from(column) + 0.5) * res - LON_OFFSET,
    })
}

/// Map a coordinate to the id of the grid cell containing it.
///
/// The northern and eastern domain edges (+90°, +180°) belong to no cell.
pub fn address_to_id(
    lat_arcsec: f64,
    lon_arcsec: f64,
    resolution: Resolution,
) -> Result<NodeId, AddressError> {
    let out_of_domain = || AddressError::OutOfDomain {
        lat: lat_arcsec,
        lon: lon_arcsec,
    };
    if !lat_arcsec.is_finite() || !lon_arcsec.is_finite() {
        return Err(out_of_domain());
    }

    let res = f64::from(resolution.arcsec());
    let row = ((lat_arcsec + LAT_OFFSET) / res).floor();
    let column = ((lon_arcsec + LON_OFFSET) / res).floor();
    if row < 0.0
        || column < 0.0
        || row >= f64::from(resolution.rows())
        || column >= f64::from(resolution.columns())
    {
        return Err(out_of_domain());
    }

    // Both indices are bounded by the grid size checked above.
    let (row, column) = (row as u32, column as u32);
    Ok((column << ROW_BITS) + row + 1)
}

/// [`id_to_address`] in degrees: returns `(latitude, longitude)`.
pub fn id_to_degrees(id: NodeId, resolution: Resolution) -> Result<(f64, f64), AddressError> {
    let address = id_to_address(id, resolution)?;
    Ok((address.latitude(), address.longitude()))
}

/// [`address_to_id`] for a coordinate given in degrees.
pub fn degrees_to_id(lat: f64, lon: f64, resolution: Resolution) -> Result<NodeId, AddressError> {
    address_to_id(lat * ARCSEC_PER_DEGREE, lon * ARCSEC_PER_DEGREE, resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_cell_is_south_west_corner() {
        let addr = id_to_address(1, Resolution::Arcsec30).unwrap();
        assert_eq!(addr.lat_arcsec, 15.0 - LAT_OFFSET);
        assert_eq!(addr.lon_arcsec, 15.0 - LON_OFFSET);
        assert_eq!(address_to_id(addr.lat_arcsec, addr.lon_arcsec, Resolution::Arcsec30).unwrap(), 1);
    }

    #[test]
    fn column_lives_in_high_bits() {
        // column 2, row 7
        let id = (2 << 16) + 7 + 1;
        let addr = id_to_address(id, Resolution::Arcsec150).unwrap();
        assert_eq!(addr.lat_arcsec, 7.5 * 150.0 - LAT_OFFSET);
        assert_eq!(addr.lon_arcsec, 2.5 * 150.0 - LON_OFFSET);
        assert_eq!(grid_indices(id, Resolution::Arcsec150).unwrap(), (2, 7));
    }

    #[test]
    fn round_trip_both_resolutions() {
        for res in Resolution::ALL {
            let last_row = res.rows() - 1;
            let last_col = res.columns() - 1;
            let samples = [
                (0, 0),
                (0, last_row),
                (last_col, 0),
                (last_col, last_row),
                (res.columns() / 2, res.rows() / 2),
                (1234 % res.columns(), 4321 % res.rows()),
            ];
            for (col, row) in samples {
                let id = (col << 16) + row + 1;
                let addr = id_to_address(id, res).unwrap();
                let back = address_to_id(addr.lat_arcsec, addr.lon_arcsec, res).unwrap();
                assert_eq!(back, id, "round trip failed for id {id} at {res}");
            }
        }
    }

    #[test]
    fn any_point_in_cell_maps_to_cell() {
        let res = Resolution::Arcsec30;
        let id = address_to_id(0.0, 0.0, res).unwrap();
        let centre = id_to_address(id, res).unwrap();
        assert!((centre.lat_arcsec - 0.0).abs() <= 15.0);
        assert!((centre.lon_arcsec - 0.0).abs() <= 15.0);
        assert_eq!(address_to_id(centre.lat_arcsec + 14.9, centre.lon_arcsec - 14.9, res).unwrap(), id);
    }

    #[test]
    fn degrees_wrappers_agree() {
        let res = Resolution::Arcsec150;
        let id = degrees_to_id(47.6, -122.3, res).unwrap();
        let (lat, lon) = id_to_degrees(id, res).unwrap();
        assert!((lat - 47.6).abs() < 150.0 / 3600.0);
        assert!((lon + 122.3).abs() < 150.0 / 3600.0);
        assert_eq!(degrees_to_id(lat, lon, res).unwrap(), id);
    }

    #[test]
    fn unsupported_resolution_rejected() {
        assert!(matches!(
            Resolution::from_arcsec(60),
            Err(AddressError::UnsupportedResolution(60))
        ));
        assert!("45".parse::<Resolution>().is_err());
        let err = "fine".parse::<Resolution>().unwrap_err();
        assert!(matches!(err, AddressError::InvalidResolution(ref raw) if raw == "fine"));
        assert_eq!(err.to_string(), "'fine' is not a grid resolution in arc-seconds");
        assert_eq!("150".parse::<Resolution>().unwrap(), Resolution::Arcsec150);
        assert_eq!("30\"".parse::<Resolution>().unwrap(), Resolution::Arcsec30);
    }

    #[test]
    fn reserved_and_off_grid_ids_rejected() {
        assert!(matches!(
            id_to_address(0, Resolution::Arcsec30),
            Err(AddressError::ReservedNodeId)
        ));
        // Row 5000 exists on the 30" grid (21600 rows) but not on the 150" grid (4320 rows).
        let id = 5000 + 1;
        assert!(id_to_address(id, Resolution::Arcsec30).is_ok());
        assert!(matches!(
            id_to_address(id, Resolution::Arcsec150),
            Err(AddressError::OutsideGrid { row: 5000, .. })
        ));
        assert!(id_to_address(u32::MAX, Resolution::Arcsec30).is_err());
    }

    #[test]
    fn out_of_domain_coordinates_rejected() {
        let res = Resolution::Arcsec30;
        assert!(address_to_id(LAT_OFFSET, 0.0, res).is_err());
        assert!(address_to_id(0.0, LON_OFFSET, res).is_err());
        assert!(address_to_id(-LAT_OFFSET - 1.0, 0.0, res).is_err());
        assert!(address_to_id(f64::NAN, 0.0, res).is_err());
        assert!(address_to_id(-LAT_OFFSET, -LON_OFFSET, res).is_ok());
    }

    #[test]
    fn grid_dimensions() {
        assert_eq!(Resolution::Arcsec30.rows(), 21_600);
        assert_eq!(Resolution::Arcsec30.columns(), 43_200);
        assert_eq!(Resolution::Arcsec150.rows(), 4_320);
        assert_eq!(Resolution::Arcsec150.columns(), 8_640);
        assert_eq!(Resolution::Arcsec150.to_string(), "150\"");
    }
}
