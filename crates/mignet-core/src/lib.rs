//! Core model for the spatial migration-network builder.
//!
//! Provides the node addressing scheme that maps node ids onto a fixed
//! arc-second grid, the migration types with their per-node link budgets,
//! and the [`MigrationNetwork`] container that the input, validation, and
//! binary crates pass between them.

pub mod address;
pub mod error;
pub mod migration;
pub mod network;

pub use address::{address_to_id, degrees_to_id, id_to_address, id_to_degrees, Resolution, SpatialAddress};
pub use error::{AddressError, NetworkError};
pub use migration::{MigrationType, SLOT_SIZE};
pub use network::{LinkRole, MigrationLink, MigrationNetwork, NodeId};
