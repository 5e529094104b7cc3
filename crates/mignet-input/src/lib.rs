//! Input loaders for the migration-network builder.
//!
//! - [`demographics`]: reads the node roster and id-reference from a
//!   demographics JSON file.
//! - [`rates`]: reads the sparse `source destination rate` edge list into a
//!   [`MigrationNetwork`](mignet_core::MigrationNetwork) over that roster.

pub mod demographics;
pub mod error;
pub mod rates;

pub use demographics::{load_demographics, parse_demographics, Demographics};
pub use error::{InputError, Result};
pub use rates::{load_rates, parse_rates};
