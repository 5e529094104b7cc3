//! Migration binary format and its JSON side-file.
//!
//! ## Binary Layout
//!
//! The binary file has no header of its own. It is a plain array of
//! fixed-size node records in roster order, little-endian:
//!
//! ```text
//! Record for one node (LinkCapacity = C):
//! ┌──────────────────────────────┐
//! │ destination ids: u32 × C     │  4·C bytes, unused slots 0
//! ├──────────────────────────────┤
//! │ rates: f64 × C               │  8·C bytes, unused slots 0.0
//! └──────────────────────────────┘
//! ```
//!
//! The JSON side-file ([`MigrationHeader`]) carries the node count, `C`
//! (as `DatavalueCount`), and a hex index of each node's byte offset.

mod error;
mod format;
mod header;

pub use error::{FormatError, Result};
pub use format::{content_digest, record_size, MigrationFile, NodeRecord};
pub use header::{decode_offsets, encode_offsets, BuildInfo, HeaderMetadata, MigrationHeader};
