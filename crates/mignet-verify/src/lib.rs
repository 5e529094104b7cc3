//! Structural validation for migration networks.
//!
//! Validation never fails a build. It completes the link map so that every
//! roster node has an entry, then reports coverage and capacity problems as
//! [`Warning`]s for the caller to log.

pub mod report;
pub mod validator;

pub use report::{ValidationReport, Warning, WarningKind};
pub use validator::{check_network, NetworkValidator};
