//! Migration types and their fixed per-node link budgets.

use std::fmt;
use std::str::FromStr;

use crate::error::NetworkError;

/// Bytes per (destination id, rate) slot: a `u32` id plus an `f64` rate.
pub const SLOT_SIZE: usize = 4 + 8;

/// A category of travel. Each type reserves a fixed number of outbound
/// link slots per node in the binary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationType {
    Local,
    Regional,
    Sea,
    Air,
}

/// Name and link capacity of every migration type.
const MIGRATION_TABLE: [(MigrationType, &str, usize); 4] = [
    (MigrationType::Local, "LOCAL", 8),
    (MigrationType::Regional, "REGIONAL", 30),
    (MigrationType::Sea, "SEA", 5),
    (MigrationType::Air, "AIR", 60),
];

impl MigrationType {
    /// All migration types in table order.
    pub const ALL: [MigrationType; 4] = [
        MigrationType::Local,
        MigrationType::Regional,
        MigrationType::Sea,
        MigrationType::Air,
    ];

    const fn entry(self) -> (MigrationType, &'static str, usize) {
        MIGRATION_TABLE[self as usize]
    }

    /// Canonical upper-case name.
    pub const fn name(self) -> &'static str {
        self.entry().1
    }

    /// Maximum out-degree per node (`LinkCapacity`).
    pub const fn link_capacity(self) -> usize {
        self.entry().2
    }

    /// Size in bytes of one node record in the binary file.
    pub const fn record_size(self) -> usize {
        self.link_capacity() * SLOT_SIZE
    }

    /// Resolve a migration type from a case-insensitive prefix of its name,
    /// e.g. `"reg"` for [`MigrationType::Regional`].
    pub fn from_prefix(input: &str) -> Result<Self, NetworkError> {
        let wanted = input.trim().to_ascii_uppercase();
        if wanted.is_empty() {
            return Err(NetworkError::UnknownMigrationType(input.to_string()));
        }

        let matches: Vec<_> = MIGRATION_TABLE
            .iter()
            .filter(|(_, name, _)| name.starts_with(&wanted))
            .collect();

        match matches.as_slice() {
            [(kind, _, _)] => Ok(*kind),
            [] => Err(NetworkError::UnknownMigrationType(input.to_string())),
            many => Err(NetworkError::AmbiguousMigrationType {
                input: input.to_string(),
                candidates: many.iter().map(|(_, name, _)| *name).collect(),
            }),
        }
    }
}

impl fmt::Display for MigrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MigrationType {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MigrationType::from_prefix(s)
    }
}
