//! Structure inference for inventory sheets: header row, columns, categories

pub mod category;
pub mod columns;
pub mod header;

pub use category::CategoryTable;
pub use columns::{ColumnMap, ResolvedColumn, resolve_column};
pub use header::HeaderLocator;

use crate::config::ColumnCandidates;
use serde::{Deserialize, Serialize};

/// Logical asset attribute, independent of the literal column label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    Id,
    Description,
    Brand,
    Model,
    Serial,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 5] = [
        CanonicalField::Id,
        CanonicalField::Description,
        CanonicalField::Brand,
        CanonicalField::Model,
        CanonicalField::Serial,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            CanonicalField::Id => "ID",
            CanonicalField::Description => "DESCRIPTION",
            CanonicalField::Brand => "BRAND",
            CanonicalField::Model => "MODEL",
            CanonicalField::Serial => "SERIAL",
        }
    }

    /// Configured synonyms for this field
    pub fn candidates<'a>(&self, columns: &'a ColumnCandidates) -> &'a [String] {
        match self {
            CanonicalField::Id => &columns.id,
            CanonicalField::Description => &columns.description,
            CanonicalField::Brand => &columns.brand,
            CanonicalField::Model => &columns.model,
            CanonicalField::Serial => &columns.serial,
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
