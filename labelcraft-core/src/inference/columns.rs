//! Mapping canonical fields to the column labels a sheet actually uses

use super::CanonicalField;
use crate::config::ColumnCandidates;

/// Resolve one logical field against the header labels.
///
/// Candidates are tried in order. For each candidate an exact match (after
/// trimming and uppercasing) wins; otherwise the first label in column order
/// containing the candidate is taken. Returns the column index.
pub fn resolve_column<L, C>(labels: &[L], candidates: &[C]) -> Option<usize>
where
    L: AsRef<str>,
    C: AsRef<str>,
{
    let normalized: Vec<String> = labels
        .iter()
        .map(|label| label.as_ref().trim().to_uppercase())
        .collect();

    for candidate in candidates {
        let candidate = candidate.as_ref().trim().to_uppercase();
        if candidate.is_empty() {
            continue;
        }
        if let Some(index) = normalized.iter().position(|label| *label == candidate) {
            return Some(index);
        }
        if let Some(index) = normalized
            .iter()
            .position(|label| label.contains(candidate.as_str()))
        {
            return Some(index);
        }
    }

    None
}

/// A column found for a canonical field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    /// Label as written in the sheet
    pub label: String,
}

/// Canonical field -> actual column, for one sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: [Option<ResolvedColumn>; 5],
}

impl ColumnMap {
    /// Resolve every canonical field against the header labels
    pub fn resolve<L: AsRef<str>>(labels: &[L], candidates: &ColumnCandidates) -> Self {
        let mut map = ColumnMap::default();
        for field in CanonicalField::ALL {
            if let Some(index) = resolve_column(labels, field.candidates(candidates)) {
                map.insert(
                    field,
                    ResolvedColumn {
                        index,
                        label: labels[index].as_ref().to_string(),
                    },
                );
            }
        }
        map
    }

    pub fn insert(&mut self, field: CanonicalField, column: ResolvedColumn) {
        self.columns[field.slot()] = Some(column);
    }

    pub fn get(&self, field: CanonicalField) -> Option<&ResolvedColumn> {
        self.columns[field.slot()].as_ref()
    }

    pub fn index(&self, field: CanonicalField) -> Option<usize> {
        self.get(field).map(|c| c.index)
    }

    pub fn label(&self, field: CanonicalField) -> Option<&str> {
        self.get(field).map(|c| c.label.as_str())
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.get(field).is_some()
    }
}
