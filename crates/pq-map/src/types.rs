//! Resolution output types.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::{MapError, Result};

/// Marker used in the mapping log for unresolved logical columns.
pub const NOT_FOUND: &str = "NOT FOUND";

/// Ranking tuple for one header considered while resolving one spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCandidate {
    /// Preference score; higher wins.
    pub score: usize,
    /// Word count of the normalized header; lower wins.
    pub specificity: usize,
    /// Physical column index; lower wins.
    pub index: usize,
}

impl ColumnCandidate {
    /// Orders candidates best first: score desc, specificity asc, index asc.
    pub fn rank(&self, other: &Self) -> std::cmp::Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.specificity.cmp(&other.specificity))
            .then(self.index.cmp(&other.index))
    }
}

/// Logical name to physical index, `None` when unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<String, Option<usize>>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<usize>)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub(crate) fn set(&mut self, name: &str, index: Option<usize>) {
        self.entries.insert(name.to_string(), index);
    }

    /// Physical index of a resolved logical column.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries.get(name).copied().flatten()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Resolved `(logical, index)` pairs ordered by logical name.
    pub fn resolved(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .filter_map(|(name, index)| index.map(|i| (name.as_str(), i)))
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, index)| index.is_none())
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<usize>)> {
        self.entries.iter().map(|(name, index)| (name.as_str(), *index))
    }

    /// Distinct physical indices in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        self.entries
            .values()
            .flatten()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fails with every required name that is absent or unresolved.
    pub fn ensure_required<S: AsRef<str>>(&self, required: &[S]) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.is_resolved(name))
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MapError::MissingRequiredColumns { missing })
        }
    }
}

/// One audit line per logical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingLogEntry {
    pub target: String,
    /// Raw header text, or [`NOT_FOUND`].
    pub source: String,
    /// Physical index, or `-1`.
    pub index: i64,
}

impl MappingLogEntry {
    pub fn is_found(&self) -> bool {
        self.index >= 0
    }
}

impl fmt::Display for MappingLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {} [{}]", self.target, self.source, self.index)
    }
}

/// Mapping plus its audit log, sorted by logical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub mapping: ColumnMapping,
    pub log: Vec<MappingLogEntry>,
}

impl Resolution {
    pub fn ensure_required<S: AsRef<str>>(&self, required: &[S]) -> Result<()> {
        self.mapping.ensure_required(required)
    }
}
