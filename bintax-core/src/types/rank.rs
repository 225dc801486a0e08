//! Ordered taxonomic rank schema
//!
//! Rank order is semantically load-bearing: rank `i` is always the
//! parent-level of rank `i + 1`.

use crate::error::{BintaxError, BintaxResult};
use serde::{Deserialize, Serialize};

/// Canonical rank order used by BOLD-derived tables
pub const CANONICAL_RANKS: [&str; 7] = [
    "kingdom", "phylum", "class", "order", "family", "genus", "species",
];

/// An ordered, non-empty list of rank names shared by all engine components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSet {
    names: Vec<String>,
}

impl RankSet {
    /// Build a rank set from an ordered list of names
    pub fn new(names: Vec<String>) -> BintaxResult<Self> {
        if names.is_empty() {
            return Err(BintaxError::InsufficientRanks);
        }
        Ok(Self { names })
    }

    /// The canonical kingdom..species rank set
    pub fn canonical() -> Self {
        Self {
            names: CANONICAL_RANKS.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the rank at `index`
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Position of a rank by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Index of the parent rank, if any
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        index.checked_sub(1)
    }
}

impl Default for RankSet {
    fn default() -> Self {
        Self::canonical()
    }
}
