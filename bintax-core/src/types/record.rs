//! Occurrence records and per-BIN results

use crate::types::{Lineage, PartialLineage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// BOLD BIN identifier - newtype pattern for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BinUri(pub String);

impl BinUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BinUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BinUri {
    fn from(uri: &str) -> Self {
        Self(uri.to_string())
    }
}

/// Unique identifier of a single occurrence record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An occurrence record as read from input, prior to placeholder filling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: RecordId,
    /// Absent BIN means unclustered singleton
    pub bin: Option<BinUri>,
    pub lineage: PartialLineage,
    /// Count of underlying occurrences this row represents
    pub weight: u64,
}

/// A fully classified occurrence record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub bin: Option<BinUri>,
    pub lineage: Lineage,
    pub weight: u64,
}

/// One authoritative lineage per BIN: the consensus result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinLineage {
    pub bin: BinUri,
    pub lineage: Lineage,
}
