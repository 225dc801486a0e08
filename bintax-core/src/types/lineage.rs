//! Lineage types: rank-aligned label sequences

use crate::types::label::is_placeholder;
use serde::{Deserialize, Serialize};

/// A fully labelled lineage, aligned with a [`RankSet`](crate::types::RankSet)
///
/// Every rank carries a non-empty label once a record has passed through the
/// placeholder filler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lineage {
    labels: Vec<String>,
}

impl Lineage {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at rank `index`
    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Labels of the first `depth` ranks
    pub fn prefix(&self, depth: usize) -> &[String] {
        &self.labels[..depth]
    }

    /// Ancestor labels of the rank at `index` (everything shallower)
    pub fn ancestors(&self, index: usize) -> &[String] {
        &self.labels[..index]
    }

    /// Replace the label at rank `index`
    pub fn set_label(&mut self, index: usize, label: String) {
        self.labels[index] = label;
    }

    /// Number of placeholder labels in the lineage
    pub fn placeholder_count(&self) -> usize {
        self.labels.iter().filter(|l| is_placeholder(l)).count()
    }

    /// Semicolon-joined lineage string, for logs and conflict keys
    pub fn join(&self, sep: &str) -> String {
        self.labels.join(sep)
    }
}

/// A lineage as read from input, possibly with missing rank labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialLineage {
    labels: Vec<Option<String>>,
}

impl PartialLineage {
    pub fn new(labels: Vec<Option<String>>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at rank `index`, if present
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels[index].as_deref()
    }

    /// True when every rank already carries a label
    pub fn is_filled(&self) -> bool {
        self.labels.iter().all(|l| l.is_some())
    }
}

impl From<Lineage> for PartialLineage {
    fn from(lineage: Lineage) -> Self {
        Self {
            labels: lineage.labels.into_iter().map(Some).collect(),
        }
    }
}
