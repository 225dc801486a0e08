//! Structured audit records for reconciliation decisions
//!
//! Repairs and baseline drops are reported as serialisable values rather
//! than log lines only, so callers can persist an audit trail next to the
//! output table.

use bintax_core::BinUri;
use serde::Serialize;

/// What the repairer did about one conflicting (rank, label) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum RepairAction {
    /// Rows with wholly placeholder-derived ancestors were excluded
    Removed { rows: usize },
    /// Each ancestor-path subgroup was renamed with its parent label prefix
    Prefixed { parents: Vec<String> },
}

/// One repair decision, keyed by the conflicting rank and label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairDecision {
    pub rank: String,
    pub label: String,
    #[serde(flatten)]
    pub action: RepairAction,
}

/// Summary of one reconciliation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileAudit {
    /// Distinct BINs seen in the input
    pub total_bins: usize,
    /// BINs with more than one candidate lineage
    pub ambiguous_bins: usize,
    /// BINs with a single candidate lineage, passed through unchanged
    pub unambiguous_bins: usize,
    /// Records without a BIN, passed through as singletons
    pub unclustered_records: usize,
    /// Validate/repair passes until the table was conflict-free
    pub repair_passes: usize,
    pub repairs: Vec<RepairDecision>,
    /// Baseline entries discarded in favour of freshly computed lineages
    pub baseline_dropped: Vec<BinUri>,
}
