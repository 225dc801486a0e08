//! Reconciliation orchestrator
//!
//! Drives a run through four states: Loaded (records grouped by BIN and
//! split by ambiguity), Consensus-Computed (ambiguous groups reduced in
//! parallel), Reconciled (merged table repaired until conflict-free) and
//! Finalized (optional baseline merge). A failure in any BIN group aborts
//! the whole run; there is no partial result for a BIN.

use std::collections::{BTreeMap, BTreeSet};

use bintax_core::{
    BinLineage, BinUri, BintaxError, BintaxResult, ConsensusConfig, Lineage, RankSet, Record,
};
use rayon::prelude::*;
use tracing::info;

use crate::audit::ReconcileAudit;
use crate::consensus::consensus;
use crate::parallel::should_parallelize;
use crate::uniqueness::resolve_conflicts;

/// Group computations below this size stay on the calling thread
const PARALLEL_THRESHOLD: usize = 32;

/// Orchestrates consensus computation and uniqueness repair over a record table
pub struct Reconciler {
    config: ConsensusConfig,
    ranks: RankSet,
}

impl Reconciler {
    pub fn new(config: ConsensusConfig) -> BintaxResult<Self> {
        config.validate()?;
        let ranks = config.rank_set()?;
        Ok(Self { config, ranks })
    }

    pub fn ranks(&self) -> &RankSet {
        &self.ranks
    }

    /// Reduce records to one conflict-free lineage per BIN
    ///
    /// Baseline rows cover BINs from a previous run: they are kept for BINs
    /// the fresh input does not reach, while freshly computed lineages always
    /// win for BINs present in both. Discarded baseline rows are audited.
    pub fn run(
        &self,
        records: Vec<Record>,
        baseline: Option<Vec<BinLineage>>,
    ) -> BintaxResult<(Vec<BinLineage>, ReconcileAudit)> {
        let mut audit = ReconcileAudit::default();

        // Loaded: group by BIN; unclustered records pass through as
        // singletons keyed by their record id.
        let mut groups: BTreeMap<BinUri, Vec<Record>> = BTreeMap::new();
        let mut unclustered: Vec<BinLineage> = Vec::new();
        for record in records {
            if record.lineage.len() != self.ranks.len() {
                return Err(BintaxError::RankMismatch {
                    expected: self.ranks.len(),
                    found: record.lineage.len(),
                });
            }
            match record.bin.clone() {
                Some(bin) => groups.entry(bin).or_default().push(record),
                None => unclustered.push(BinLineage {
                    bin: BinUri::new(record.id.as_str()),
                    lineage: record.lineage,
                }),
            }
        }
        audit.total_bins = groups.len();
        audit.unclustered_records = unclustered.len();

        let mut unambiguous: Vec<BinLineage> = Vec::new();
        let mut ambiguous: Vec<(BinUri, Vec<Record>)> = Vec::new();
        for (bin, group) in groups {
            let distinct = group
                .iter()
                .map(|r| &r.lineage)
                .collect::<BTreeSet<&Lineage>>()
                .len();
            if distinct == 1 {
                let lineage = group.into_iter().next().expect("non-empty group").lineage;
                unambiguous.push(BinLineage { bin, lineage });
            } else {
                ambiguous.push((bin, group));
            }
        }
        audit.ambiguous_bins = ambiguous.len();
        audit.unambiguous_bins = unambiguous.len();
        info!(
            bins = audit.total_bins,
            ambiguous = audit.ambiguous_bins,
            unambiguous = audit.unambiguous_bins,
            unclustered = audit.unclustered_records,
            "loaded record table"
        );

        // Consensus-Computed: BIN groups are independent and read-only with
        // respect to each other; fan out unordered, collect by concatenation.
        let computed: BintaxResult<Vec<BinLineage>> =
            if should_parallelize(ambiguous.len(), PARALLEL_THRESHOLD) {
                ambiguous
                    .par_iter()
                    .map(|(bin, group)| consensus(bin, group, &self.ranks, &self.config))
                    .collect()
            } else {
                ambiguous
                    .iter()
                    .map(|(bin, group)| consensus(bin, group, &self.ranks, &self.config))
                    .collect()
            };
        let mut table = computed?;
        info!(groups = table.len(), "computed consensus lineages");
        table.append(&mut unambiguous);
        table.append(&mut unclustered);

        // Reconciled: repair until conflict-free
        let (mut table, decisions, passes) = resolve_conflicts(table, &self.ranks)?;
        if passes > 0 {
            info!(passes, repairs = decisions.len(), "repaired non-unique lineages");
        }
        audit.repairs = decisions;
        audit.repair_passes = passes;

        // Finalized: merge with the baseline, fresh results take precedence
        if let Some(baseline) = baseline {
            let index: BTreeMap<BinUri, usize> = table
                .iter()
                .enumerate()
                .map(|(i, row)| (row.bin.clone(), i))
                .collect();
            for row in baseline {
                match index.get(&row.bin) {
                    Some(&i) => {
                        if table[i].lineage != row.lineage {
                            audit.baseline_dropped.push(row.bin);
                        }
                    }
                    None => table.push(row),
                }
            }
            if !audit.baseline_dropped.is_empty() {
                info!(
                    dropped = audit.baseline_dropped.len(),
                    "baseline lineages superseded by fresh results"
                );
            }
        }

        table.sort_by(|a, b| a.bin.cmp(&b.bin));
        Ok((table, audit))
    }
}
