//! Lineage uniqueness: validation and repair
//!
//! A taxonomic label at any rank must map to exactly one parent lineage.
//! The validator finds labels that violate this, the repairer restores the
//! invariant by excluding rows whose ancestors are wholly placeholder-derived
//! or, failing that, by renaming the label per ancestor-path subgroup.

use std::collections::{BTreeMap, BTreeSet};

use bintax_core::types::is_placeholder;
use bintax_core::{BinLineage, BintaxError, BintaxResult, BinUri, RankSet};
use tracing::{debug, info};

use crate::audit::{RepairAction, RepairDecision};

/// Conflicting labels per rank index
pub type ConflictMap = BTreeMap<usize, BTreeSet<String>>;

/// Find labels whose rows disagree on the ancestor lineage
///
/// Rows are grouped by label once per rank and distinct ancestor tuples are
/// counted within each group, so large tables never pay a pairwise label
/// comparison.
pub fn find_conflicts(table: &[BinLineage], ranks: &RankSet) -> ConflictMap {
    let mut conflicts = ConflictMap::new();
    // The root rank has no parent path to disagree on.
    for rank_index in 1..ranks.len() {
        let mut ancestors_by_label: BTreeMap<&str, BTreeSet<&[String]>> = BTreeMap::new();
        for row in table {
            ancestors_by_label
                .entry(row.lineage.label(rank_index))
                .or_default()
                .insert(row.lineage.ancestors(rank_index));
        }
        let non_unique: BTreeSet<String> = ancestors_by_label
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(label, _)| label.to_string())
            .collect();
        if !non_unique.is_empty() {
            debug!(
                rank = ranks.name(rank_index),
                labels = non_unique.len(),
                "non-unique parent lineages"
            );
            conflicts.insert(rank_index, non_unique);
        }
    }
    conflicts
}

/// Repair one set of conflicts
///
/// Ancestor ranks are processed before descendant ranks so repairs stay
/// stable when conflicts cascade. Exclusions are collected during the pass
/// and applied only at the end, after every (rank, label) pair has been
/// processed.
pub fn repair(
    mut table: Vec<BinLineage>,
    conflicts: &ConflictMap,
    ranks: &RankSet,
) -> (Vec<BinLineage>, Vec<RepairDecision>) {
    let mut excluded: BTreeSet<BinUri> = BTreeSet::new();
    let mut decisions = Vec::new();

    for (&rank_index, labels) in conflicts {
        for label in labels {
            let members: Vec<usize> = table
                .iter()
                .enumerate()
                .filter(|(_, row)| row.lineage.label(rank_index) == label)
                .map(|(i, _)| i)
                .collect();
            if members.is_empty() {
                continue;
            }

            // Rows whose ancestor path below the root is entirely
            // placeholder-derived are candidates for exclusion.
            let candidates: Vec<usize> = members
                .iter()
                .copied()
                .filter(|&i| {
                    (1..rank_index).all(|k| is_placeholder(table[i].lineage.label(k)))
                })
                .collect();

            let remaining_paths: BTreeSet<&[String]> = members
                .iter()
                .copied()
                .filter(|i| !candidates.contains(i))
                .map(|i| table[i].lineage.ancestors(rank_index))
                .collect();

            if remaining_paths.len() == 1 && !candidates.is_empty() {
                info!(
                    rank = ranks.name(rank_index),
                    label = label.as_str(),
                    rows = candidates.len(),
                    "removing placeholder-ancestored rows"
                );
                excluded.extend(candidates.iter().map(|&i| table[i].bin.clone()));
                decisions.push(RepairDecision {
                    rank: ranks.name(rank_index).to_string(),
                    label: label.clone(),
                    action: RepairAction::Removed {
                        rows: candidates.len(),
                    },
                });
            } else {
                // Removal cannot restore uniqueness: rename the label per
                // ancestor-path subgroup with its parent label prefix.
                let mut parents: BTreeSet<String> = BTreeSet::new();
                for &i in &members {
                    let parent = table[i].lineage.label(rank_index - 1).to_string();
                    table[i]
                        .lineage
                        .set_label(rank_index, format!("{}_{}", parent, label));
                    parents.insert(parent);
                }
                info!(
                    rank = ranks.name(rank_index),
                    label = label.as_str(),
                    subgroups = parents.len(),
                    "prefixing with parent labels"
                );
                decisions.push(RepairDecision {
                    rank: ranks.name(rank_index).to_string(),
                    label: label.clone(),
                    action: RepairAction::Prefixed {
                        parents: parents.into_iter().collect(),
                    },
                });
            }
        }
    }

    table.retain(|row| !excluded.contains(&row.bin));
    (table, decisions)
}

/// Validate and repair until the table is conflict-free
///
/// Renames can cascade across ranks, so the pass repeats. A pass that
/// leaves the conflict map unchanged indicates an invariant-violation bug
/// and aborts instead of looping.
pub fn resolve_conflicts(
    mut table: Vec<BinLineage>,
    ranks: &RankSet,
) -> BintaxResult<(Vec<BinLineage>, Vec<RepairDecision>, usize)> {
    let mut decisions = Vec::new();
    let mut passes = 0;
    let mut previous: Option<ConflictMap> = None;

    loop {
        let conflicts = find_conflicts(&table, ranks);
        if conflicts.is_empty() {
            return Ok((table, decisions, passes));
        }
        if previous.as_ref() == Some(&conflicts) {
            let (&rank_index, labels) = conflicts.iter().next().expect("non-empty");
            return Err(BintaxError::UnresolvableConflict {
                rank: ranks.name(rank_index).to_string(),
                label: labels.iter().next().cloned().unwrap_or_default(),
            });
        }
        passes += 1;
        let (repaired, mut pass_decisions) = repair(table, &conflicts, ranks);
        table = repaired;
        decisions.append(&mut pass_decisions);
        previous = Some(conflicts);
    }
}
