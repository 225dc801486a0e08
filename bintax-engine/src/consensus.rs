//! Per-BIN consensus taxonomy
//!
//! Iterates over rank depths from most to least specific and looks for the
//! deepest depth at which exactly one candidate lineage reaches the
//! agreement threshold. Ranks deeper than the winning depth are labelled
//! `unresolved.<last known taxon>`.

use std::collections::BTreeMap;

use bintax_core::types::{is_placeholder, unresolved};
use bintax_core::{
    BinLineage, BinUri, BintaxError, BintaxResult, ConsensusConfig, ConsensusMethod, Lineage,
    RankSet, Record,
};
use tracing::warn;

/// Compute the consensus lineage for the records of one BIN
///
/// Input records must be fully filled and share `bin`. The result is
/// independent of the input order: all grouping and scanning is
/// content-ordered, so groups may be processed in parallel and in any order.
pub fn consensus(
    bin: &BinUri,
    records: &[Record],
    ranks: &RankSet,
    config: &ConsensusConfig,
) -> BintaxResult<BinLineage> {
    if ranks.is_empty() {
        return Err(BintaxError::InsufficientRanks);
    }
    if records.is_empty() {
        return Err(BintaxError::EmptyGroup {
            bin: bin.to_string(),
        });
    }
    if !(config.threshold > 0.0 && config.threshold <= 100.0) {
        return Err(BintaxError::InvalidThreshold {
            value: config.threshold,
        });
    }

    let resolved = match config.method {
        ConsensusMethod::Full => full_consensus(records, ranks, config),
        ConsensusMethod::Rank => rank_consensus(records, ranks, config),
    };

    let resolved = match resolved {
        Some(labels) => labels,
        None => {
            // No depth produced a single qualifying group, which means the
            // BIN disagrees even at the root rank. Treat the coarsest rank
            // as trivially unanimous and resolve to the heaviest root.
            warn!(bin = %bin, "no consensus at any rank, falling back to heaviest root label");
            vec![heaviest_root(records)]
        }
    };

    Ok(finish(bin, resolved, ranks))
}

/// Append `unresolved.` markers for every rank deeper than the resolved depth
fn finish(bin: &BinUri, mut labels: Vec<String>, ranks: &RankSet) -> BinLineage {
    let last_known = labels
        .last()
        .expect("resolved prefix is never empty")
        .clone();
    while labels.len() < ranks.len() {
        labels.push(unresolved(&last_known));
    }
    BinLineage {
        bin: bin.clone(),
        lineage: Lineage::new(labels),
    }
}

/// `full` method: group records by the label tuple of the first `depth` ranks
fn full_consensus(
    records: &[Record],
    ranks: &RankSet,
    config: &ConsensusConfig,
) -> Option<Vec<String>> {
    for depth in (1..=ranks.len()).rev() {
        let mut groups: BTreeMap<Vec<String>, u64> = BTreeMap::new();
        for record in records {
            let key = record.lineage.prefix(depth).to_vec();
            *groups.entry(key).or_insert(0) += record.weight;
        }
        if config.exclude_missing_data {
            groups.retain(|labels, _| !labels.iter().any(|l| is_placeholder(l)));
        }
        if let Some(winner) = single_qualifying(&groups, config.threshold) {
            return Some(winner.clone());
        }
    }
    None
}

/// `rank` method: group records by the single label at the current rank
fn rank_consensus(
    records: &[Record],
    ranks: &RankSet,
    config: &ConsensusConfig,
) -> Option<Vec<String>> {
    for depth in (1..=ranks.len()).rev() {
        let mut groups: BTreeMap<String, u64> = BTreeMap::new();
        for record in records {
            let label = record.lineage.label(depth - 1).to_string();
            *groups.entry(label).or_insert(0) += record.weight;
        }
        if config.exclude_missing_data {
            groups.retain(|label, _| !is_placeholder(label));
        }
        if let Some(winner) = single_qualifying(&groups, config.threshold) {
            return Some(best_combination(records, depth, winner));
        }
    }
    None
}

/// The group meeting the threshold, if exactly one does
///
/// The threshold test is inclusive (`>=`); percentages are taken against
/// the summed weight of the candidate groups.
fn single_qualifying<K: Ord>(groups: &BTreeMap<K, u64>, threshold: f64) -> Option<&K> {
    let total: u64 = groups.values().sum();
    if total == 0 {
        return None;
    }
    let mut qualifying = groups
        .iter()
        .filter(|(_, weight)| (**weight as f64) / (total as f64) * 100.0 >= threshold);
    match (qualifying.next(), qualifying.next()) {
        (Some((key, _)), None) => Some(key),
        _ => None,
    }
}

/// Resolve surrounding labels for the `rank`-method winner
///
/// Records sharing the winning label at the resolved rank may still disagree
/// on the other ranks. Distinct label combinations are scored by ascending
/// placeholder count, then descending total weight, then label order; the
/// top combination supplies the resolved labels.
fn best_combination(records: &[Record], depth: usize, winner: &str) -> Vec<String> {
    let mut combos: BTreeMap<Vec<String>, u64> = BTreeMap::new();
    for record in records {
        if record.lineage.label(depth - 1) == winner {
            let key = record.lineage.prefix(depth).to_vec();
            *combos.entry(key).or_insert(0) += record.weight;
        }
    }
    combos
        .iter()
        .min_by(|(labels_a, weight_a), (labels_b, weight_b)| {
            let placeholders_a = labels_a.iter().filter(|l| is_placeholder(l)).count();
            let placeholders_b = labels_b.iter().filter(|l| is_placeholder(l)).count();
            placeholders_a
                .cmp(&placeholders_b)
                .then(weight_b.cmp(weight_a))
                .then(labels_a.cmp(labels_b))
        })
        .map(|(labels, _)| labels.clone())
        .expect("winner label always has at least one matching record")
}

/// Heaviest root label, ties broken by label order
fn heaviest_root(records: &[Record]) -> String {
    let mut roots: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        *roots.entry(record.lineage.label(0).to_string()).or_insert(0) += record.weight;
    }
    roots
        .iter()
        .max_by(|(label_a, weight_a), (label_b, weight_b)| {
            weight_a.cmp(weight_b).then(label_b.cmp(label_a))
        })
        .map(|(label, _)| label.clone())
        .expect("records are non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(labels: &[&str], weight: u64) -> Record {
        Record {
            id: bintax_core::RecordId::new(format!("r-{}", labels.join("-"))),
            bin: Some(BinUri::new("test")),
            lineage: Lineage::new(labels.iter().map(|l| l.to_string()).collect()),
            weight,
        }
    }

    fn config(threshold: f64, method: ConsensusMethod) -> ConsensusConfig {
        ConsensusConfig {
            threshold,
            method,
            ..Default::default()
        }
    }

    fn unanimous_records() -> Vec<Record> {
        vec![
            record(
                &["Animalia", "Arthropoda", "Insecta", "Lepidoptera", "Oecophoridae", "Garrha", "Garrha carnea"],
                41,
            ),
            record(
                &["Animalia", "Arthropoda", "Insecta", "Lepidoptera", "Oecophoridae", "Garrha", "Garrha carnea"],
                7,
            ),
        ]
    }

    #[test]
    fn test_unanimous_group_resolves_to_species() {
        let ranks = RankSet::canonical();
        let bin = BinUri::new("BOLD:AGS2783");
        let result = consensus(
            &bin,
            &unanimous_records(),
            &ranks,
            &config(80.0, ConsensusMethod::Full),
        )
        .unwrap();
        assert_eq!(result.lineage.label(6), "Garrha carnea");
        assert_eq!(result.bin, bin);
    }

    #[test]
    fn test_empty_group_rejected() {
        let ranks = RankSet::canonical();
        let err = consensus(
            &BinUri::new("BOLD:EMPTY"),
            &[],
            &ranks,
            &config(80.0, ConsensusMethod::Full),
        )
        .unwrap_err();
        match err {
            BintaxError::EmptyGroup { bin } => assert_eq!(bin, "BOLD:EMPTY"),
            other => panic!("expected EmptyGroup, got {other}"),
        }
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let ranks = RankSet::canonical();
        for value in [0.0, -5.0, 100.5] {
            let err = consensus(
                &BinUri::new("test"),
                &unanimous_records(),
                &ranks,
                &config(value, ConsensusMethod::Full),
            )
            .unwrap_err();
            assert!(matches!(err, BintaxError::InvalidThreshold { .. }));
        }
    }

    #[test]
    fn test_exclude_missing_data_blocks_placeholder_win() {
        // The placeholder lineage holds 75% of the weight, but with
        // exclude_missing_data it cannot win the vote at any deep rank.
        let ranks = RankSet::canonical();
        let records = vec![
            record(
                &["Animalia", "Animalia_X", "Animalia_XX", "Animalia_XXX", "Animalia_XXXX", "Animalia_XXXXX", "Animalia_XXXXXX"],
                9,
            ),
            record(
                &["Animalia", "Arthropoda", "Insecta", "Hymenoptera", "Formicidae", "Aphaenogaster", "Aphaenogaster sp."],
                3,
            ),
        ];
        let mut cfg = config(80.0, ConsensusMethod::Full);
        cfg.exclude_missing_data = true;
        let result = consensus(&BinUri::new("test"), &records, &ranks, &cfg).unwrap();
        assert_eq!(result.lineage.label(6), "Aphaenogaster sp.");

        // Without the toggle the 75% placeholder group still blocks any
        // deeper quorum, so only the kingdom resolves.
        cfg.exclude_missing_data = false;
        let result = consensus(&BinUri::new("test"), &records, &ranks, &cfg).unwrap();
        assert_eq!(result.lineage.label(0), "Animalia");
        assert_eq!(result.lineage.label(1), "unresolved.Animalia");
    }

    #[test]
    fn test_root_fallback_is_deterministic() {
        // Two root labels split 50/50: no depth yields a single qualifying
        // group at threshold 80, so the heaviest root wins with ties broken
        // by label order.
        let ranks = RankSet::new(vec!["kingdom".into(), "phylum".into()]).unwrap();
        let records = vec![
            record(&["Animalia", "Arthropoda"], 5),
            record(&["Fungi", "Ascomycota"], 5),
        ];
        let result = consensus(
            &BinUri::new("test"),
            &records,
            &ranks,
            &config(80.0, ConsensusMethod::Full),
        )
        .unwrap();
        assert_eq!(result.lineage.label(0), "Animalia");
        assert_eq!(result.lineage.label(1), "unresolved.Animalia");
    }

    #[test]
    fn test_order_independence() {
        let ranks = RankSet::canonical();
        let mut records = vec![
            record(&["Animalia", "Arthropoda", "Insecta", "Lepidoptera", "Geometridae", "Arhodia", "Arhodia lasiocamparia"], 2),
            record(&["Animalia", "Arthropoda", "Insecta", "Lepidoptera", "Geometridae", "Arhodia", "Arhodia AH03"], 6),
            record(&["Animalia", "Arthropoda", "Insecta", "Lepidoptera", "Lepidoptera_X", "Lepidoptera_XX", "Arhodia AH03"], 2),
        ];
        let cfg = config(80.0, ConsensusMethod::Rank);
        let forward = consensus(&BinUri::new("test"), &records, &ranks, &cfg).unwrap();
        records.reverse();
        let backward = consensus(&BinUri::new("test"), &records, &ranks, &cfg).unwrap();
        assert_eq!(forward, backward);
    }
}
