//! Consensus scenarios over the Arhodia/Lepidoptera fixture
//!
//! Three candidate lineages for one BIN with weights 2/6/2, where the third
//! row is placeholder-classified below order but agrees with the second on
//! the species label. The two voting methods disagree on how deep this BIN
//! can be resolved.

use bintax_core::{
    BinLineage, BinUri, ConsensusConfig, ConsensusMethod, Lineage, RankSet, Record, RecordId,
};
use bintax_engine::consensus;
use pretty_assertions::assert_eq;

fn record(id: &str, labels: &[&str], weight: u64) -> Record {
    Record {
        id: RecordId::new(id),
        bin: Some(BinUri::new("test")),
        lineage: Lineage::new(labels.iter().map(|l| l.to_string()).collect()),
        weight,
    }
}

fn taxdata() -> Vec<Record> {
    vec![
        record(
            "r1",
            &["Animalia", "Arthropoda", "Insecta", "Lepidoptera", "Geometridae", "Arhodia", "Arhodia lasiocamparia"],
            2,
        ),
        record(
            "r2",
            &["Animalia", "Arthropoda", "Insecta", "Lepidoptera", "Geometridae", "Arhodia", "Arhodia AH03"],
            6,
        ),
        record(
            "r3",
            &["Animalia", "Arthropoda", "Insecta", "Lepidoptera", "Lepidoptera_X", "Lepidoptera_XX", "Arhodia AH03"],
            2,
        ),
    ]
}

fn run(threshold: f64, method: ConsensusMethod, ranks: &RankSet) -> BinLineage {
    let config = ConsensusConfig {
        threshold,
        method,
        ..Default::default()
    };
    consensus(&BinUri::new("test"), &taxdata(), ranks, &config).unwrap()
}

#[test]
fn full_method_stops_at_genus_at_80() {
    // No full-lineage group reaches 80% at species (2/6/2), but the
    // Geometridae/Arhodia tuple holds 8/10 at genus.
    let ranks = RankSet::canonical();
    let result = run(80.0, ConsensusMethod::Full, &ranks);
    assert_eq!(result.lineage.label(5), "Arhodia");
    assert_eq!(result.lineage.label(6), "unresolved.Arhodia");
}

#[test]
fn rank_method_resolves_species_at_80() {
    // Grouped by the species label alone, `Arhodia AH03` holds 8/10. The
    // surrounding labels come from the matching combination with the
    // fewest placeholders and highest weight: the weight-6 row.
    let ranks = RankSet::canonical();
    let result = run(80.0, ConsensusMethod::Rank, &ranks);
    assert_eq!(result.lineage.label(6), "Arhodia AH03");
    assert_eq!(result.lineage.label(5), "Arhodia");
    assert_eq!(result.lineage.label(4), "Geometridae");
}

#[test]
fn threshold_90_falls_back_to_order_for_both_methods() {
    // At 90 nothing qualifies until order, which is unanimous at 10/10;
    // family splits 80/20 and misses the bar.
    let ranks = RankSet::canonical();
    for method in [ConsensusMethod::Full, ConsensusMethod::Rank] {
        let result = run(90.0, method, &ranks);
        assert_eq!(result.lineage.label(3), "Lepidoptera");
        assert_eq!(result.lineage.label(4), "unresolved.Lepidoptera");
        assert_eq!(result.lineage.label(5), "unresolved.Lepidoptera");
        assert_eq!(result.lineage.label(6), "unresolved.Lepidoptera");
    }
}

#[test]
fn truncated_rank_set_resolves_genus_at_80() {
    // Without the species rank the 8/10 genus agreement wins directly for
    // both methods.
    let ranks = RankSet::new(
        ["kingdom", "phylum", "class", "order", "family", "genus"]
            .iter()
            .map(|r| r.to_string())
            .collect(),
    )
    .unwrap();
    let records: Vec<Record> = taxdata()
        .into_iter()
        .map(|r| Record {
            lineage: Lineage::new(r.lineage.prefix(6).to_vec()),
            ..r
        })
        .collect();
    for method in [ConsensusMethod::Full, ConsensusMethod::Rank] {
        let config = ConsensusConfig {
            threshold: 80.0,
            method,
            ranks: ranks.names().to_vec(),
            ..Default::default()
        };
        let result = consensus(&BinUri::new("test"), &records, &ranks, &config).unwrap();
        assert_eq!(result.lineage.label(5), "Arhodia");
    }
}

#[test]
fn inclusive_threshold_boundary() {
    // 8/10 is exactly 80%: the comparison is `>=`, so 80.0 qualifies and
    // 80.1 does not.
    let ranks = RankSet::canonical();
    let at = run(80.0, ConsensusMethod::Full, &ranks);
    assert_eq!(at.lineage.label(5), "Arhodia");
    let above = run(80.1, ConsensusMethod::Full, &ranks);
    assert_eq!(above.lineage.label(5), "unresolved.Lepidoptera");
    assert_eq!(above.lineage.label(3), "Lepidoptera");
}
