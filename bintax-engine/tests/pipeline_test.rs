//! End-to-end pipeline: read raw TSV, fill, reconcile, write

use std::io::Write;

use bintax_core::{BinUri, ConsensusConfig};
use bintax_engine::{fill_records, io, Reconciler};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_fill_consensus_repair_round_trip() {
    let dir = TempDir::new().unwrap();
    let infile = dir.path().join("records.tsv");
    let outfile = dir.path().join("consensus.tsv");

    let mut file = std::fs::File::create(&infile).unwrap();
    writeln!(
        file,
        "processid\tkingdom\tphylum\tclass\torder\tfamily\tgenus\tspecies\tbin_uri\tn"
    )
    .unwrap();
    // Unambiguous BIN
    writeln!(file, "p1\tAnimalia\tArthropoda\tInsecta\tLepidoptera\tOecophoridae\tGarrha\tGarrha carnea\tBOLD:A\t41").unwrap();
    // Ambiguous BIN: the fully classified lineage holds 6/8 = 75% < 80 at
    // species but 8/8 at genus
    writeln!(file, "p2\tAnimalia\tArthropoda\tInsecta\tLepidoptera\tGeometridae\tArhodia\tArhodia AH03\tBOLD:B\t6").unwrap();
    writeln!(file, "p3\tAnimalia\tArthropoda\tInsecta\tLepidoptera\tGeometridae\tArhodia\tArhodia lasiocamparia\tBOLD:B\t2").unwrap();
    // Placeholder-ancestored genus that conflicts with BOLD:D after
    // consensus and gets repaired away
    writeln!(file, "p4\tAnimalia\t\t\t\t\tAphaenogaster\t\tBOLD:C\t1").unwrap();
    writeln!(file, "p5\tAnimalia\tArthropoda\tInsecta\tHymenoptera\tFormicidae\tAphaenogaster\tAphaenogaster boulderensis\tBOLD:D\t3").unwrap();

    let config = ConsensusConfig::default();
    let reconciler = Reconciler::new(config).unwrap();
    let ranks = reconciler.ranks().clone();

    let raw = io::read_records(&infile, &ranks).unwrap();
    assert_eq!(raw.len(), 5);
    let records = fill_records(raw, &ranks).unwrap();

    // p4's missing ranks are filled from the last known ancestor
    let p4 = records.iter().find(|r| r.id.as_str() == "p4").unwrap();
    assert_eq!(p4.lineage.label(1), "Animalia_X");
    assert_eq!(p4.lineage.label(4), "Animalia_XXXX");
    assert_eq!(p4.lineage.label(5), "Aphaenogaster");
    assert_eq!(p4.lineage.label(6), "Aphaenogaster_X");

    let (table, audit) = reconciler.run(records, None).unwrap();

    // BOLD:C was removed by the uniqueness repairer, the rest survive
    let bins: Vec<&str> = table.iter().map(|r| r.bin.as_str()).collect();
    assert_eq!(bins, vec!["BOLD:A", "BOLD:B", "BOLD:D"]);
    assert_eq!(audit.repairs.len(), 1);

    let bold_b = table.iter().find(|r| r.bin == BinUri::new("BOLD:B")).unwrap();
    assert_eq!(bold_b.lineage.label(5), "Arhodia");
    assert_eq!(bold_b.lineage.label(6), "unresolved.Arhodia");

    io::write_lineage_table(&outfile, &table, &ranks).unwrap();
    let read_back = io::read_lineage_table(&outfile, &ranks).unwrap();
    assert_eq!(read_back, table);
}
