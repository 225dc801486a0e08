use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use bintax_core::{ConsensusConfig, ConsensusMethod};
use bintax_engine::{fill_records, io, Reconciler};

#[derive(Args)]
pub struct ConsensusArgs {
    /// Input TSV file with occurrence records
    #[arg(short = 'i', long, value_name = "FILE")]
    pub infile: PathBuf,

    /// Output TSV file with one consensus lineage per BIN
    #[arg(short = 'o', long, value_name = "FILE")]
    pub outfile: PathBuf,

    /// Consensus threshold (in %) for assigning a taxonomic label at a rank
    #[arg(short = 't', long, default_value = "80")]
    pub threshold: f64,

    /// Voting method
    #[arg(short = 'm', long, value_enum, default_value = "full")]
    pub method: ConsensusMethod,

    /// Discard placeholder-bearing candidate groups before the vote
    #[arg(long)]
    pub exclude_missing_data: bool,

    /// Ordered rank column names, parent first
    #[arg(short = 'r', long, num_args = 1.., value_name = "RANK")]
    pub ranks: Option<Vec<String>>,

    /// Baseline table from a previous run; fresh results take precedence
    #[arg(short = 'b', long, value_name = "FILE")]
    pub baseline: Option<PathBuf>,

    /// Write the reconciliation audit as JSON
    #[arg(long, value_name = "FILE")]
    pub audit_out: Option<PathBuf>,

    /// Load threshold/method/ranks from a TOML file instead of flags
    #[arg(short = 'c', long, value_name = "FILE", conflicts_with_all = ["threshold", "method", "ranks", "exclude_missing_data"])]
    pub config: Option<PathBuf>,
}

pub fn run(args: ConsensusArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ConsensusConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ConsensusConfig {
            threshold: args.threshold,
            method: args.method,
            exclude_missing_data: args.exclude_missing_data,
            ranks: args
                .ranks
                .clone()
                .unwrap_or_else(|| ConsensusConfig::default().ranks),
            ..Default::default()
        },
    };

    let reconciler = Reconciler::new(config)?;
    let ranks = reconciler.ranks().clone();

    let raw = io::read_records(&args.infile, &ranks)
        .with_context(|| format!("failed to read records from {}", args.infile.display()))?;
    info!(records = raw.len(), "loaded occurrence records");
    let records = fill_records(raw, &ranks)?;

    let baseline = match &args.baseline {
        Some(path) => Some(
            io::read_lineage_table(path, &ranks)
                .with_context(|| format!("failed to read baseline from {}", path.display()))?,
        ),
        None => None,
    };

    let (table, audit) = reconciler.run(records, baseline)?;
    info!(
        bins = table.len(),
        repairs = audit.repairs.len(),
        baseline_dropped = audit.baseline_dropped.len(),
        "reconciliation finished"
    );

    io::write_lineage_table(&args.outfile, &table, &ranks)
        .with_context(|| format!("failed to write {}", args.outfile.display()))?;

    if let Some(path) = &args.audit_out {
        let json = serde_json::to_string_pretty(&audit)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write audit to {}", path.display()))?;
    }
    Ok(())
}
