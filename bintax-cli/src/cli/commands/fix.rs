use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use bintax_core::RankSet;
use bintax_engine::{io, resolve_conflicts};

#[derive(Args)]
pub struct FixArgs {
    /// Input TSV file with one lineage per BIN
    #[arg(short = 'i', long, value_name = "FILE")]
    pub infile: PathBuf,

    /// Output TSV file with conflict-free lineages
    #[arg(short = 'o', long, value_name = "FILE")]
    pub outfile: PathBuf,

    /// Ordered rank column names, parent first
    #[arg(short = 'r', long, num_args = 1.., value_name = "RANK")]
    pub ranks: Option<Vec<String>>,

    /// Write the repair decisions as JSON
    #[arg(long, value_name = "FILE")]
    pub audit_out: Option<PathBuf>,
}

pub fn run(args: FixArgs) -> Result<()> {
    let ranks = match args.ranks {
        Some(names) => RankSet::new(names)?,
        None => RankSet::canonical(),
    };

    let table = io::read_lineage_table(&args.infile, &ranks)
        .with_context(|| format!("failed to read lineages from {}", args.infile.display()))?;
    info!(rows = table.len(), "loaded lineage table");

    let (repaired, decisions, passes) = resolve_conflicts(table, &ranks)?;
    info!(
        rows = repaired.len(),
        repairs = decisions.len(),
        passes,
        "lineage table is conflict-free"
    );

    io::write_lineage_table(&args.outfile, &repaired, &ranks)
        .with_context(|| format!("failed to write {}", args.outfile.display()))?;

    if let Some(path) = &args.audit_out {
        let json = serde_json::to_string_pretty(&decisions)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write audit to {}", path.display()))?;
    }
    Ok(())
}
