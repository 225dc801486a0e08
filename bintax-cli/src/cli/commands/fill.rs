use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use bintax_core::RankSet;
use bintax_engine::{fill_records, io};

#[derive(Args)]
pub struct FillArgs {
    /// Input TSV file with occurrence records
    #[arg(short = 'i', long, value_name = "FILE")]
    pub infile: PathBuf,

    /// Output TSV file with fully labelled records
    #[arg(short = 'o', long, value_name = "FILE")]
    pub outfile: PathBuf,

    /// Ordered rank column names, parent first
    #[arg(short = 'r', long, num_args = 1.., value_name = "RANK")]
    pub ranks: Option<Vec<String>>,
}

pub fn run(args: FillArgs) -> Result<()> {
    let ranks = match args.ranks {
        Some(names) => RankSet::new(names)?,
        None => RankSet::canonical(),
    };

    let raw = io::read_records(&args.infile, &ranks)
        .with_context(|| format!("failed to read records from {}", args.infile.display()))?;
    info!(records = raw.len(), "loaded occurrence records");

    let missing = raw.iter().filter(|r| !r.lineage.is_filled()).count();
    let filled = fill_records(raw, &ranks)?;
    info!(records = filled.len(), missing, "filled missing rank labels");

    io::write_records(&args.outfile, &filled, &ranks)
        .with_context(|| format!("failed to write {}", args.outfile.display()))?;
    Ok(())
}
