pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bintax",
    version,
    about = "Consensus taxonomy curation for BIN-clustered occurrence records",
    long_about = "bintax builds a curated taxonomic reference table from noisy occurrence \
                  records: missing rank labels are filled with placeholder chains, each BIN \
                  is reduced to one lineage by weighted threshold vote, and lineages whose \
                  labels map to more than one parent path are repaired."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill missing rank labels with placeholder chains
    Fill(commands::fill::FillArgs),

    /// Compute consensus taxonomies per BIN and reconcile the result
    Consensus(commands::consensus::ConsensusArgs),

    /// Repair non-unique lineages in a consensus table
    Fix(commands::fix::FixArgs),
}
