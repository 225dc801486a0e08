use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use bintax_core::BintaxError;

fn main() {
    let cli = Cli::parse();

    // Initialize logging with BINTAX_LOG environment variable support;
    // repeated -v flags raise the default level
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let log_level = std::env::var("BINTAX_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<BintaxError>() {
            Some(BintaxError::Configuration(_)) | Some(BintaxError::InvalidThreshold { .. }) => 2,
            Some(BintaxError::Io(_)) => 3,
            Some(BintaxError::Parse(_)) | Some(BintaxError::RankMismatch { .. }) => 4,
            Some(BintaxError::MissingRootLabel { .. })
            | Some(BintaxError::EmptyGroup { .. })
            | Some(BintaxError::InsufficientRanks) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    bintax_engine::parallel::configure_thread_pool(cli.threads)?;

    match cli.command {
        Commands::Fill(args) => crate::cli::commands::fill::run(args),
        Commands::Consensus(args) => crate::cli::commands::consensus::run(args),
        Commands::Fix(args) => crate::cli::commands::fix::run(args),
    }
}
