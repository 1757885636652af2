// src/bin/copycat.rs
use std::process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use copycat_core::cli::handlers::{self, BatchArgs};
use copycat_core::cli::{Cli, Commands};
use copycat_core::config::Config;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;
    dispatch(&config, cli.command)
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Batch {
            paths,
            indexed,
            threshold,
            language,
            format,
            sequential,
        } => handlers::handle_batch(
            config,
            &BatchArgs {
                paths,
                indexed,
                threshold,
                language,
                format,
                sequential,
            },
        ),
        Commands::Clusters {
            paths,
            threshold,
            language,
            format,
        } => handlers::handle_clusters(config, &paths, threshold, language.as_deref(), format),
        Commands::Pairs {
            paths,
            min_similarity,
            format,
        } => handlers::handle_pairs(config, &paths, min_similarity, format),
        Commands::Quick {
            first,
            second,
            num_hashes,
        } => handlers::handle_quick(&first, &second, num_hashes),
    }
}
