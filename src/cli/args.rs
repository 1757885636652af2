use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "copycat", version, about = "Source code near-duplicate detector")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Config file (default: ./copycat.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare every file against every other and rank them
    Batch {
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
        /// Only compare MinHash/LSH candidate pairs
        #[arg(long)]
        indexed: bool,
        /// MinHash threshold for candidate pairs (implies --indexed)
        #[arg(long)]
        threshold: Option<f64>,
        /// Language passed to the comparator
        #[arg(long)]
        language: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
        /// Score pairs on one thread
        #[arg(long)]
        sequential: bool,
    },
    /// Group files whose similarity to a seed file clears the threshold
    Clusters {
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
    },
    /// List MinHash/LSH candidate pairs without precise comparison
    Pairs {
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        min_similarity: Option<f64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
    },
    /// Estimate the similarity of two files
    Quick {
        #[arg(value_name = "FILE")]
        first: PathBuf,
        #[arg(value_name = "FILE")]
        second: PathBuf,
        #[arg(long, default_value = "128")]
        num_hashes: usize,
    },
}
