// src/cli/handlers.rs
use crate::batch::{BatchComparator, BatchOptions, SourceFile, Strategy};
use crate::cli::args::OutputFormat;
use crate::compare::SequenceComparator;
use crate::config::Config;
use crate::discovery;
use crate::index::{self, CandidateIndex};
use crate::report;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the batch command.
#[derive(Debug, Clone)]
pub struct BatchArgs {
    pub paths: Vec<PathBuf>,
    pub indexed: bool,
    pub threshold: Option<f64>,
    pub language: Option<String>,
    pub format: OutputFormat,
    pub sequential: bool,
}

/// Compares all discovered files and prints the report.
///
/// # Errors
/// Returns error if discovery fails, fewer than two files are found, or the
/// index configuration is invalid.
pub fn handle_batch(config: &Config, args: &BatchArgs) -> Result<()> {
    let files = load_sources(config, &args.paths)?;

    let mut index = config.index;
    if let Some(t) = args.threshold {
        index.threshold = t;
    }
    let strategy = if args.indexed || args.threshold.is_some() {
        Strategy::Indexed
    } else {
        config.batch.strategy
    };

    let options = BatchOptions {
        language: resolve_language(config, args.language.as_deref(), &files),
        parallel: config.batch.parallel && !args.sequential,
    };
    let batch = BatchComparator::new(SequenceComparator, options);
    let result = batch.run(&files, strategy, &index)?;

    match args.format {
        OutputFormat::Json => println!("{}", report::format_json(&result)?),
        OutputFormat::Terminal => print!("{}", report::format_terminal(&result)),
    }
    Ok(())
}

/// Clusters all discovered files and prints the groups.
///
/// # Errors
/// Returns error if discovery fails, fewer than two files are found, or the
/// threshold is out of range.
pub fn handle_clusters(
    config: &Config,
    paths: &[PathBuf],
    threshold: Option<f64>,
    language: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let threshold = threshold.unwrap_or(config.batch.cluster_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        bail!("cluster threshold {threshold} is outside [0, 1]");
    }
    let files = load_sources(config, paths)?;

    let options = BatchOptions {
        language: resolve_language(config, language, &files),
        parallel: config.batch.parallel,
    };
    let result = BatchComparator::new(SequenceComparator, options).find_clusters(&files, threshold);

    match format {
        OutputFormat::Json => println!("{}", report::format_json(&result)?),
        OutputFormat::Terminal => print!("{}", report::format_clusters(&result)),
    }
    Ok(())
}

#[derive(Serialize)]
struct NamedPair<'a> {
    first: &'a str,
    second: &'a str,
    estimate: f64,
}

/// Prints MinHash candidate pairs without running the comparator.
///
/// # Errors
/// Returns error if discovery fails or the index configuration is invalid.
pub fn handle_pairs(
    config: &Config,
    paths: &[PathBuf],
    min_similarity: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let files = discovery::collect_sources(paths, &config.batch)?;
    let mut index = CandidateIndex::new(config.index)?;
    for file in &files {
        index.add_document(&file.content, Some(&file.name))?;
    }
    let pairs = index.find_all_similar_pairs(min_similarity.unwrap_or(config.index.threshold))?;

    match format {
        OutputFormat::Terminal => print!("{}", report::format_pairs(&index, &pairs)),
        OutputFormat::Json => {
            let name = |id| index.document(id).map_or("", |d| d.name.as_str());
            let named: Vec<NamedPair<'_>> = pairs
                .iter()
                .map(|p| NamedPair {
                    first: name(p.first),
                    second: name(p.second),
                    estimate: p.estimate,
                })
                .collect();
            println!("{}", report::format_json(&named)?);
        }
    }
    Ok(())
}

/// Prints the MinHash estimate between two files.
///
/// # Errors
/// Returns error if either file cannot be read as text or `num_hashes` is 0.
pub fn handle_quick(first: &Path, second: &Path, num_hashes: usize) -> Result<()> {
    if num_hashes == 0 {
        bail!("--num-hashes must be positive");
    }
    let a = read_text(first)?;
    let b = read_text(second)?;
    let estimate = index::quick_similarity(&a, &b, num_hashes)?;

    println!(
        "{} ↔ {}: {} similar",
        first.display(),
        second.display(),
        report::percent(estimate).bold()
    );
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {} as text", path.display()))
}

fn load_sources(config: &Config, paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let files = discovery::collect_sources(paths, &config.batch)?;
    if files.len() < 2 {
        bail!(
            "At least 2 files are required for batch comparison (found {})",
            files.len()
        );
    }
    tracing::debug!(files = files.len(), "sources collected");
    Ok(files)
}

fn resolve_language(config: &Config, flag: Option<&str>, files: &[SourceFile]) -> String {
    flag.map(str::to_string)
        .or_else(|| config.batch.language.clone())
        .unwrap_or_else(|| {
            files
                .first()
                .map_or("text", |f| discovery::detect_language(&f.name))
                .to_string()
        })
}
