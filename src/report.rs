// src/report.rs
//! Output formatting for batch, cluster and candidate-pair results.
//!
//! Terminal output is colored for people; JSON output is the serialized
//! result types for other tools.

use crate::batch::{BatchReport, ClusterReport, Comparison, Efficiency, FileRanking, Statistics};
use crate::index::{CandidateIndex, CandidatePair};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;

/// Formats a `[0, 1]` similarity as a percentage with one decimal.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Pretty-printed JSON for any result type.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Formats a batch report for terminal display.
#[must_use]
pub fn format_terminal(report: &BatchReport) -> String {
    let mut out = String::new();

    rule(&mut out);
    writeln!(out, "{}", " 📋 BATCH SIMILARITY REPORT ".cyan().bold()).ok();
    rule(&mut out);
    writeln!(out).ok();

    writeln!(out, "{}", "📊 SUMMARY".cyan().bold()).ok();
    writeln!(out).ok();
    writeln!(out, "   Files analyzed:   {}", report.file_count.to_string().white()).ok();
    writeln!(out, "   Language:         {}", report.language.white()).ok();
    writeln!(out, "   Strategy:         {}", report.strategy.label().white()).ok();
    writeln!(out, "   Comparisons:      {}", report.comparison_count.to_string().white()).ok();
    if report.failed_count > 0 {
        writeln!(out, "   Failed:           {}", report.failed_count.to_string().red()).ok();
    }
    writeln!(out).ok();

    write_statistics(&mut out, &report.statistics);
    if let Some(efficiency) = &report.efficiency {
        write_efficiency(&mut out, efficiency);
    }
    write_rankings(&mut out, &report.file_rankings);
    write_failures(&mut out, &report.comparisons);

    rule(&mut out);
    out
}

fn rule(out: &mut String) {
    writeln!(out, "{}", "─".repeat(70).dimmed()).ok();
}

fn write_statistics(out: &mut String, stats: &Statistics) {
    writeln!(out, "{}", "📈 SIMILARITY".cyan().bold()).ok();
    writeln!(out).ok();
    writeln!(out, "   Average: {}", percent(stats.average_similarity)).ok();
    writeln!(out, "   Min:     {}", percent(stats.min_similarity)).ok();
    writeln!(out, "   Max:     {}", severity(stats.max_similarity)).ok();

    if let Some(pair) = &stats.most_similar_pair {
        writeln!(
            out,
            "   Most similar: {} ↔ {} ({})",
            pair.first_name.yellow(),
            pair.second_name.yellow(),
            severity(pair.similarity)
        )
        .ok();
    }
    writeln!(out).ok();
}

fn write_efficiency(out: &mut String, e: &Efficiency) {
    writeln!(out, "{}", "⚡ CANDIDATE FILTERING".cyan().bold()).ok();
    writeln!(out).ok();
    writeln!(out, "   MinHash threshold: {}", percent(e.minhash_threshold)).ok();
    writeln!(out, "   Banding targets:   {}", percent(e.implied_threshold)).ok();
    writeln!(
        out,
        "   Candidate pairs:   {} of {}",
        e.candidate_pairs, e.total_possible_pairs
    )
    .ok();
    writeln!(
        out,
        "   Pairs skipped:     {} ({:.1}%)",
        e.pairs_skipped, e.efficiency_percentage
    )
    .ok();
    writeln!(out, "   Speedup:           {:.1}x", e.speedup).ok();
    writeln!(out).ok();
}

fn write_rankings(out: &mut String, rankings: &[FileRanking]) {
    if rankings.is_empty() {
        return;
    }
    writeln!(out, "{}", "🏷  FILE RANKINGS".cyan().bold()).ok();
    writeln!(out).ok();
    for (pos, r) in rankings.iter().enumerate() {
        writeln!(
            out,
            "   {:>3}. {:<40} {}",
            pos + 1,
            r.name,
            severity(r.average_similarity)
        )
        .ok();
    }
    writeln!(out).ok();
}

fn write_failures(out: &mut String, comparisons: &[Comparison]) {
    let failed: Vec<_> = comparisons.iter().filter(|c| c.is_failed()).collect();
    if failed.is_empty() {
        return;
    }
    writeln!(out, "{}", "⚠ FAILED COMPARISONS".red().bold()).ok();
    writeln!(out).ok();
    for c in failed {
        writeln!(
            out,
            "   {} ↔ {}: {}",
            c.first_name,
            c.second_name,
            c.error.as_deref().unwrap_or("unknown error").dimmed()
        )
        .ok();
    }
    writeln!(out).ok();
}

fn severity(value: f64) -> colored::ColoredString {
    let text = percent(value);
    if value >= 0.75 {
        text.red().bold()
    } else if value >= 0.5 {
        text.yellow()
    } else {
        text.green()
    }
}

/// Formats clusters for terminal display.
#[must_use]
pub fn format_clusters(report: &ClusterReport) -> String {
    let mut out = String::new();

    rule(&mut out);
    writeln!(out, "{}", " 🧩 SIMILARITY CLUSTERS ".cyan().bold()).ok();
    rule(&mut out);
    writeln!(out).ok();
    writeln!(
        out,
        "   Threshold: {}   Files: {}   Clusters: {}",
        percent(report.threshold),
        report.comparison.file_count,
        report.clusters.len()
    )
    .ok();
    writeln!(out).ok();

    if report.clusters.is_empty() {
        writeln!(out, "{}", "✨ No files cluster at this threshold.".green()).ok();
    }
    for cluster in &report.clusters {
        writeln!(
            out,
            "   {} {} files, average {}",
            format!("#{}", cluster.id).yellow().bold(),
            cluster.members.len(),
            severity(cluster.average_similarity)
        )
        .ok();
        for name in &cluster.names {
            writeln!(out, "      • {name}").ok();
        }
        writeln!(out).ok();
    }

    rule(&mut out);
    out
}

/// Formats MinHash candidate pairs, resolving ids to document names.
#[must_use]
pub fn format_pairs(index: &CandidateIndex, pairs: &[CandidatePair]) -> String {
    let mut out = String::new();
    let name = |id| index.document(id).map_or("?", |d| d.name.as_str());

    writeln!(
        out,
        "{}",
        format!("Found {} similar pairs among {} files", pairs.len(), index.len())
            .cyan()
            .bold()
    )
    .ok();
    writeln!(
        out,
        "   Banding targets {} similarity",
        percent(index.config().implied_threshold())
    )
    .ok();
    for p in pairs {
        writeln!(
            out,
            "   {} ↔ {}: {}",
            name(p.first),
            name(p.second),
            severity(p.estimate)
        )
        .ok();
    }
    out
}
