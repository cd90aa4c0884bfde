//! CLI command implementations
//!
//! Commands are organized by workflow:
//! - `train` - Train a model and optionally save a snapshot
//! - `predict` - Categorize a single description
//! - `evaluate` - Holdout accuracy report
//! - `feedback` - Apply corrections and compare accuracy

pub mod evaluate;
pub mod feedback;
pub mod predict;
pub mod train;

// Re-export command functions for main.rs
pub use evaluate::*;
pub use feedback::*;
pub use predict::*;
pub use train::*;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spendsort_core::{
    load_categories, load_transactions, Categorizer, CategorizerConfig, Category, Evaluation,
    Transaction, TrainingSummary,
};

/// Where `predict` gets its model from
pub enum ModelSource {
    /// Train from labeled CSVs
    Training {
        transactions: PathBuf,
        categories: PathBuf,
    },
    /// Restore a saved snapshot
    Snapshot(PathBuf),
}

/// Resolve the categorizer config from `--config` or the default locations
pub fn load_config(path: Option<&Path>) -> Result<CategorizerConfig> {
    match path {
        Some(path) => CategorizerConfig::load_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => CategorizerConfig::load().context("Failed to load config"),
    }
}

pub fn read_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open transactions file: {}", path.display()))?;
    load_transactions(file)
        .with_context(|| format!("Failed to parse transactions: {}", path.display()))
}

pub fn read_categories(path: &Path) -> Result<Vec<Category>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open categories file: {}", path.display()))?;
    load_categories(file).with_context(|| format!("Failed to parse categories: {}", path.display()))
}

/// Train a fresh categorizer, failing if no usable transactions remain
pub fn train_categorizer(
    config: CategorizerConfig,
    transactions: &[Transaction],
    categories: &[Category],
) -> Result<(Categorizer, TrainingSummary)> {
    let categorizer = Categorizer::with_config(config);
    let summary = categorizer.train(transactions, categories);
    if !summary.trained {
        anyhow::bail!(
            "No usable training data ({} transactions, {} with unknown categories, {} blank)",
            transactions.len(),
            summary.skipped_unknown_category,
            summary.skipped_empty_description
        );
    }
    Ok((categorizer, summary))
}

/// Write the categorizer's current model to a JSON file
pub fn save_snapshot(categorizer: &Categorizer, path: &Path) -> Result<()> {
    let json = categorizer.export_snapshot()?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))
}

/// Print the skipped-record counts of a training pass, if any
pub fn print_skipped(summary: &TrainingSummary) {
    if summary.skipped_unknown_category > 0 {
        println!(
            "⚠️  Skipped {} transactions with categories not in the catalog",
            summary.skipped_unknown_category
        );
    }
    if summary.skipped_empty_description > 0 {
        println!(
            "⚠️  Skipped {} transactions with blank descriptions",
            summary.skipped_empty_description
        );
    }
}

/// Print a per-category accuracy table
pub fn print_evaluation(evaluation: &Evaluation, categories: &[Category]) {
    println!(
        "{:<24} {:>8} {:>8} {:>9}",
        "Category", "Correct", "Total", "Accuracy"
    );
    println!("{}", "-".repeat(52));
    for (id, stats) in &evaluation.per_category {
        let name = categories
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or(id.as_str());
        let accuracy = if stats.total == 0 {
            "-".to_string()
        } else {
            format!("{:.1}%", stats.accuracy * 100.0)
        };
        println!(
            "{:<24} {:>8} {:>8} {:>9}",
            truncate(name, 24),
            stats.correct,
            stats.total,
            accuracy
        );
    }
    println!("{}", "-".repeat(52));
    println!(
        "{:<24} {:>8} {:>8} {:>8.1}%",
        "Overall",
        evaluation.correct,
        evaluation.total,
        evaluation.accuracy * 100.0
    );
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
