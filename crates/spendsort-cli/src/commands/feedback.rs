//! Feedback command: apply corrections and retrain

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use spendsort_core::{
    load_corrections, Catalog, CategorizerConfig, Correction, Evaluation, Transaction,
};
use tracing::warn;

use super::{print_skipped, read_categories, read_transactions, save_snapshot, train_categorizer};

/// Accuracy on the corrected descriptions before and after retraining
#[derive(Debug)]
pub struct FeedbackReport {
    pub applied: usize,
    pub before: Evaluation,
    pub after: Evaluation,
}

pub fn read_corrections(path: &Path) -> Result<Vec<Correction>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open corrections file: {}", path.display()))?;
    load_corrections(file).with_context(|| format!("Failed to parse corrections: {}", path.display()))
}

/// Train, score the corrections, retrain with them, and score again
pub fn apply_feedback(
    config: CategorizerConfig,
    transactions_path: &Path,
    categories_path: &Path,
    corrections_path: &Path,
    snapshot: Option<&Path>,
) -> Result<FeedbackReport> {
    let transactions = read_transactions(transactions_path)?;
    let categories = read_categories(categories_path)?;
    let corrections = read_corrections(corrections_path)?;

    let (categorizer, summary) = train_categorizer(config, &transactions, &categories)?;
    print_skipped(&summary);

    let labeled: Vec<Transaction> = corrections
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Transaction::new(
                format!("correction-{}", i + 1),
                c.date.clone().unwrap_or_default(),
                c.description.clone(),
                0.0,
                c.category_id.clone(),
            )
        })
        .collect();

    let before = categorizer.evaluate(&labeled);

    let catalog = Catalog::new(&categories);
    for correction in &corrections {
        if let Err(e) = catalog.resolve(correction.category_id.as_str()) {
            warn!(
                description = %correction.description,
                error = %e,
                "Correction will be ignored by retraining"
            );
        }
        categorizer.add_feedback(
            &correction.description,
            correction.category_id.clone(),
            correction.date.as_deref(),
        );
    }

    if let Some(summary) = categorizer.retrain_with_feedback(&transactions, &categories) {
        print_skipped(&summary);
    }

    let after = categorizer.evaluate(&labeled);

    if let Some(path) = snapshot {
        save_snapshot(&categorizer, path)?;
    }

    Ok(FeedbackReport {
        applied: corrections.len(),
        before,
        after,
    })
}

pub fn cmd_feedback(
    config: CategorizerConfig,
    transactions_path: &Path,
    categories_path: &Path,
    corrections_path: &Path,
    snapshot: Option<&Path>,
) -> Result<()> {
    let report = apply_feedback(
        config,
        transactions_path,
        categories_path,
        corrections_path,
        snapshot,
    )?;

    if report.applied == 0 {
        println!("⚠️  No corrections found in {}", corrections_path.display());
        return Ok(());
    }

    println!("🔁 Retrained with {} corrections", report.applied);
    println!();
    println!(
        "   Before: {:>5.1}% ({}/{})",
        report.before.accuracy * 100.0,
        report.before.correct,
        report.before.total
    );
    println!(
        "   After:  {:>5.1}% ({}/{})",
        report.after.accuracy * 100.0,
        report.after.correct,
        report.after.total
    );

    if let Some(path) = snapshot {
        println!();
        println!("💾 Snapshot saved to: {}", path.display());
    }

    Ok(())
}
