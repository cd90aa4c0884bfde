//! Holdout evaluation command

use std::path::Path;

use anyhow::Result;
use spendsort_core::{train_test_split, CategorizerConfig, Category, Evaluation, Transaction};

use super::{print_evaluation, print_skipped, read_categories, read_transactions, train_categorizer};

/// Train on `train_ratio` of the transactions and evaluate on the rest
pub fn holdout_evaluation(
    config: CategorizerConfig,
    transactions: &[Transaction],
    categories: &[Category],
    train_ratio: f64,
    seed: &str,
) -> Result<(Evaluation, usize, usize)> {
    let (train, test) = train_test_split(transactions, train_ratio, seed);
    let (categorizer, summary) = train_categorizer(config, &train, categories)?;
    print_skipped(&summary);
    Ok((categorizer.evaluate(&test), train.len(), test.len()))
}

pub fn cmd_evaluate(
    config: CategorizerConfig,
    transactions_path: &Path,
    categories_path: &Path,
    train_ratio: f64,
    seed: &str,
) -> Result<()> {
    if !(0.0..=1.0).contains(&train_ratio) {
        anyhow::bail!("--train-ratio must be between 0 and 1, got {}", train_ratio);
    }

    let transactions = read_transactions(transactions_path)?;
    let categories = read_categories(categories_path)?;

    let (evaluation, train_len, test_len) =
        holdout_evaluation(config, &transactions, &categories, train_ratio, seed)?;

    println!(
        "📊 Holdout evaluation: trained on {}, tested on {} (seed \"{}\")",
        train_len, test_len, seed
    );
    println!();

    if test_len == 0 {
        println!("⚠️  Test split is empty. Lower --train-ratio or add more transactions.");
        return Ok(());
    }

    print_evaluation(&evaluation, &categories);
    Ok(())
}
