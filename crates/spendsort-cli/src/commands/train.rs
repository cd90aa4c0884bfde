//! Train command

use std::path::Path;

use anyhow::Result;
use spendsort_core::CategorizerConfig;

use super::{print_skipped, read_categories, read_transactions, save_snapshot, train_categorizer};

/// Train on labeled transactions and print model statistics
pub fn cmd_train(
    config: CategorizerConfig,
    transactions_path: &Path,
    categories_path: &Path,
    snapshot: Option<&Path>,
) -> Result<()> {
    let transactions = read_transactions(transactions_path)?;
    let categories = read_categories(categories_path)?;

    println!(
        "🧠 Training on {} transactions across {} categories...",
        transactions.len(),
        categories.len()
    );

    let (categorizer, summary) = train_categorizer(config, &transactions, &categories)?;
    print_skipped(&summary);

    if let Some(stats) = categorizer.stats() {
        println!();
        println!("✅ Model trained");
        println!("   Documents:          {}", stats.documents);
        println!("   Vocabulary:         {} terms", stats.vocabulary_size);
        println!("   Merchants:          {}", stats.merchants);
        println!(
            "   Profiled:           {} of {} categories",
            stats.profiled_categories, stats.catalog_size
        );
        println!(
            "   Trained at:         {}",
            stats.trained_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    if let Some(path) = snapshot {
        save_snapshot(&categorizer, path)?;
        println!();
        println!("💾 Snapshot saved to: {}", path.display());
    }

    Ok(())
}
