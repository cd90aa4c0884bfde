//! Predict command

use anyhow::{Context, Result};
use spendsort_core::{Categorizer, CategorizerConfig, Prediction};
use tracing::debug;

use super::{read_categories, read_transactions, train_categorizer, ModelSource};

/// Build a categorizer from training CSVs or a saved snapshot
pub fn open_categorizer(config: CategorizerConfig, source: &ModelSource) -> Result<Categorizer> {
    match source {
        ModelSource::Training {
            transactions,
            categories,
        } => {
            let transactions = read_transactions(transactions)?;
            let categories = read_categories(categories)?;
            let (categorizer, _) = train_categorizer(config, &transactions, &categories)?;
            Ok(categorizer)
        }
        ModelSource::Snapshot(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
            let categorizer = Categorizer::with_config(config);
            let stats = categorizer
                .import_snapshot(&json)
                .with_context(|| format!("Invalid snapshot: {}", path.display()))?;
            debug!(documents = stats.documents, "Loaded snapshot");
            Ok(categorizer)
        }
    }
}

/// Predict a single description
pub fn predict_one(
    config: CategorizerConfig,
    source: &ModelSource,
    description: &str,
    date: Option<&str>,
) -> Result<(Prediction, String)> {
    let categorizer = open_categorizer(config, source)?;
    let prediction = categorizer.predict(description, date)?;

    let name = categorizer
        .current_model()
        .and_then(|model| model.catalog().get(&prediction.category_id).map(|c| c.name.clone()))
        .unwrap_or_else(|| prediction.category_id.to_string());

    Ok((prediction, name))
}

/// Predict and print the category for a description
pub fn cmd_predict(
    config: CategorizerConfig,
    source: &ModelSource,
    description: &str,
    date: Option<&str>,
    json: bool,
) -> Result<()> {
    let (prediction, name) = predict_one(config, source, description, date)?;

    if json {
        let output = serde_json::json!({
            "description": description,
            "category_id": prediction.category_id,
            "category_name": name,
            "confidence": prediction.confidence,
            "source": prediction.source,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("🏷️  {}", description);
    println!(
        "   → {} ({}) {:.0}% via {}",
        name,
        prediction.category_id,
        prediction.confidence * 100.0,
        prediction.source
    );

    Ok(())
}
