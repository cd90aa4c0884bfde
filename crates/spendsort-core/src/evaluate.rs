//! Accuracy evaluation over labeled transactions

use serde::{Deserialize, Serialize};

use crate::config::CategorizerConfig;
use crate::math::safe_divide;
use crate::model::TrainedModel;
use crate::models::{CategoryId, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryAccuracy {
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

/// Aggregate and per-category accuracy
///
/// Per-category tallies are keyed by the actual label of each transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    /// Catalog categories first (in catalog order), then any other labels seen
    pub per_category: Vec<(CategoryId, CategoryAccuracy)>,
}

impl Evaluation {
    pub fn category(&self, category_id: &CategoryId) -> Option<&CategoryAccuracy> {
        self.per_category
            .iter()
            .find(|(id, _)| id == category_id)
            .map(|(_, stats)| stats)
    }
}

/// Predict every transaction with `model` and tally hits against its label
pub fn evaluate(
    model: &TrainedModel,
    config: &CategorizerConfig,
    transactions: &[Transaction],
) -> Evaluation {
    if transactions.is_empty() {
        return Evaluation::default();
    }

    let mut per_category: Vec<(CategoryId, CategoryAccuracy)> = model
        .catalog()
        .ids()
        .map(|id| (id.clone(), CategoryAccuracy::default()))
        .collect();
    let mut correct = 0usize;

    for transaction in transactions {
        let prediction = model.predict(
            &transaction.description,
            Some(transaction.date.as_str()),
            config,
        );
        let hit = prediction.category_id == transaction.category_id;

        let slot = match per_category
            .iter()
            .position(|(id, _)| *id == transaction.category_id)
        {
            Some(slot) => slot,
            None => {
                per_category.push((
                    transaction.category_id.clone(),
                    CategoryAccuracy::default(),
                ));
                per_category.len() - 1
            }
        };

        let stats = &mut per_category[slot].1;
        stats.total += 1;
        if hit {
            stats.correct += 1;
            correct += 1;
        }
    }

    for (_, stats) in &mut per_category {
        stats.accuracy = safe_divide(stats.correct as f64, stats.total as f64, 0.0);
    }

    Evaluation {
        accuracy: safe_divide(correct as f64, transactions.len() as f64, 0.0),
        correct,
        total: transactions.len(),
        per_category,
    }
}
