//! Transaction categorizer
//!
//! Owns the current trained model and the feedback queue. Training builds a
//! complete `TrainedModel` off to the side and publishes it by swapping an
//! `Arc`, so predictions always see either the old or the new model, never a
//! partially built one. Training and retraining are serialized against each
//! other; predictions run concurrently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::CategorizerConfig;
use crate::error::{Error, Result};
use crate::evaluate::{self, Evaluation};
use crate::model::{ModelStats, TrainedModel};
use crate::models::{Catalog, Category, CategoryId, Feedback, Prediction, Transaction};

/// Snapshot format version written by `export_snapshot`
const SNAPSHOT_VERSION: u32 = 1;

/// Outcome of a training pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Whether a new model was published
    pub trained: bool,
    /// Transactions the model was built from
    pub documents: usize,
    pub vocabulary_size: usize,
    /// Transactions whose category is not in the catalog
    pub skipped_unknown_category: usize,
    /// Transactions with a blank description
    pub skipped_empty_description: usize,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    model: TrainedModel,
}

pub struct Categorizer {
    config: CategorizerConfig,
    model: RwLock<Option<Arc<TrainedModel>>>,
    /// Held for the whole of a train or retrain
    training: Mutex<()>,
    feedback: Mutex<Vec<Feedback>>,
    feedback_sequence: AtomicU64,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Categorizer {
    /// Create an untrained categorizer with default tuning
    pub fn new() -> Self {
        Self::with_config(CategorizerConfig::default())
    }

    pub fn with_config(config: CategorizerConfig) -> Self {
        Self {
            config,
            model: RwLock::new(None),
            training: Mutex::new(()),
            feedback: Mutex::new(Vec::new()),
            feedback_sequence: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CategorizerConfig {
        &self.config
    }

    /// Train on labeled transactions, replacing any previous model
    ///
    /// Empty input is a no-op and keeps the previous model. Transactions whose
    /// category is not in `categories`, or whose description is blank, are
    /// skipped.
    pub fn train(&self, transactions: &[Transaction], categories: &[Category]) -> TrainingSummary {
        let _guard = self.training.lock().unwrap_or_else(PoisonError::into_inner);
        self.train_exclusive(transactions, categories)
    }

    /// Predict the category of a new transaction description
    pub fn predict(&self, description: &str, date: Option<&str>) -> Result<Prediction> {
        let model = self.current_model().ok_or(Error::NotTrained)?;
        Ok(model.predict(description, date, &self.config))
    }

    /// Queue a user correction for the next `retrain_with_feedback`
    pub fn add_feedback(
        &self,
        description: &str,
        actual_category_id: impl Into<CategoryId>,
        date: Option<&str>,
    ) {
        let feedback = Feedback {
            sequence: self.feedback_sequence.fetch_add(1, Ordering::SeqCst),
            description: description.to_string(),
            actual_category_id: actual_category_id.into(),
            date: date.map(str::to_string),
        };
        debug!(
            description,
            category = %feedback.actual_category_id,
            "Queued categorization feedback"
        );
        self.feedback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(feedback);
    }

    /// Number of corrections waiting for a retrain
    pub fn pending_feedback(&self) -> usize {
        self.feedback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Fold queued corrections into `transactions` and retrain
    ///
    /// Returns None without touching the model when no feedback is queued.
    /// The consumed corrections are removed only if the retrain published a
    /// new model; feedback queued while retraining stays for the next round.
    pub fn retrain_with_feedback(
        &self,
        transactions: &[Transaction],
        categories: &[Category],
    ) -> Option<TrainingSummary> {
        let _guard = self.training.lock().unwrap_or_else(PoisonError::into_inner);

        let pending: Vec<Feedback> = self
            .feedback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if pending.is_empty() {
            debug!("No feedback queued, skipping retrain");
            return None;
        }

        let today = Utc::now().date_naive().to_string();
        let mut augmented = Vec::with_capacity(transactions.len() + pending.len());
        augmented.extend_from_slice(transactions);
        augmented.extend(pending.iter().map(|f| f.to_transaction(&today)));

        let summary = self.train_exclusive(&augmented, categories);
        if summary.trained {
            let mut queue = self.feedback.lock().unwrap_or_else(PoisonError::into_inner);
            let consumed = pending.len().min(queue.len());
            queue.drain(..consumed);
            info!(
                feedback = pending.len(),
                documents = summary.documents,
                "Retrained with feedback"
            );
        } else {
            warn!(
                feedback = pending.len(),
                "Retrain produced no model, keeping feedback queued"
            );
        }

        Some(summary)
    }

    /// Accuracy of the current model over labeled transactions
    ///
    /// All zeros when untrained or when `transactions` is empty.
    pub fn evaluate(&self, transactions: &[Transaction]) -> Evaluation {
        match self.current_model() {
            Some(model) => evaluate::evaluate(&model, &self.config, transactions),
            None => Evaluation::default(),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.current_model().is_some()
    }

    pub fn stats(&self) -> Option<ModelStats> {
        self.current_model().map(|model| model.stats())
    }

    /// The currently published model, if any
    pub fn current_model(&self) -> Option<Arc<TrainedModel>> {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Serialize the current model as JSON
    pub fn export_snapshot(&self) -> Result<String> {
        let model = self.current_model().ok_or(Error::NotTrained)?;
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            model: (*model).clone(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Replace the current model with one restored from `export_snapshot`
    pub fn import_snapshot(&self, json: &str) -> Result<ModelStats> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::InvalidData(format!(
                "Unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        if !snapshot.model.is_consistent() {
            return Err(Error::InvalidData(
                "Snapshot model is missing categories or has mismatched vectors".to_string(),
            ));
        }

        let _guard = self.training.lock().unwrap_or_else(PoisonError::into_inner);
        let stats = snapshot.model.stats();
        self.publish(snapshot.model);
        info!(documents = stats.documents, "Restored model snapshot");
        Ok(stats)
    }

    /// Train while the caller holds the training lock
    fn train_exclusive(
        &self,
        transactions: &[Transaction],
        categories: &[Category],
    ) -> TrainingSummary {
        let mut summary = TrainingSummary::default();
        if transactions.is_empty() {
            debug!("No transactions supplied, skipping training");
            return summary;
        }

        let catalog = Catalog::new(categories);
        let mut usable = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            if !catalog.contains(&transaction.category_id) {
                warn!(
                    transaction = %transaction.id,
                    category = %transaction.category_id,
                    "Skipping transaction with unknown category"
                );
                summary.skipped_unknown_category += 1;
                continue;
            }
            if transaction.description.trim().is_empty() {
                debug!(transaction = %transaction.id, "Skipping transaction with blank description");
                summary.skipped_empty_description += 1;
                continue;
            }
            usable.push(transaction.clone());
        }

        let Some(model) = TrainedModel::build(catalog, &usable) else {
            debug!(
                supplied = transactions.len(),
                "No usable transactions, keeping previous model"
            );
            return summary;
        };

        let stats = model.stats();
        summary.trained = true;
        summary.documents = stats.documents;
        summary.vocabulary_size = stats.vocabulary_size;

        self.publish(model);
        info!(
            documents = stats.documents,
            vocabulary = stats.vocabulary_size,
            merchants = stats.merchants,
            categories = stats.profiled_categories,
            "Categorizer trained"
        );

        summary
    }

    fn publish(&self, model: TrainedModel) {
        *self.model.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(model));
    }
}
