//! Spendsort Core Library
//!
//! Transaction auto-categorization for personal finance tools:
//! - Description tokenizer and TF-IDF vectorizer
//! - Merchant pattern memory and seasonal spending priors
//! - Content-based category profiles
//! - Signal fusion predictor with a merchant short-circuit
//! - Feedback queue and retraining
//! - Accuracy evaluation and deterministic holdout split
//! - CSV loaders and JSON model snapshots

pub mod categorizer;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod import;
pub mod math;
pub mod merchant;
pub mod model;
pub mod models;
pub mod profile;
pub mod seasonal;
pub mod split;
pub mod tokenize;
pub mod vectorizer;

pub use categorizer::{Categorizer, TrainingSummary};
pub use config::CategorizerConfig;
pub use error::{Error, Result};
pub use evaluate::{CategoryAccuracy, Evaluation};
pub use import::{load_categories, load_corrections, load_transactions, Correction};
pub use math::safe_divide;
pub use merchant::{extract_merchant, MerchantIndex};
pub use model::{ModelStats, TrainedModel};
pub use models::{Catalog, Category, CategoryId, Feedback, Prediction, PredictionSource, Transaction};
pub use profile::{CategoryProfile, CategoryProfiles};
pub use seasonal::SeasonalIndex;
pub use split::train_test_split;
pub use tokenize::tokenize;
pub use vectorizer::{FeatureVector, TfIdfVectorizer};
