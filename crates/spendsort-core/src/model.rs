//! Trained model snapshot and signal fusion
//!
//! A `TrainedModel` is built in one pass from validated transactions and never
//! mutated afterwards. Retraining builds a new one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::CategorizerConfig;
use crate::math::normalized_share;
use crate::merchant::MerchantIndex;
use crate::models::{Catalog, CategoryId, Prediction, PredictionSource, Transaction};
use crate::profile::CategoryProfiles;
use crate::seasonal::SeasonalIndex;
use crate::vectorizer::TfIdfVectorizer;

/// Summary numbers for a trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    pub documents: usize,
    pub vocabulary_size: usize,
    pub merchants: usize,
    pub profiled_categories: usize,
    pub catalog_size: usize,
    pub trained_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    catalog: Catalog,
    vectorizer: TfIdfVectorizer,
    profiles: CategoryProfiles,
    merchants: MerchantIndex,
    seasonal: SeasonalIndex,
    documents: usize,
    trained_at: DateTime<Utc>,
}

impl TrainedModel {
    /// Build every index from validated transactions
    ///
    /// Returns None when there is nothing to learn from. All transaction
    /// categories must belong to `catalog`.
    pub fn build(catalog: Catalog, transactions: &[Transaction]) -> Option<Self> {
        if transactions.is_empty() || catalog.is_empty() {
            return None;
        }

        let descriptions: Vec<&str> = transactions
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        let labels: Vec<&CategoryId> = transactions.iter().map(|t| &t.category_id).collect();

        let mut vectorizer = TfIdfVectorizer::new();
        let vectors = vectorizer.fit_transform(&descriptions);

        let mut merchants = MerchantIndex::new();
        merchants.process(transactions);

        let mut seasonal = SeasonalIndex::new();
        seasonal.process(transactions);

        let profiles = CategoryProfiles::build(&catalog, &vectors, &labels);
        if profiles.is_empty() {
            return None;
        }

        Some(Self {
            catalog,
            vectorizer,
            profiles,
            merchants,
            seasonal,
            documents: transactions.len(),
            trained_at: Utc::now(),
        })
    }

    /// Predict a category by fusing merchant, content, and seasonal signals
    pub fn predict(
        &self,
        description: &str,
        date: Option<&str>,
        config: &CategorizerConfig,
    ) -> Prediction {
        let merchant = self.predict_by_merchant(description);
        if let Some(prediction) = &merchant {
            if prediction.confidence > config.merchant_threshold {
                trace!(
                    description,
                    category = %prediction.category_id,
                    confidence = prediction.confidence,
                    "Merchant short-circuit"
                );
                return prediction.clone();
            }
        }

        let content = self.predict_by_content(description);
        let boost = date.map(|d| self.seasonal_boost(d)).unwrap_or_default();

        let mut scores: Vec<(CategoryId, f64)> =
            self.catalog.ids().map(|id| (id.clone(), 0.0)).collect();

        if let Some(prediction) = &merchant {
            add_score(
                &mut scores,
                &prediction.category_id,
                prediction.confidence * config.merchant_weight,
            );
        }
        add_score(
            &mut scores,
            &content.category_id,
            content.confidence * config.content_weight,
        );
        for (category_id, factor) in &boost {
            add_score(&mut scores, category_id, factor * config.seasonal_weight);
        }

        let mut best: Option<&(CategoryId, f64)> = None;
        for entry in &scores {
            if best.map_or(true, |(_, top)| entry.1 > *top) {
                best = Some(entry);
            }
        }

        let Some((category_id, best_score)) = best else {
            return Prediction::new(
                content.category_id,
                content.confidence,
                PredictionSource::Fused,
            );
        };

        let confidence = normalized_share(*best_score, scores.iter().map(|(_, s)| *s))
            .unwrap_or(content.confidence);

        let category_id = if category_id.is_empty() {
            content.category_id.clone()
        } else {
            category_id.clone()
        };

        debug!(
            description,
            category = %category_id,
            confidence,
            merchant = merchant.is_some(),
            seasonal = !boost.is_empty(),
            "Fused prediction"
        );

        Prediction::new(category_id, confidence, PredictionSource::Fused)
    }

    /// Merchant-history signal alone
    pub fn predict_by_merchant(&self, description: &str) -> Option<Prediction> {
        self.merchants.predict(description)
    }

    /// Content-similarity signal alone
    pub fn predict_by_content(&self, description: &str) -> Prediction {
        self.profiles
            .predict(&self.vectorizer, description)
            .unwrap_or_else(|| {
                let fallback = self.catalog.ids().next().cloned().unwrap_or_default();
                Prediction::new(fallback, 0.0, PredictionSource::Content)
            })
    }

    /// Seasonal factors for a date; empty for unparseable dates
    pub fn seasonal_boost(&self, date: &str) -> Vec<(CategoryId, f64)> {
        self.seasonal.boost(date)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn profiles(&self) -> &CategoryProfiles {
        &self.profiles
    }

    pub fn merchants(&self) -> &MerchantIndex {
        &self.merchants
    }

    pub fn seasonal(&self) -> &SeasonalIndex {
        &self.seasonal
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            documents: self.documents,
            vocabulary_size: self.vectorizer.vocabulary_size(),
            merchants: self.merchants.len(),
            profiled_categories: self.profiles.len(),
            catalog_size: self.catalog.len(),
            trained_at: self.trained_at,
        }
    }

    /// Check invariants that `build` guarantees, for models restored from disk
    pub(crate) fn is_consistent(&self) -> bool {
        !self.catalog.is_empty()
            && self.vectorizer.is_consistent()
            && !self.profiles.is_empty()
            && self.profiles.iter().all(|p| {
                self.catalog.contains(&p.category_id)
                    && p.mean_vector.len() == self.vectorizer.vocabulary_size()
            })
    }
}

fn add_score(scores: &mut Vec<(CategoryId, f64)>, category_id: &CategoryId, amount: f64) {
    match scores.iter_mut().find(|(id, _)| id == category_id) {
        Some((_, score)) => *score += amount,
        None => scores.push((category_id.clone(), amount)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn catalog() -> Catalog {
        Catalog::new(&[
            Category::new("cat-food", "Food"),
            Category::new("cat-fun", "Entertainment"),
            Category::new("cat-gifts", "Gifts"),
        ])
    }

    fn tx(id: &str, date: &str, description: &str, category: &str) -> Transaction {
        Transaction::new(id, date, description, -12.0, category)
    }

    #[test]
    fn test_build_requires_transactions() {
        assert!(TrainedModel::build(catalog(), &[]).is_none());
        assert!(TrainedModel::build(
            Catalog::default(),
            &[tx("1", "2024-01-01", "coffee", "cat-food")]
        )
        .is_none());
    }

    #[test]
    fn test_merchant_short_circuit_returns_raw_confidence() {
        let transactions: Vec<Transaction> = (0..5)
            .map(|i| tx(&i.to_string(), "2024-02-01", "Blue Bottle", "cat-food"))
            .chain(std::iter::once(tx("9", "2024-12-10", "Movie night", "cat-fun")))
            .collect();
        let model = TrainedModel::build(catalog(), &transactions).unwrap();

        let prediction = model.predict("Blue Bottle", Some("2024-12-10"), &CategorizerConfig::default());
        assert_eq!(prediction.category_id, "cat-food");
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(prediction.source, PredictionSource::Merchant);
    }

    #[test]
    fn test_fusion_blends_signals() {
        // "corner store" is split 50/50 so the merchant signal cannot short-circuit
        let transactions = vec![
            tx("1", "2024-03-01", "corner store", "cat-food"),
            tx("2", "2024-12-05", "corner store", "cat-gifts"),
            tx("3", "2024-03-08", "bakery bread", "cat-food"),
            tx("4", "2024-06-08", "cinema", "cat-fun"),
        ];
        let model = TrainedModel::build(catalog(), &transactions).unwrap();
        let config = CategorizerConfig::default();

        // merchant 0.5 * 3 + content 0.5 * 2, nothing else scores
        let prediction = model.predict("corner store", None, &config);
        assert_eq!(prediction.source, PredictionSource::Fused);
        assert_eq!(prediction.category_id, "cat-food");
        assert_eq!(prediction.confidence, 1.0);

        // December adds the gifts seasonal factor, diluting confidence
        let december = model.predict("corner store", Some("2025-12-20"), &config);
        assert_eq!(december.category_id, "cat-food");
        assert!((december.confidence - 2.5 / 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_fused_tie_goes_to_catalog_order() {
        // Merchant picks gifts (seen first), content picks food (catalog
        // order); equal weights make the fused scores identical
        let transactions = vec![
            tx("1", "2024-03-01", "corner store", "cat-gifts"),
            tx("2", "2024-03-02", "corner store", "cat-food"),
            tx("3", "2024-06-08", "cinema", "cat-fun"),
        ];
        let model = TrainedModel::build(catalog(), &transactions).unwrap();
        let config = CategorizerConfig {
            merchant_weight: 2.0,
            content_weight: 2.0,
            ..CategorizerConfig::default()
        };

        let merchant = model.predict_by_merchant("corner store").unwrap();
        assert_eq!(merchant.category_id, "cat-gifts");
        assert_eq!(merchant.confidence, 0.5);
        let content = model.predict_by_content("corner store");
        assert_eq!(content.category_id, "cat-food");
        assert_eq!(content.confidence, 0.5);

        let prediction = model.predict("corner store", None, &config);
        assert_eq!(prediction.source, PredictionSource::Fused);
        assert_eq!(prediction.category_id, "cat-food");
        assert_eq!(prediction.confidence, 0.5);
    }

    #[test]
    fn test_fusion_confidence_matches_manual_computation() {
        let transactions = vec![
            tx("1", "2024-03-01", "corner store", "cat-food"),
            tx("2", "2024-12-05", "corner store", "cat-gifts"),
            tx("3", "2024-06-08", "cinema", "cat-fun"),
        ];
        let model = TrainedModel::build(catalog(), &transactions).unwrap();
        let config = CategorizerConfig::default();

        let merchant = model.predict_by_merchant("corner store").unwrap();
        let content = model.predict_by_content("corner store");
        assert_eq!(merchant.category_id, "cat-food");
        assert_eq!(merchant.confidence, 0.5);

        let prediction = model.predict("corner store", None, &config);
        let mut food = merchant.confidence * 3.0;
        let mut gifts = 0.0;
        if content.category_id == "cat-food" {
            food += content.confidence * 2.0;
        } else {
            gifts += content.confidence * 2.0;
        }
        let expected = food.max(gifts) / (food + gifts);
        assert!((prediction.confidence - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_date_means_no_seasonal_signal() {
        let transactions = vec![
            tx("1", "2024-03-01", "corner store", "cat-food"),
            tx("2", "2024-12-05", "corner store", "cat-gifts"),
        ];
        let model = TrainedModel::build(catalog(), &transactions).unwrap();
        let config = CategorizerConfig::default();

        assert!(model.seasonal_boost("whenever").is_empty());
        assert_eq!(
            model.predict("corner store", Some("whenever"), &config),
            model.predict("corner store", None, &config)
        );
    }

    #[test]
    fn test_stats() {
        let transactions = vec![
            tx("1", "2024-03-01", "corner store", "cat-food"),
            tx("2", "2024-06-08", "cinema tickets", "cat-fun"),
        ];
        let model = TrainedModel::build(catalog(), &transactions).unwrap();
        let stats = model.stats();

        assert_eq!(stats.documents, 2);
        assert_eq!(stats.vocabulary_size, 4);
        assert_eq!(stats.merchants, 2);
        assert_eq!(stats.profiled_categories, 2);
        assert_eq!(stats.catalog_size, 3);
        assert!(model.is_consistent());
    }
}
