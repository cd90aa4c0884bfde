//! Content-based category profiles
//!
//! Each category is summarized by the mean TF-IDF vector of its training
//! descriptions and its share of the training set. A description is scored
//! against every profile by dot product weighted by the prior.

use serde::{Deserialize, Serialize};

use crate::math::{dot, normalized_share, safe_divide};
use crate::models::{Catalog, CategoryId, Prediction, PredictionSource};
use crate::vectorizer::{FeatureVector, TfIdfVectorizer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub category_id: CategoryId,
    pub mean_vector: FeatureVector,
    pub prior: f64,
    /// Number of training examples behind this profile
    pub examples: usize,
}

/// Profiles for every category with at least one training example, in
/// catalog order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfiles {
    profiles: Vec<CategoryProfile>,
}

impl CategoryProfiles {
    /// Build profiles from training vectors and their labels
    ///
    /// `labels[i]` is the category of `vectors[i]`. Labels outside the catalog
    /// are ignored; callers validate them before getting here.
    pub fn build(catalog: &Catalog, vectors: &[FeatureVector], labels: &[&CategoryId]) -> Self {
        let dimensions = vectors.first().map_or(0, Vec::len);
        let total = labels.len();

        let mut sums: Vec<(FeatureVector, usize)> = vec![(vec![0.0; dimensions], 0); catalog.len()];
        for (vector, label) in vectors.iter().zip(labels) {
            let Some(slot) = catalog.position(label) else {
                continue;
            };
            let (sum, count) = &mut sums[slot];
            for (acc, value) in sum.iter_mut().zip(vector) {
                *acc += value;
            }
            *count += 1;
        }

        let profiles = catalog
            .ids()
            .zip(sums)
            .filter(|(_, (_, count))| *count > 0)
            .map(|(id, (sum, count))| CategoryProfile {
                category_id: id.clone(),
                mean_vector: sum
                    .into_iter()
                    .map(|value| safe_divide(value, count as f64, 0.0))
                    .collect(),
                prior: safe_divide(count as f64, total as f64, 0.0),
                examples: count,
            })
            .collect();

        Self { profiles }
    }

    /// Score a description against every profile
    ///
    /// Returns `(category, dot(input, mean) * prior)` in catalog order.
    pub fn scores(&self, vectorizer: &TfIdfVectorizer, description: &str) -> Vec<(CategoryId, f64)> {
        let input = vectorizer.transform_one(description);
        self.profiles
            .iter()
            .map(|p| (p.category_id.clone(), dot(&input, &p.mean_vector) * p.prior))
            .collect()
    }

    /// Content-only prediction
    ///
    /// The first category to reach the maximum score wins. When nothing in
    /// the description overlaps the vocabulary, the highest prior wins.
    pub fn predict(&self, vectorizer: &TfIdfVectorizer, description: &str) -> Option<Prediction> {
        let scores = self.scores(vectorizer, description);

        let mut best: Option<(&CategoryId, f64)> = None;
        for (id, score) in &scores {
            if best.map_or(true, |(_, top)| *score > top) {
                best = Some((id, *score));
            }
        }

        let (mut category_id, mut best_score) = best?;
        if best_score == 0.0 {
            if let Some(profile) = self.highest_prior() {
                category_id = &profile.category_id;
                best_score = profile.prior;
            }
        }

        let confidence =
            normalized_share(best_score, scores.iter().map(|(_, s)| *s)).unwrap_or(0.0);

        Some(Prediction::new(
            category_id.clone(),
            confidence,
            PredictionSource::Content,
        ))
    }

    fn highest_prior(&self) -> Option<&CategoryProfile> {
        let mut best: Option<&CategoryProfile> = None;
        for profile in &self.profiles {
            if best.map_or(true, |b| profile.prior > b.prior) {
                best = Some(profile);
            }
        }
        best
    }

    pub fn get(&self, category_id: &CategoryId) -> Option<&CategoryProfile> {
        self.profiles.iter().find(|p| &p.category_id == category_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
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
            Category::new("cat-empty", "Unused"),
        ])
    }

    fn fitted(corpus: &[&str], labels: &[&str]) -> (TfIdfVectorizer, CategoryProfiles) {
        let mut vectorizer = TfIdfVectorizer::new();
        let vectors = vectorizer.fit_transform(corpus);
        let ids: Vec<CategoryId> = labels.iter().map(|l| CategoryId::from(*l)).collect();
        let refs: Vec<&CategoryId> = ids.iter().collect();
        let profiles = CategoryProfiles::build(&catalog(), &vectors, &refs);
        (vectorizer, profiles)
    }

    #[test]
    fn test_build_priors_and_means() {
        let (vectorizer, profiles) = fitted(
            &["coffee shop", "coffee beans", "movie night"],
            &["cat-food", "cat-food", "cat-fun"],
        );

        assert_eq!(profiles.len(), 2);
        let food = profiles.get(&CategoryId::from("cat-food")).unwrap();
        assert!((food.prior - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(food.examples, 2);
        assert_eq!(food.mean_vector.len(), vectorizer.vocabulary_size());

        let shop = vectorizer.index_of("shop").unwrap();
        let shop_weight = 0.5 * 3.0f64.ln();
        assert!((food.mean_vector[shop] - shop_weight / 2.0).abs() < 1e-12);

        let priors: f64 = profiles.iter().map(|p| p.prior).sum();
        assert!((priors - 1.0).abs() < 1e-12);
        assert!(profiles.get(&CategoryId::from("cat-empty")).is_none());
    }

    #[test]
    fn test_predict_by_overlap() {
        let (vectorizer, profiles) = fitted(
            &["coffee shop", "coffee beans", "movie night"],
            &["cat-food", "cat-food", "cat-fun"],
        );

        let prediction = profiles.predict(&vectorizer, "late movie").unwrap();
        assert_eq!(prediction.category_id, "cat-fun");
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(prediction.source, PredictionSource::Content);
    }

    #[test]
    fn test_predict_without_overlap_uses_highest_prior() {
        let (vectorizer, profiles) = fitted(
            &["movie night", "coffee shop", "coffee beans"],
            &["cat-fun", "cat-food", "cat-food"],
        );

        let prediction = profiles.predict(&vectorizer, "electric bill").unwrap();
        assert_eq!(prediction.category_id, "cat-food");
        assert_eq!(prediction.confidence, 0.0);
    }

    #[test]
    fn test_predict_tie_goes_to_catalog_order() {
        // Identical descriptions under two categories score identically
        let (vectorizer, profiles) = fitted(
            &["gift card", "gift card", "rent"],
            &["cat-fun", "cat-food", "cat-empty"],
        );

        let prediction = profiles.predict(&vectorizer, "gift card").unwrap();
        assert_eq!(prediction.category_id, "cat-food");
        assert_eq!(prediction.confidence, 0.5);
    }

    #[test]
    fn test_predict_empty_profiles() {
        let profiles = CategoryProfiles::default();
        assert!(profiles.predict(&TfIdfVectorizer::new(), "anything").is_none());
    }
}
