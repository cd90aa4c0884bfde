//! Merchant pattern memory
//!
//! A merchant key is a short canonical prefix of the description. The index
//! remembers, per merchant, how often each category was used.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::safe_divide;
use crate::models::{CategoryId, Prediction, PredictionSource, Transaction};

/// Separators checked in priority order; the first one present wins
const SEPARATORS: [&str; 5] = [" - ", "/", "payment to", "purchase at", "txn*"];

/// Number of leading words used when no separator is present
const MERCHANT_WORDS: usize = 3;

/// Extract the merchant key from a transaction description
///
/// Returns None for blank descriptions.
pub fn extract_merchant(description: &str) -> Option<String> {
    let cleaned = description.to_lowercase();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    for separator in SEPARATORS {
        if let Some((left, right)) = cleaned.split_once(separator) {
            let left = left.trim();
            if !left.is_empty() {
                return Some(left.to_string());
            }
            // Only the segment up to the next separator occurrence counts
            let right = right.split(separator).next().unwrap_or_default().trim();
            return (!right.is_empty()).then(|| right.to_string());
        }
    }

    let words: Vec<&str> = cleaned.split(' ').take(MERCHANT_WORDS).collect();
    Some(words.join(" "))
}

/// Per-merchant category occurrence counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MerchantIndex {
    /// merchant -> (category, count) in first-seen order
    merchants: HashMap<String, Vec<(CategoryId, usize)>>,
}

impl MerchantIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index from a full transaction set
    pub fn process(&mut self, transactions: &[Transaction]) {
        self.merchants.clear();

        for transaction in transactions {
            let Some(merchant) = extract_merchant(&transaction.description) else {
                continue;
            };
            let counts = self.merchants.entry(merchant).or_default();
            match counts
                .iter_mut()
                .find(|(id, _)| *id == transaction.category_id)
            {
                Some((_, count)) => *count += 1,
                None => counts.push((transaction.category_id.clone(), 1)),
            }
        }
    }

    /// Most frequent category for the description's merchant
    ///
    /// Ties go to the category seen first for that merchant during `process`.
    pub fn predict(&self, description: &str) -> Option<Prediction> {
        let merchant = extract_merchant(description)?;
        let counts = self.merchants.get(&merchant)?;

        let mut best: Option<&(CategoryId, usize)> = None;
        let mut total = 0usize;
        for entry in counts {
            total += entry.1;
            if best.map_or(true, |(_, count)| entry.1 > *count) {
                best = Some(entry);
            }
        }

        let (category_id, count) = best?;
        Some(Prediction::new(
            category_id.clone(),
            safe_divide(*count as f64, total as f64, 0.0),
            PredictionSource::Merchant,
        ))
    }

    /// Category counts recorded for a merchant key
    pub fn counts(&self, merchant: &str) -> Option<&[(CategoryId, usize)]> {
        self.merchants.get(merchant).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.merchants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merchants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(description: &str, category: &str) -> Transaction {
        Transaction::new("t", "2024-01-15", description, -10.0, category)
    }

    #[test]
    fn test_extract_merchant_first_three_words() {
        assert_eq!(
            extract_merchant("Coffee at Starbucks downtown"),
            Some("coffee at starbucks".to_string())
        );
        assert_eq!(extract_merchant("  NETFLIX  "), Some("netflix".to_string()));
    }

    #[test]
    fn test_extract_merchant_separator_left_side() {
        assert_eq!(
            extract_merchant("Shell Oil - Station 42"),
            Some("shell oil".to_string())
        );
        assert_eq!(
            extract_merchant("APPLE.COM/BILL"),
            Some("apple.com".to_string())
        );
    }

    #[test]
    fn test_extract_merchant_separator_priority() {
        // " - " is checked before "/" even though "/" appears first
        assert_eq!(
            extract_merchant("a/b - c"),
            Some("a/b".to_string())
        );
    }

    #[test]
    fn test_extract_merchant_falls_back_to_right_side() {
        assert_eq!(
            extract_merchant("Payment to Landlord LLC"),
            Some("landlord llc".to_string())
        );
        assert_eq!(
            extract_merchant("TXN*Uber Trip"),
            Some("uber trip".to_string())
        );
        assert_eq!(
            extract_merchant("/gym/monthly"),
            Some("gym".to_string())
        );
    }

    #[test]
    fn test_extract_merchant_blank() {
        assert_eq!(extract_merchant(""), None);
        assert_eq!(extract_merchant("   "), None);
        assert_eq!(extract_merchant("/"), None);
    }

    #[test]
    fn test_predict_most_frequent_category() {
        let mut index = MerchantIndex::new();
        index.process(&[
            tx("Costco Wholesale", "cat-groceries"),
            tx("Costco Wholesale", "cat-groceries"),
            tx("Costco Wholesale", "cat-shopping"),
        ]);

        let prediction = index.predict("COSTCO WHOLESALE").unwrap();
        assert_eq!(prediction.category_id, "cat-groceries");
        assert!((prediction.confidence - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(prediction.source, PredictionSource::Merchant);
    }

    #[test]
    fn test_predict_tie_goes_to_first_seen() {
        let mut index = MerchantIndex::new();
        index.process(&[
            tx("Target Store", "cat-shopping"),
            tx("Target Store", "cat-groceries"),
        ]);

        let prediction = index.predict("Target Store").unwrap();
        assert_eq!(prediction.category_id, "cat-shopping");
        assert_eq!(prediction.confidence, 0.5);
    }

    #[test]
    fn test_predict_unknown_merchant() {
        let mut index = MerchantIndex::new();
        index.process(&[tx("Costco Wholesale", "cat-groceries")]);

        assert!(index.predict("Whole Foods").is_none());
        assert!(index.predict("").is_none());
    }

    #[test]
    fn test_process_rebuilds() {
        let mut index = MerchantIndex::new();
        index.process(&[tx("Costco Wholesale", "cat-groceries")]);
        index.process(&[tx("Shell - pump 3", "cat-transport")]);

        assert_eq!(index.len(), 1);
        assert!(index.counts("costco wholesale").is_none());
        assert_eq!(
            index.counts("shell"),
            Some(&[(CategoryId::from("cat-transport"), 1)][..])
        );
    }
}
