//! Deterministic train/test holdout split
//!
//! Transactions are shuffled by the SHA-256 of `seed:id:position` (position as
//! little-endian bytes) rather than a random number generator, so the same
//! seed always produces the same split.

use sha2::{Digest, Sha256};

use crate::models::Transaction;

/// Default share of transactions used for training
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

fn shuffle_key(seed: &str, transaction: &Transaction, position: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(b":");
    hasher.update(transaction.id.as_bytes());
    // Position disambiguates duplicate ids
    hasher.update(b":");
    hasher.update(position.to_le_bytes());
    hex::encode(hasher.finalize())
}

/// Split transactions into `(train, test)`
///
/// The training side gets `floor(len * train_ratio)` transactions; the ratio
/// is clamped to `[0, 1]`.
pub fn train_test_split(
    transactions: &[Transaction],
    train_ratio: f64,
    seed: &str,
) -> (Vec<Transaction>, Vec<Transaction>) {
    let ratio = if train_ratio.is_nan() {
        DEFAULT_TRAIN_RATIO
    } else {
        train_ratio.clamp(0.0, 1.0)
    };

    let mut keyed: Vec<(String, &Transaction)> = transactions
        .iter()
        .enumerate()
        .map(|(i, t)| (shuffle_key(seed, t, i), t))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let split_at = ((transactions.len() as f64) * ratio).floor() as usize;
    let mut train = Vec::with_capacity(split_at);
    let mut test = Vec::with_capacity(transactions.len() - split_at);
    for (i, (_, transaction)) in keyed.into_iter().enumerate() {
        if i < split_at {
            train.push(transaction.clone());
        } else {
            test.push(transaction.clone());
        }
    }

    (train, test)
}
