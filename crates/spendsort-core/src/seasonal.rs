//! Seasonal spending patterns
//!
//! Each category gets a 12-slot month distribution normalized to sum to 1.
//! Transactions with unparseable dates are skipped.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::math::safe_divide;
use crate::models::{CategoryId, Transaction};

pub const MONTHS: usize = 12;

/// Date layouts accepted for transaction dates, tried in order
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d %b %Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Parse a transaction date string into a calendar date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Zero-based month (0 = January) of a date string
pub fn month_of(s: &str) -> Option<usize> {
    parse_date(s).map(|date| date.month0() as usize)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalIndex {
    /// category -> normalized monthly factors, in first-observed order
    patterns: Vec<(CategoryId, [f64; MONTHS])>,
}

impl SeasonalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild monthly distributions from a full transaction set
    pub fn process(&mut self, transactions: &[Transaction]) {
        self.patterns.clear();

        for transaction in transactions {
            let slot = match self.slot_of(&transaction.category_id) {
                Some(slot) => slot,
                None => {
                    self.patterns
                        .push((transaction.category_id.clone(), [0.0; MONTHS]));
                    self.patterns.len() - 1
                }
            };

            match month_of(&transaction.date) {
                Some(month) => self.patterns[slot].1[month] += 1.0,
                None => trace!(
                    transaction = %transaction.id,
                    date = %transaction.date,
                    "Skipping unparseable date for seasonal index"
                ),
            }
        }

        for (_, months) in &mut self.patterns {
            let total: f64 = months.iter().sum();
            if total > 0.0 {
                for value in months.iter_mut() {
                    *value = safe_divide(*value, total, 0.0);
                }
            }
        }
    }

    /// Seasonal factor of every profiled category for the given date's month
    ///
    /// Unparseable dates yield no boost at all.
    pub fn boost(&self, date: &str) -> Vec<(CategoryId, f64)> {
        let Some(month) = month_of(date) else {
            trace!(date, "No seasonal boost for unparseable date");
            return Vec::new();
        };

        self.patterns
            .iter()
            .map(|(id, months)| (id.clone(), months[month]))
            .collect()
    }

    /// Normalized monthly factors for one category
    pub fn pattern(&self, category_id: &CategoryId) -> Option<&[f64; MONTHS]> {
        self.slot_of(category_id).map(|slot| &self.patterns[slot].1)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn slot_of(&self, category_id: &CategoryId) -> Option<usize> {
        self.patterns.iter().position(|(id, _)| id == category_id)
    }
}
