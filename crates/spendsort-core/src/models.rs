//! Domain models for Spendsort

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque category identifier (e.g. "cat-1")
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for CategoryId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CategoryId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Display color, carried through untouched
    #[serde(default)]
    pub color: String,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
        }
    }
}

/// A labeled transaction supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Calendar date as text; parsed lazily, invalid dates are tolerated
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category_id: CategoryId,
    #[serde(default)]
    pub user_id: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        category_id: impl Into<CategoryId>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            description: description.into(),
            amount,
            category_id: category_id.into(),
            user_id: String::new(),
        }
    }
}

/// Closed, insertion-ordered category catalog
///
/// Catalog order doubles as the tie-break order for content and fused scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog, keeping the first occurrence of duplicated ids
    pub fn new(categories: &[Category]) -> Self {
        let mut kept: Vec<Category> = Vec::with_capacity(categories.len());
        for category in categories {
            if !kept.iter().any(|c| c.id == category.id) {
                kept.push(category.clone());
            }
        }
        Self { categories: kept }
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &CategoryId) -> Option<usize> {
        self.categories.iter().position(|c| &c.id == id)
    }

    /// Validate a raw id against the catalog
    pub fn resolve(&self, id: &str) -> Result<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::UnknownCategory(id.to_string()))
    }

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &CategoryId> {
        self.categories.iter().map(|c| &c.id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Which signal produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    /// Merchant history was confident enough to skip the other signals
    Merchant,
    /// Content-similarity scoring alone
    Content,
    /// Weighted blend of merchant, content, and seasonal signals
    Fused,
}

impl PredictionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merchant => "merchant",
            Self::Content => "content",
            Self::Fused => "fused",
        }
    }
}

impl std::fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A predicted category with a confidence in `[0, 1]`
///
/// Confidence is a relative score, not a calibrated probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub category_id: CategoryId,
    pub confidence: f64,
    pub source: PredictionSource,
}

impl Prediction {
    pub fn new(category_id: CategoryId, confidence: f64, source: PredictionSource) -> Self {
        Self {
            category_id,
            confidence,
            source,
        }
    }
}

/// A user correction waiting to be folded into the training set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Per-categorizer sequence number, used for synthesized transaction ids
    pub sequence: u64,
    pub description: String,
    pub actual_category_id: CategoryId,
    pub date: Option<String>,
}

impl Feedback {
    /// Turn the correction into a zero-amount training transaction
    ///
    /// Corrections without a date are stamped with `fallback_date`.
    pub fn to_transaction(&self, fallback_date: &str) -> Transaction {
        Transaction {
            id: format!("feedback-{}", self.sequence),
            date: self.date.clone().unwrap_or_else(|| fallback_date.to_string()),
            description: self.description.clone(),
            amount: 0.0,
            category_id: self.actual_category_id.clone(),
            user_id: String::new(),
        }
    }
}
