//! CSV loaders for labeled transactions, categories, and corrections
//!
//! Columns are matched by header name (case-insensitive), so column order is
//! free. Expected headers:
//! - transactions: `id,date,description,amount,category_id,user_id`
//! - categories: `id,name,color`
//! - corrections: `description,category_id,date`

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, CategoryId, Transaction};

/// A user correction read from CSV, ready for `Categorizer::add_feedback`
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub description: String,
    pub category_id: CategoryId,
    pub date: Option<String>,
}

/// Column positions resolved from a header row
struct Columns {
    headers: StringRecord,
}

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        Self {
            headers: headers.clone(),
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.find(name)
            .ok_or_else(|| Error::InvalidData(format!("Missing required column: {}", name)))
    }
}

fn field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index.and_then(|i| record.get(i)).map(str::trim)
}

/// Load labeled transactions
///
/// Rows without an id get `row-<n>`; a missing or blank amount is 0.
pub fn load_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::new(rdr.headers()?);
    let description_col = columns.require("description")?;
    let category_col = columns.require("category_id")?;
    let id_col = columns.find("id");
    let date_col = columns.find("date");
    let amount_col = columns.find("amount");
    let user_col = columns.find("user_id");

    let mut transactions = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;

        let category_id = field(&record, Some(category_col)).unwrap_or_default();
        if category_id.is_empty() {
            return Err(Error::InvalidData(format!(
                "Row {}: missing category_id",
                row + 1
            )));
        }

        let amount = match field(&record, amount_col) {
            Some(s) if !s.is_empty() => parse_amount(s)
                .ok_or_else(|| Error::InvalidData(format!("Row {}: bad amount '{}'", row + 1, s)))?,
            _ => 0.0,
        };

        let id = field(&record, id_col)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("row-{}", row + 1));

        transactions.push(Transaction {
            id,
            date: field(&record, date_col).unwrap_or_default().to_string(),
            description: field(&record, Some(description_col))
                .unwrap_or_default()
                .to_string(),
            amount,
            category_id: CategoryId::from(category_id),
            user_id: field(&record, user_col).unwrap_or_default().to_string(),
        });
    }

    debug!("Loaded {} transactions", transactions.len());
    Ok(transactions)
}

/// Load the category catalog, preserving file order
pub fn load_categories<R: Read>(reader: R) -> Result<Vec<Category>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::new(rdr.headers()?);
    let id_col = columns.require("id")?;
    let name_col = columns.find("name");
    let color_col = columns.find("color");

    let mut categories = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let id = field(&record, Some(id_col)).unwrap_or_default();
        if id.is_empty() {
            return Err(Error::InvalidData(format!("Row {}: missing id", row + 1)));
        }
        let name = field(&record, name_col)
            .filter(|s| !s.is_empty())
            .unwrap_or(id);

        categories.push(Category {
            id: CategoryId::from(id),
            name: name.to_string(),
            color: field(&record, color_col).unwrap_or_default().to_string(),
        });
    }

    debug!("Loaded {} categories", categories.len());
    Ok(categories)
}

/// Load feedback corrections
pub fn load_corrections<R: Read>(reader: R) -> Result<Vec<Correction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::new(rdr.headers()?);
    let description_col = columns.require("description")?;
    let category_col = columns.require("category_id")?;
    let date_col = columns.find("date");

    let mut corrections = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let category_id = field(&record, Some(category_col)).unwrap_or_default();
        if category_id.is_empty() {
            continue;
        }
        corrections.push(Correction {
            description: field(&record, Some(description_col))
                .unwrap_or_default()
                .to_string(),
            category_id: CategoryId::from(category_id),
            date: field(&record, date_col)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        });
    }

    debug!("Loaded {} corrections", corrections.len());
    Ok(corrections)
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok()
}
