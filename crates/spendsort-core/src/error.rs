//! Error types for Spendsort

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Model has not been trained yet")]
    NotTrained,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
