//! Categorizer configuration
//!
//! Tunables for the prediction pipeline: the merchant short-circuit threshold
//! and the fusion weights for merchant, content, and seasonal signals.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/spendsort/config/categorizer.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/categorizer.toml");

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorizerConfig {
    /// Merchant confidence strictly above this skips the other signals
    pub merchant_threshold: f64,
    pub merchant_weight: f64,
    pub content_weight: f64,
    pub seasonal_weight: f64,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            merchant_threshold: 0.8,
            merchant_weight: 3.0,
            content_weight: 2.0,
            seasonal_weight: 1.0,
        }
    }
}

impl CategorizerConfig {
    /// Load from the default override location, or embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path, falling back to embedded defaults if the
    /// file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    fn validate(self) -> Result<Self> {
        if !(0.0..=1.0).contains(&self.merchant_threshold) {
            return Err(Error::Config(format!(
                "merchant short_circuit_threshold must be within [0, 1], got {}",
                self.merchant_threshold
            )));
        }
        for (name, weight) in [
            ("merchant_weight", self.merchant_weight),
            ("content_weight", self.content_weight),
            ("seasonal_weight", self.seasonal_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(self)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendsort").join("config").join("categorizer.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<CategorizerConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .filter(|p| p.exists());

    let content = match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading categorizer config");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?
        }
        None => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    merchant: Option<RawMerchant>,
    fusion: Option<RawFusion>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMerchant {
    short_circuit_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFusion {
    merchant_weight: Option<f64>,
    content_weight: Option<f64>,
    seasonal_weight: Option<f64>,
}

fn parse_config(content: &str) -> Result<CategorizerConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut config = CategorizerConfig::default();

    if let Some(merchant) = raw.merchant {
        if let Some(threshold) = merchant.short_circuit_threshold {
            config.merchant_threshold = threshold;
        }
    }

    if let Some(fusion) = raw.fusion {
        if let Some(weight) = fusion.merchant_weight {
            config.merchant_weight = weight;
        }
        if let Some(weight) = fusion.content_weight {
            config.content_weight = weight;
        }
        if let Some(weight) = fusion.seasonal_weight {
            config.seasonal_weight = weight;
        }
    }

    config.validate()
}
