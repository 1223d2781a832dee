/// Configuration for the analysis heuristics.
///
/// Both tools run fine with no config file at all; an optional JSON file can
/// override the thresholds below. A missing or malformed file falls back to
/// defaults with a warning.
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

// ── Default value functions ──────────────────────────────────────────

fn default_max_median_ratio() -> f64 {
    5.0
}

fn default_small_share() -> f64 {
    0.10
}

fn default_variation_limit() -> f64 {
    0.75
}

fn default_language_outlier_limit() -> usize {
    3
}

fn default_top_connected() -> usize {
    10
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub thresholds: Thresholds,

    /// How many of the most-connected chunks the relation summary lists.
    #[serde(default = "default_top_connected")]
    pub top_connected: usize,
}

/// Thresholds driving the size-analyzer recommendations.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Thresholds {
    /// Flag when the largest chunk exceeds this multiple of the median.
    #[serde(default = "default_max_median_ratio")]
    pub max_median_ratio: f64,

    /// Flag when more than this share of chunks are small outliers.
    #[serde(default = "default_small_share")]
    pub small_share: f64,

    /// Flag when the coefficient of variation exceeds this value.
    #[serde(default = "default_variation_limit")]
    pub variation_limit: f64,

    /// Flag a language once it contributes more than this many large outliers.
    #[serde(default = "default_language_outlier_limit")]
    pub language_outlier_limit: usize,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            top_connected: default_top_connected(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_median_ratio: default_max_median_ratio(),
            small_share: default_small_share(),
            variation_limit: default_variation_limit(),
            language_outlier_limit: default_language_outlier_limit(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from an optional JSON file.
    ///
    /// `None` skips disk entirely. A path that does not exist or does not
    /// parse yields the defaults with a warning; the tools never fail over
    /// their config.
    #[must_use]
    pub fn load(config_path: Option<&Path>) -> Self {
        let Some(path) = config_path else {
            return Self::default();
        };

        let data = match std::fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) => {
                warn!("Failed to read config {}: {e}", path.display());
                warn!("Using default thresholds");
                return Self::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Invalid JSON in {}: {e}", path.display());
                warn!("Using default thresholds");
                Self::default()
            }
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.thresholds.max_median_ratio > 0.0,
            "thresholds.max_median_ratio must be positive"
        );
        anyhow::ensure!(
            self.thresholds.small_share > 0.0 && self.thresholds.small_share < 1.0,
            "thresholds.small_share must be between 0 and 1"
        );
        anyhow::ensure!(
            self.thresholds.variation_limit > 0.0,
            "thresholds.variation_limit must be positive"
        );
        anyhow::ensure!(self.top_connected > 0, "top_connected must be positive");
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
