//! Analysis configuration file support.
//!
//! This module provides the explicit configuration every pipeline run
//! receives: the reporting window, the sample-size floor, the composite
//! score weights, and the grouping dimensions. Configuration can be built
//! in code or read from a TOML file; either way, [`AnalysisConfig::validate`]
//! runs before any data is touched.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::domain::{Dimension, MonthKey, MonthSpan};
use crate::error::ConfigError;

/// Tolerance allowed on the score-weight sum.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Weights of the three opportunity components. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_gap_weight")]
    pub gap: f64,
    #[serde(default = "default_seasonality_weight")]
    pub seasonality: f64,
    #[serde(default = "default_penetration_weight")]
    pub penetration: f64,
}

fn default_gap_weight() -> f64 {
    0.4
}

fn default_seasonality_weight() -> f64 {
    0.3
}

fn default_penetration_weight() -> f64 {
    0.3
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            gap: default_gap_weight(),
            seasonality: default_seasonality_weight(),
            penetration: default_penetration_weight(),
        }
    }
}

impl ScoreWeights {
    pub fn new(gap: f64, seasonality: f64, penetration: f64) -> Self {
        Self {
            gap,
            seasonality,
            penetration,
        }
    }

    pub fn sum(&self) -> f64 {
        self.gap + self.seasonality + self.penetration
    }

    /// Rejects weight sets that do not sum to 1.0 within [`WEIGHT_TOLERANCE`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::InvalidWeights { sum });
        }
        Ok(())
    }
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Inclusive reporting window; observations outside it are rejected.
    #[serde(default = "default_window")]
    pub window: MonthSpan,
    /// Groups with fewer records than this are excluded from gap metrics
    /// and reported as diagnostics.
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: usize,
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Dimensions the analyzers group by, in order.
    #[serde(default = "default_grouping")]
    pub grouping: Vec<Dimension>,
}

fn default_window() -> MonthSpan {
    // The current workbook year.
    MonthSpan::new(MonthKey::new(2024, 1), MonthKey::new(2024, 12))
}

fn default_min_sample_size() -> usize {
    5
}

fn default_grouping() -> Vec<Dimension> {
    vec![Dimension::Region, Dimension::FlavorSegment]
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            min_sample_size: default_min_sample_size(),
            weights: ScoreWeights::default(),
            grouping: default_grouping(),
        }
    }
}

impl AnalysisConfig {
    /// Default configuration over the given reporting window.
    pub fn for_window(window: MonthSpan) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Load analysis configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AnalysisConfig)` if read, parsed and validated successfully
    /// * `Err(ConfigError)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: format!("failed to read file: {e}"),
        })?;

        let config: AnalysisConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Unreadable {
                path: path.display().to_string(),
                message: format!("failed to parse TOML: {e}"),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load analysis configuration from the default location.
    ///
    /// Searches for `analysis.toml` in:
    /// 1. Current directory
    /// 2. `engine/` directory
    /// 3. Parent directory
    ///
    /// Falls back to the built-in defaults when no file exists; a file that
    /// exists but fails to read, parse or validate is still an error.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = vec![
            PathBuf::from("analysis.toml"),
            PathBuf::from("engine/analysis.toml"),
            PathBuf::from("../analysis.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Checks every configuration invariant, in declaration order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.grouping.is_empty() {
            return Err(ConfigError::EmptyGroupingDimensions);
        }
        if self.window.is_empty() {
            return Err(ConfigError::EmptyWindow {
                start: self.window.start,
                end: self.window.end,
            });
        }
        Ok(())
    }
}
