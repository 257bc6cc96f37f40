use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::regression::{RoundingMode, TrainerParams};

/// Rows taken from the head of the training file to form the labeled subset.
pub const DEFAULT_TRAINING_ROWS: usize = 200;

/// Errors that may occur while loading pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The config parsed but its values are inconsistent.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything a [`Pipeline`](crate::pipeline::Pipeline) run needs to know
/// about the input schema and the model.
///
/// ```toml
/// feature_columns = ["Quantity", "TotalSalesValues"]
/// label_column = "Suspicious"
/// training_rows = 200      # 0 = use every training row
/// rounding = "half_even"   # or "half_up"
///
/// [trainer]
/// fit_intercept = true
/// rank_tolerance = 1e-12
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Ordered numeric columns that form the feature vector.
    pub feature_columns: Vec<String>,
    /// Categorical column holding the training label.
    pub label_column: String,
    /// Size of the labeled training subset. `0` keeps every row.
    pub training_rows: usize,
    pub rounding: RoundingMode,
    pub trainer: TrainerParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feature_columns: vec!["Quantity".to_string(), "TotalSalesValues".to_string()],
            label_column: "Suspicious".to_string(),
            training_rows: DEFAULT_TRAINING_ROWS,
            rounding: RoundingMode::default(),
            trainer: TrainerParams::default(),
        }
    }
}

impl PipelineConfig {
    /// Read and validate a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Training row limit, `None` meaning "all rows".
    pub fn training_limit(&self) -> Option<usize> {
        (self.training_rows > 0).then_some(self.training_rows)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feature_columns.is_empty() {
            return Err(ConfigError::Invalid(
                "feature_columns must name at least one column".into(),
            ));
        }
        let mut seen = HashSet::new();
        for col in &self.feature_columns {
            if !seen.insert(col.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "feature column '{col}' is listed twice"
                )));
            }
        }
        if self.label_column.is_empty() {
            return Err(ConfigError::Invalid("label_column must not be empty".into()));
        }
        if seen.contains(self.label_column.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "label column '{}' cannot also be a feature",
                self.label_column
            )));
        }
        let tol = self.trainer.rank_tolerance;
        if !(0.0..1.0).contains(&tol) {
            return Err(ConfigError::Invalid(format!(
                "trainer.rank_tolerance must be in [0, 1), got {tol}"
            )));
        }
        Ok(())
    }
}
