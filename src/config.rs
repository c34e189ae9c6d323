//! Run configuration for the anomaly detection pipeline.
//!
//! All tunables live in one immutable [`RunConfig`] value consumed at
//! construction time — seed and hyperparameters are threaded through calls
//! explicitly rather than held as process-wide state, so several models can
//! coexist without interference.

use crate::error::{AnomalyError, Result};
use serde::Deserialize;
use std::fs;

/// Configuration for one training-and-evaluation run.
///
/// Deserialized from JSON; any omitted field falls back to its default.
///
/// # Example
///
/// ```json
/// {
///   "seed": 12345,
///   "epochs": 10,
///   "learning_rate": 0.05,
///   "optimizer": "adagrad"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seed driving weight initialization and the train/test split.
    pub seed: u64,

    /// Image height in pixels.
    pub rows: usize,

    /// Image width in pixels.
    pub columns: usize,

    /// Number of distinct class labels (labels are `0..num_classes`).
    pub num_classes: usize,

    /// Examples per training batch.
    pub batch_size: usize,

    /// Fixed number of training epochs; no early stopping.
    pub epochs: usize,

    /// Fraction of each batch assigned to the training subset, in (0, 1).
    pub train_split_percent: f32,

    /// Base learning rate for the optimizer.
    pub learning_rate: f32,

    /// L2 weight-decay coefficient applied to weights (never biases).
    pub l2_penalty: f32,

    /// Width of the bottleneck (encoding) layer.
    pub bottleneck_width: usize,

    /// Width of the two hidden layers flanking the bottleneck.
    pub hidden_width: usize,

    /// Number of best/worst examples extracted per class.
    pub top_k: usize,

    /// Optimizer kind: "adagrad" or "sgd".
    pub optimizer: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            rows: 28,
            columns: 28,
            num_classes: 10,
            batch_size: 100,
            epochs: 10,
            train_split_percent: 0.8,
            learning_rate: 0.05,
            l2_penalty: 1e-4,
            bottleneck_width: 10,
            hidden_width: 250,
            top_k: 5,
            optimizer: "adagrad".to_string(),
        }
    }
}

impl RunConfig {
    /// Flattened feature length D = rows × columns.
    pub fn feature_len(&self) -> usize {
        self.rows * self.columns
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::Config`] with a descriptive reason for the
    /// first invalid field found.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(AnomalyError::config("rows and columns must be greater than 0"));
        }
        if self.num_classes == 0 {
            return Err(AnomalyError::config("num_classes must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(AnomalyError::config("batch_size must be greater than 0"));
        }
        if self.epochs == 0 {
            return Err(AnomalyError::config("epochs must be greater than 0"));
        }
        if !(self.train_split_percent > 0.0 && self.train_split_percent < 1.0) {
            return Err(AnomalyError::config(
                "train_split_percent must be strictly between 0 and 1",
            ));
        }
        if self.learning_rate <= 0.0 {
            return Err(AnomalyError::config("learning_rate must be positive"));
        }
        if self.l2_penalty < 0.0 {
            return Err(AnomalyError::config("l2_penalty must be non-negative"));
        }
        if self.bottleneck_width == 0 || self.hidden_width == 0 {
            return Err(AnomalyError::config(
                "bottleneck_width and hidden_width must be greater than 0",
            ));
        }
        if self.top_k == 0 {
            return Err(AnomalyError::config("top_k must be greater than 0"));
        }
        let valid_optimizers = ["adagrad", "sgd"];
        if !valid_optimizers.contains(&self.optimizer.as_str()) {
            return Err(AnomalyError::config(format!(
                "invalid optimizer '{}'. Must be one of: {}",
                self.optimizer,
                valid_optimizers.join(", ")
            )));
        }
        Ok(())
    }
}

/// Loads a run configuration from a JSON file.
///
/// Reads the file at `path`, deserializes its JSON contents and validates
/// the result.
pub fn load_config(path: &str) -> Result<RunConfig> {
    let contents = fs::read_to_string(path)?;
    let config: RunConfig = serde_json::from_str(&contents)
        .map_err(|e| AnomalyError::config(format!("failed to parse {path}: {e}")))?;
    config.validate()?;
    Ok(config)
}
