//! Error types for the anomaly detection pipeline.
//!
//! Every failure carries enough context (dimensions, epoch, batch index,
//! label) to diagnose without re-running. No operation retries internally.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;

/// Errors that can occur while training, scoring, ranking or exporting.
#[derive(Debug, Error)]
pub enum AnomalyError {
    /// An input vector's length does not match the configured feature length.
    #[error("dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A loss or gradient became non-finite during a single fit call.
    ///
    /// The trainer converts this into [`AnomalyError::NumericInstability`]
    /// with the failing epoch and batch attached.
    #[error("non-finite loss or gradient during fit")]
    NonFiniteUpdate,

    /// Training hit a non-finite loss or gradient; weights from the failing
    /// step were not applied.
    #[error("numeric instability at epoch {epoch}, batch {batch}")]
    NumericInstability { epoch: usize, batch: usize },

    /// A label bucket holds fewer examples than the requested extraction size.
    #[error("label {label} has only {available} scored examples, {requested} requested")]
    InsufficientData {
        label: u8,
        available: usize,
        requested: usize,
    },

    /// A scored example carries a label outside the configured class range.
    #[error("label {label} outside known range 0..{num_classes}")]
    UnknownLabel { label: u8, num_classes: usize },

    /// Invalid configuration value.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// I/O error during file operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encode or write failure for a single export item.
    #[error("failed to export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Serialization/deserialization error during model persistence.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AnomalyError {
    /// Create a new configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
