//! Autoencoder Anomaly Detection
//!
//! Trains a symmetric dense autoencoder to reconstruct flattened grayscale
//! images and flags the examples it reconstructs worst as anomalies within
//! their class. Training is self-supervised: every batch is its own
//! reconstruction target, forcing the narrow bottleneck layer to learn a
//! compressed encoding of the data.
//!
//! # Modules
//!
//! - `config`: immutable run configuration (JSON-loadable)
//! - `data`: labeled feature batches and the seeded train/test split
//! - `error`: pipeline error types
//! - `export`: grayscale PNG rendering of ranked examples
//! - `layers`: dense layer with forward/backward passes
//! - `model`: the four-layer autoencoder (forward, fit, persistence)
//! - `optimizers`: Optimizer trait with AdaGrad and SGD implementations
//! - `ranking`: per-class score buckets and best/worst extraction
//! - `scoring`: per-example reconstruction error
//! - `trainer`: fixed-epoch training loop
//! - `utils`: seeded RNG, activations, MSE loss

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod layers;
pub mod model;
pub mod optimizers;
pub mod ranking;
pub mod scoring;
pub mod trainer;
pub mod utils;

pub use config::RunConfig;
pub use data::{Batch, FeatureVector, TrainTestSplit};
pub use error::{AnomalyError, Result};
pub use model::Autoencoder;
pub use ranking::{bucket_by_label, RankedBucket};
pub use scoring::{reconstruction_error, score_examples, ScoredExample};
