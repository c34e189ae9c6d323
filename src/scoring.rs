//! Per-example reconstruction-error scoring.
//!
//! After training, each test example is scored by how poorly the model
//! reconstructs it. The score uses the same mean-over-dimensions MSE as
//! training, so single-example scores are directly comparable with the
//! batch-averaged training loss regardless of batch size.

use crate::data::FeatureVector;
use crate::error::Result;
use crate::model::Autoencoder;
use crate::utils::mse;

/// One scored test example.
///
/// Created once during evaluation and never mutated; a high score means the
/// model reconstructs this example poorly relative to its peers.
#[derive(Debug, Clone)]
pub struct ScoredExample {
    /// Non-negative reconstruction loss.
    pub score: f32,
    /// Class label of the example.
    pub label: u8,
    /// The original feature vector (kept for export).
    pub features: FeatureVector,
}

/// Reconstruction error of a single example.
///
/// Computes `forward(example)` and returns the MSE between the output and
/// the example itself — the example is its own target, exactly as during
/// training.
pub fn reconstruction_error(model: &Autoencoder, example: &[f32]) -> Result<f32> {
    let reconstruction = model.forward(example)?;
    Ok(mse(&reconstruction, example))
}

/// Score every labeled test example.
pub fn score_examples(
    model: &Autoencoder,
    examples: &[(FeatureVector, u8)],
) -> Result<Vec<ScoredExample>> {
    examples
        .iter()
        .map(|(features, label)| {
            let score = reconstruction_error(model, features)?;
            Ok(ScoredExample {
                score,
                label: *label,
                features: features.clone(),
            })
        })
        .collect()
}
