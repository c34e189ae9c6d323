//! Fixed-epoch training loop.
//!
//! Drives repeated epochs over the training batches, calling fit with each
//! batch as both input and reconstruction target. Epochs are strictly
//! sequential — weights left by epoch N are the starting point of epoch
//! N+1 — and the batch order is never reshuffled: the split already fixed
//! it, and keeping it makes runs reproducible from the seed alone.

use crate::data::FeatureVector;
use crate::error::{AnomalyError, Result};
use crate::model::Autoencoder;
use std::time::Instant;

/// Train the model for a fixed number of epochs.
///
/// Iterates every batch in the supplied order once per epoch, self-supervised
/// (`fit(batch, batch)`). There is no early stopping or convergence check;
/// the loop runs for exactly `epochs` passes. Prints an epoch summary line
/// with the running average loss and elapsed time.
///
/// Returns the per-epoch average batch losses.
///
/// # Errors
///
/// A non-finite loss or gradient inside fit halts training immediately and
/// surfaces as [`AnomalyError::NumericInstability`] carrying the epoch
/// (1-based) and batch index (0-based) of the failing step.
pub fn train(
    model: &mut Autoencoder,
    batches: &[Vec<FeatureVector>],
    epochs: usize,
) -> Result<Vec<f32>> {
    println!("Model training: starts");
    let mut epoch_losses = Vec::with_capacity(epochs);

    for epoch in 1..=epochs {
        let start_time = Instant::now();
        let mut total_loss = 0.0f32;
        let mut batch_count = 0usize;

        for (batch_index, batch) in batches.iter().enumerate() {
            if batch.is_empty() {
                continue;
            }
            let loss = model.fit(batch, batch).map_err(|err| match err {
                AnomalyError::NonFiniteUpdate => AnomalyError::NumericInstability {
                    epoch,
                    batch: batch_index,
                },
                other => other,
            })?;
            total_loss += loss;
            batch_count += 1;
        }

        let average_loss = if batch_count > 0 {
            total_loss / batch_count as f32
        } else {
            0.0
        };
        epoch_losses.push(average_loss);
        println!(
            "Epoch {}/{}, Loss: {:.6} Time: {:.3}s",
            epoch,
            epochs,
            average_loss,
            start_time.elapsed().as_secs_f32()
        );
    }

    println!("Model training: ends");
    Ok(epoch_losses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::utils::SimpleRng;

    fn tiny_model() -> Autoencoder {
        let config = RunConfig {
            rows: 4,
            columns: 4,
            hidden_width: 8,
            bottleneck_width: 4,
            ..RunConfig::default()
        };
        let mut rng = SimpleRng::new(config.seed);
        Autoencoder::new(&config, &mut rng).unwrap()
    }

    #[test]
    fn test_train_returns_one_loss_per_epoch() {
        let mut model = tiny_model();
        let batches = vec![vec![vec![0.5f32; 16]; 4]];
        let losses = train(&mut model, &batches, 3).unwrap();
        assert_eq!(losses.len(), 3);
        assert!(losses.iter().all(|l| l.is_finite() && *l >= 0.0));
    }

    #[test]
    fn test_train_skips_empty_batches() {
        let mut model = tiny_model();
        let batches = vec![Vec::new(), vec![vec![0.5f32; 16]; 2]];
        assert!(train(&mut model, &batches, 1).is_ok());
    }

    #[test]
    fn test_train_surfaces_instability_context() {
        let mut model = tiny_model();
        let batches = vec![
            vec![vec![0.5f32; 16]; 2],
            vec![vec![f32::NAN; 16]; 2],
        ];
        let err = train(&mut model, &batches, 1).unwrap_err();
        assert!(matches!(
            err,
            AnomalyError::NumericInstability { epoch: 1, batch: 1 }
        ));
    }
}
