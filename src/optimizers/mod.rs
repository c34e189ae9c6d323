//! Optimizer abstractions for parameter updates.
//!
//! Optimizers define how gradients turn into parameter changes. The trainer
//! keeps one optimizer instance per parameter group (a layer's weights or
//! biases) because adaptive optimizers track per-parameter state.
//!
//! # Available Optimizers
//!
//! - [`AdaGrad`]: adaptive per-parameter learning rates from accumulated
//!   squared gradients (the default for autoencoder training)
//! - [`SGD`]: vanilla stochastic gradient descent

pub mod adagrad;
pub mod sgd;

pub use adagrad::AdaGrad;
pub use sgd::SGD;

use crate::error::Result;

/// Core trait for neural network optimizers.
///
/// Implementations apply their update rule in-place and may keep internal
/// state (accumulators, counters) across calls.
pub trait Optimizer: std::fmt::Debug {
    /// Update parameters using gradients.
    ///
    /// Applies the optimizer's update rule to modify `parameters` in-place.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `parameters` and `gradients` have
    /// different lengths.
    fn update(&mut self, parameters: &mut [f32], gradients: &[f32]);

    /// Reset optimizer state.
    ///
    /// Clears accumulated statistics. A no-op for stateless optimizers.
    fn reset(&mut self);

    /// Get the base learning rate.
    fn learning_rate(&self) -> f32;

    /// Set a new base learning rate.
    fn set_learning_rate(&mut self, lr: f32);
}

/// Construct an optimizer by its configured name.
///
/// Recognized kinds are `"adagrad"` and `"sgd"`; anything else is a
/// configuration error.
pub fn build_optimizer(kind: &str, learning_rate: f32) -> Result<Box<dyn Optimizer>> {
    match kind {
        "adagrad" => Ok(Box::new(AdaGrad::new(learning_rate, 1e-6))),
        "sgd" => Ok(Box::new(SGD::new(learning_rate))),
        other => Err(crate::error::AnomalyError::config(format!(
            "unknown optimizer kind '{other}', expected one of: adagrad, sgd"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_optimizer_known_kinds() {
        assert!(build_optimizer("adagrad", 0.05).is_ok());
        assert!(build_optimizer("sgd", 0.05).is_ok());
    }

    #[test]
    fn test_build_optimizer_unknown_kind() {
        let err = build_optimizer("adam", 0.05).unwrap_err();
        assert!(err.to_string().contains("adam"));
    }
}
