//! Stochastic Gradient Descent (SGD) optimizer implementation.
//!
//! Vanilla gradient descent: `parameter = parameter - learning_rate * gradient`.

use crate::optimizers::Optimizer;

/// Stochastic Gradient Descent optimizer.
///
/// The simplest update rule, without momentum or adaptive learning rates.
/// Kept as a recognized optimizer kind for experiments; autoencoder training
/// defaults to [`crate::optimizers::AdaGrad`].
#[derive(Debug)]
pub struct SGD {
    learning_rate: f32,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for SGD {
    /// Update parameters with `parameter[i] -= learning_rate * gradient[i]`.
    ///
    /// # Panics
    ///
    /// Panics if `parameters` and `gradients` have different lengths.
    fn update(&mut self, parameters: &mut [f32], gradients: &[f32]) {
        assert_eq!(
            parameters.len(),
            gradients.len(),
            "Parameters and gradients must have the same length"
        );

        for (param, grad) in parameters.iter_mut().zip(gradients.iter()) {
            *param -= self.learning_rate * grad;
        }
    }

    /// No-op: vanilla SGD has no state.
    fn reset(&mut self) {}

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.learning_rate = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgd_update() {
        let mut optimizer = SGD::new(0.1);
        let mut params = vec![1.0, 2.0, 3.0];
        optimizer.update(&mut params, &[0.1, 0.2, 0.3]);

        assert!((params[0] - 0.99).abs() < 1e-6);
        assert!((params[1] - 1.98).abs() < 1e-6);
        assert!((params[2] - 2.97).abs() < 1e-6);
    }

    #[test]
    fn test_sgd_zero_gradient_is_identity() {
        let mut optimizer = SGD::new(0.1);
        let mut params = vec![1.0, 2.0];
        optimizer.update(&mut params, &[0.0, 0.0]);
        assert_eq!(params, vec![1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "Parameters and gradients must have the same length")]
    fn test_sgd_mismatched_lengths() {
        let mut optimizer = SGD::new(0.1);
        let mut params = vec![1.0, 2.0, 3.0];
        optimizer.update(&mut params, &[0.1, 0.2]);
    }
}
