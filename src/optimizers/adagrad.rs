//! AdaGrad optimizer implementation.
//!
//! AdaGrad adapts the effective learning rate of every parameter to its own
//! gradient history, which suits the autoencoder's mix of wide input layers
//! and a narrow bottleneck.

use crate::optimizers::Optimizer;

/// AdaGrad (adaptive gradient) optimizer.
///
/// Maintains a running sum of squared gradients per parameter and divides
/// the base learning rate by its square root:
///
/// ```text
/// G_i += gradient_i²
/// parameter_i -= learning_rate * gradient_i / sqrt(G_i + ε)
/// ```
///
/// Parameters that receive consistently large gradients take progressively
/// smaller steps; rarely-updated parameters keep larger ones.
///
/// # Reference
///
/// Duchi, J., Hazan, E., & Singer, Y. (2011). Adaptive subgradient methods
/// for online learning and stochastic optimization. JMLR 12.
#[derive(Debug)]
pub struct AdaGrad {
    learning_rate: f32,
    epsilon: f32,
    /// Accumulated squared gradients per parameter.
    accumulator: Vec<f32>,
}

impl AdaGrad {
    /// Creates a new AdaGrad optimizer.
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - Base step size (must be positive)
    /// * `epsilon` - Stability constant inside the square root (typically 1e-6)
    pub fn new(learning_rate: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            epsilon,
            accumulator: Vec::new(),
        }
    }
}

impl Optimizer for AdaGrad {
    /// Update parameters using the AdaGrad rule.
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

        // Lazily size the accumulator to this parameter group.
        if self.accumulator.len() != parameters.len() {
            self.accumulator = vec![0.0; parameters.len()];
        }

        for i in 0..parameters.len() {
            let g = gradients[i];
            self.accumulator[i] += g * g;
            parameters[i] -= self.learning_rate * g / (self.accumulator[i] + self.epsilon).sqrt();
        }
    }

    /// Clear the accumulated squared-gradient history.
    fn reset(&mut self) {
        self.accumulator.clear();
    }

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
    fn test_adagrad_new() {
        let optimizer = AdaGrad::new(0.05, 1e-6);
        assert_eq!(optimizer.learning_rate(), 0.05);
        assert!(optimizer.accumulator.is_empty());
    }

    #[test]
    fn test_adagrad_first_step_is_near_signed_lr() {
        // With an empty accumulator, the first step is
        // lr * g / sqrt(g² + ε) ≈ lr * sign(g).
        let mut optimizer = AdaGrad::new(0.05, 1e-12);
        let mut params = vec![1.0f32];
        optimizer.update(&mut params, &[0.5]);
        assert!((params[0] - (1.0 - 0.05)).abs() < 1e-4);
    }

    #[test]
    fn test_adagrad_steps_shrink_with_history() {
        let mut optimizer = AdaGrad::new(0.1, 1e-6);
        let mut params = vec![0.0f32];

        let mut previous_step = f32::MAX;
        for _ in 0..5 {
            let before = params[0];
            optimizer.update(&mut params, &[1.0]);
            let step = (before - params[0]).abs();
            assert!(step < previous_step);
            previous_step = step;
        }
    }

    #[test]
    fn test_adagrad_adapts_per_parameter() {
        let mut optimizer = AdaGrad::new(0.1, 1e-6);
        let mut params = vec![1.0f32, 1.0];

        for _ in 0..10 {
            optimizer.update(&mut params, &[10.0, 0.1]);
        }

        // Both parameters moved despite very different gradient magnitudes.
        assert!(params[0] < 1.0);
        assert!(params[1] < 1.0);
    }

    #[test]
    fn test_adagrad_reset() {
        let mut optimizer = AdaGrad::new(0.1, 1e-6);
        let mut params = vec![1.0f32];
        optimizer.update(&mut params, &[1.0]);
        assert!(!optimizer.accumulator.is_empty());

        optimizer.reset();
        assert!(optimizer.accumulator.is_empty());
    }

    #[test]
    #[should_panic(expected = "Parameters and gradients must have the same length")]
    fn test_adagrad_mismatched_lengths() {
        let mut optimizer = AdaGrad::new(0.1, 1e-6);
        let mut params = vec![1.0, 2.0, 3.0];
        optimizer.update(&mut params, &[0.1, 0.2]);
    }
}
