//! Dense (fully connected) layer implementation.
//!
//! This module provides the affine building block of the autoencoder:
//! `output = W * input + b`, with the gradient bookkeeping needed for
//! backpropagation. Activations are applied by the model, not the layer,
//! because the output layer of the autoencoder is a linear identity.

use crate::error::{AnomalyError, Result};
use crate::optimizers::Optimizer;
use crate::utils::SimpleRng;

/// Dense (fully connected) layer with weights and biases.
///
/// Performs the affine transformation `y = W x + b` where the weight matrix
/// `W` is stored row-major with shape (output_size × input_size) and `b` is
/// the bias vector (output_size).
///
/// A backward pass accumulates averaged weight and bias gradients inside the
/// layer; [`DenseLayer::apply_update`] hands them to an optimizer together
/// with the matching parameters.
pub struct DenseLayer {
    input_size: usize,
    output_size: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
    grad_weights: Vec<f32>,
    grad_biases: Vec<f32>,
}

impl DenseLayer {
    /// Create a new DenseLayer with Xavier initialization.
    ///
    /// Weights are sampled uniformly from [-limit, limit] where
    /// `limit = sqrt(6 / (input_size + output_size))` — a variance-scaling
    /// scheme keyed to the layer's fan-in and fan-out. Biases start at zero.
    pub fn new(input_size: usize, output_size: usize, rng: &mut SimpleRng) -> Self {
        let mut weights = vec![0.0f32; input_size * output_size];
        let limit = (6.0f32 / (input_size + output_size) as f32).sqrt();

        for value in &mut weights {
            *value = rng.gen_range_f32(-limit, limit);
        }

        Self {
            input_size,
            output_size,
            weights,
            biases: vec![0.0f32; output_size],
            grad_weights: vec![0.0f32; input_size * output_size],
            grad_biases: vec![0.0f32; output_size],
        }
    }

    /// Reconstruct a layer from saved parameters.
    ///
    /// Used by model persistence; fails if the parameter lengths do not
    /// match the declared dimensions.
    pub fn from_parameters(
        input_size: usize,
        output_size: usize,
        weights: Vec<f32>,
        biases: Vec<f32>,
    ) -> Result<Self> {
        if weights.len() != input_size * output_size {
            return Err(AnomalyError::DimensionMismatch {
                expected: input_size * output_size,
                actual: weights.len(),
            });
        }
        if biases.len() != output_size {
            return Err(AnomalyError::DimensionMismatch {
                expected: output_size,
                actual: biases.len(),
            });
        }
        Ok(Self {
            input_size,
            output_size,
            weights,
            biases,
            grad_weights: vec![0.0f32; input_size * output_size],
            grad_biases: vec![0.0f32; output_size],
        })
    }

    /// Forward affine transform for a batch.
    ///
    /// `input` is batch-major (batch_size × input_size); results land in
    /// `output` (batch_size × output_size). No activation is applied.
    ///
    /// # Panics
    ///
    /// Panics if the buffers are shorter than the batch requires.
    pub fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        assert!(input.len() >= batch_size * self.input_size);
        assert!(output.len() >= batch_size * self.output_size);

        for b in 0..batch_size {
            let in_row = &input[b * self.input_size..(b + 1) * self.input_size];
            let out_row = &mut output[b * self.output_size..(b + 1) * self.output_size];
            for (o, out) in out_row.iter_mut().enumerate() {
                let weight_row = &self.weights[o * self.input_size..(o + 1) * self.input_size];
                let mut acc = self.biases[o];
                for (w, x) in weight_row.iter().zip(in_row) {
                    acc += w * x;
                }
                *out = acc;
            }
        }
    }

    /// Backward pass for a batch.
    ///
    /// `delta` is the gradient of the loss with respect to this layer's
    /// pre-activation output (batch_size × output_size). Fills the internal
    /// weight and bias gradients (averaged over the batch) and writes the
    /// gradient with respect to the layer input into `grad_input`.
    pub fn backward(
        &mut self,
        input: &[f32],
        delta: &[f32],
        grad_input: &mut [f32],
        batch_size: usize,
    ) {
        assert!(input.len() >= batch_size * self.input_size);
        assert!(delta.len() >= batch_size * self.output_size);
        assert!(grad_input.len() >= batch_size * self.input_size);

        self.grad_weights.fill(0.0);
        self.grad_biases.fill(0.0);
        let scale = 1.0 / batch_size as f32;

        for b in 0..batch_size {
            let in_row = &input[b * self.input_size..(b + 1) * self.input_size];
            let delta_row = &delta[b * self.output_size..(b + 1) * self.output_size];
            let grad_in_row = &mut grad_input[b * self.input_size..(b + 1) * self.input_size];
            grad_in_row.fill(0.0);

            for (o, &d) in delta_row.iter().enumerate() {
                self.grad_biases[o] += scale * d;
                let weight_row = &self.weights[o * self.input_size..(o + 1) * self.input_size];
                let grad_weight_row =
                    &mut self.grad_weights[o * self.input_size..(o + 1) * self.input_size];
                for i in 0..self.input_size {
                    grad_weight_row[i] += scale * d * in_row[i];
                    grad_in_row[i] += weight_row[i] * d;
                }
            }
        }
    }

    /// Add an L2 weight-decay term to the accumulated weight gradients.
    ///
    /// Biases are left untouched.
    pub fn add_weight_decay(&mut self, l2_penalty: f32) {
        for (g, w) in self.grad_weights.iter_mut().zip(&self.weights) {
            *g += l2_penalty * w;
        }
    }

    /// True if every accumulated gradient is finite.
    pub fn grads_finite(&self) -> bool {
        self.grad_weights.iter().all(|g| g.is_finite())
            && self.grad_biases.iter().all(|g| g.is_finite())
    }

    /// Apply the accumulated gradients through the given optimizers.
    ///
    /// Weight and bias parameters keep separate optimizer state because
    /// adaptive optimizers track one accumulator per parameter.
    pub fn apply_update(
        &mut self,
        weight_opt: &mut dyn Optimizer,
        bias_opt: &mut dyn Optimizer,
    ) {
        weight_opt.update(&mut self.weights, &self.grad_weights);
        bias_opt.update(&mut self.biases, &self.grad_biases);
    }

    /// Get the input size of the layer.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Get the output size of the layer.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Get the weight matrix (row-major, output_size × input_size).
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Get the bias vector.
    pub fn biases(&self) -> &[f32] {
        &self.biases
    }

    /// Get the number of trainable parameters.
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}
