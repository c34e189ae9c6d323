//! The four-layer dense autoencoder.
//!
//! Encoder compresses the input through a narrow bottleneck, decoder
//! reconstructs it: `D → hidden → bottleneck → hidden → D`. Because fit is
//! called with the input as its own target, the network is forced to learn
//! a compressed encoding that reconstructs the input; the bottleneck width
//! (10 by default against 784 inputs) is a deliberate compression ratio.
//!
//! Hidden layers squash with sigmoid; the output layer is linear identity
//! paired with MSE loss.

use crate::config::RunConfig;
use crate::data::FeatureVector;
use crate::error::{AnomalyError, Result};
use crate::layers::DenseLayer;
use crate::optimizers::{build_optimizer, Optimizer};
use crate::utils::{sigmoid_derivative, sigmoid_inplace, SimpleRng};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Per-layer optimizer state.
///
/// Weights and biases keep separate instances because adaptive optimizers
/// track one accumulator entry per parameter.
struct LayerOptimizers {
    weights: Box<dyn Optimizer>,
    biases: Box<dyn Optimizer>,
}

/// Symmetric dense autoencoder with a four-layer stack.
///
/// Owns its layers exclusively; weights are mutated only by [`Autoencoder::fit`].
/// The layer stack always satisfies `layer[i].output_size == layer[i+1].input_size`
/// and reconstructs vectors of the same length it consumes.
pub struct Autoencoder {
    layers: Vec<DenseLayer>,
    optimizers: Vec<LayerOptimizers>,
    input_len: usize,
    learning_rate: f32,
    l2_penalty: f32,
    optimizer_kind: String,
}

impl Autoencoder {
    /// Construct the four-layer stack from a configuration and seeded RNG.
    ///
    /// Dimensions are `[D→hidden, hidden→bottleneck, bottleneck→hidden,
    /// hidden→D]` with D = `config.feature_len()`. Weights use Xavier
    /// initialization; biases start at zero. Identical config and seed
    /// produce identical initial parameters.
    pub fn new(config: &RunConfig, rng: &mut SimpleRng) -> Result<Self> {
        let d = config.feature_len();
        let dims = [
            (d, config.hidden_width),
            (config.hidden_width, config.bottleneck_width),
            (config.bottleneck_width, config.hidden_width),
            (config.hidden_width, d),
        ];

        let layers: Vec<DenseLayer> = dims
            .iter()
            .map(|&(input, output)| DenseLayer::new(input, output, rng))
            .collect();
        let optimizers = Self::fresh_optimizers(&config.optimizer, config.learning_rate, 4)?;

        Ok(Self {
            layers,
            optimizers,
            input_len: d,
            learning_rate: config.learning_rate,
            l2_penalty: config.l2_penalty,
            optimizer_kind: config.optimizer.clone(),
        })
    }

    fn fresh_optimizers(
        kind: &str,
        learning_rate: f32,
        count: usize,
    ) -> Result<Vec<LayerOptimizers>> {
        (0..count)
            .map(|_| {
                Ok(LayerOptimizers {
                    weights: build_optimizer(kind, learning_rate)?,
                    biases: build_optimizer(kind, learning_rate)?,
                })
            })
            .collect()
    }

    /// Flattened input (and output) feature length D.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// (input_size, output_size) of every layer, in order.
    pub fn layer_dims(&self) -> Vec<(usize, usize)> {
        self.layers
            .iter()
            .map(|l| (l.input_size(), l.output_size()))
            .collect()
    }

    /// Total number of trainable parameters.
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(DenseLayer::parameter_count).sum()
    }

    /// Reconstruct a single feature vector.
    ///
    /// Applies each layer's affine transform and activation in sequence.
    /// Deterministic for fixed weights.
    ///
    /// # Errors
    ///
    /// [`AnomalyError::DimensionMismatch`] if `input.len() != D`.
    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() != self.input_len {
            return Err(AnomalyError::DimensionMismatch {
                expected: self.input_len,
                actual: input.len(),
            });
        }

        let last = self.layers.len() - 1;
        let mut current = input.to_vec();
        for (idx, layer) in self.layers.iter().enumerate() {
            let mut output = vec![0.0f32; layer.output_size()];
            layer.forward(&current, &mut output, 1);
            if idx < last {
                sigmoid_inplace(&mut output);
            }
            current = output;
        }
        Ok(current)
    }

    /// One gradient step on a batch of (input, target) vector pairs.
    ///
    /// Runs a cached batch forward pass, computes the MSE loss averaged over
    /// the batch and over feature dimensions, backpropagates through every
    /// layer in reverse order, adds the L2 weight-decay term to the weight
    /// gradients, and applies the per-parameter optimizer update. Returns
    /// the scalar batch loss.
    ///
    /// For self-supervised reconstruction, callers pass the same slice as
    /// `inputs` and `targets`.
    ///
    /// # Errors
    ///
    /// - [`AnomalyError::DimensionMismatch`] if any vector's length differs
    ///   from D or the input and target counts differ.
    /// - [`AnomalyError::NonFiniteUpdate`] if the loss or any gradient is
    ///   non-finite. Weights are left untouched in that case.
    pub fn fit(&mut self, inputs: &[FeatureVector], targets: &[FeatureVector]) -> Result<f32> {
        if inputs.len() != targets.len() {
            return Err(AnomalyError::DimensionMismatch {
                expected: inputs.len(),
                actual: targets.len(),
            });
        }
        if inputs.is_empty() {
            return Err(AnomalyError::config("fit requires a non-empty batch"));
        }

        let batch = inputs.len();
        let d = self.input_len;
        let flat_inputs = flatten_checked(inputs, d)?;
        let flat_targets = flatten_checked(targets, d)?;

        // Forward with cached per-layer activations. activations[0] is the
        // input; activations[i + 1] is layer i's post-activation output.
        let last = self.layers.len() - 1;
        let mut activations: Vec<Vec<f32>> = Vec::with_capacity(self.layers.len() + 1);
        activations.push(flat_inputs);
        for (idx, layer) in self.layers.iter().enumerate() {
            let mut output = vec![0.0f32; batch * layer.output_size()];
            layer.forward(activations.last().expect("non-empty"), &mut output, batch);
            if idx < last {
                sigmoid_inplace(&mut output);
            }
            activations.push(output);
        }

        // Batch loss: mean over examples and feature dimensions.
        let output = activations.last().expect("non-empty");
        let mut loss = 0.0f32;
        for (&y, &t) in output.iter().zip(&flat_targets) {
            let diff = y - t;
            loss += diff * diff;
        }
        loss /= (batch * d) as f32;
        if !loss.is_finite() {
            return Err(AnomalyError::NonFiniteUpdate);
        }

        // Gradient of the per-example mean MSE w.r.t. the output; the batch
        // average is applied inside each layer's backward pass.
        let mut delta: Vec<f32> = output
            .iter()
            .zip(&flat_targets)
            .map(|(&y, &t)| 2.0 * (y - t) / d as f32)
            .collect();

        // Reverse-order backprop. `delta` always holds the gradient w.r.t.
        // the current layer's post-activation output; converting it to the
        // pre-activation gradient is the identity for the linear output
        // layer and the sigmoid derivative elsewhere.
        for idx in (0..self.layers.len()).rev() {
            let layer = &mut self.layers[idx];
            let dz: Vec<f32> = if idx == last {
                delta
            } else {
                delta
                    .iter()
                    .zip(&activations[idx + 1])
                    .map(|(&g, &a)| g * sigmoid_derivative(a))
                    .collect()
            };

            let mut grad_input = vec![0.0f32; batch * layer.input_size()];
            layer.backward(&activations[idx], &dz, &mut grad_input, batch);
            delta = grad_input;
        }

        // Refuse to apply a corrupt update.
        if !self.layers.iter().all(DenseLayer::grads_finite) {
            return Err(AnomalyError::NonFiniteUpdate);
        }

        for (layer, opt) in self.layers.iter_mut().zip(&mut self.optimizers) {
            layer.add_weight_decay(self.l2_penalty);
            layer.apply_update(opt.weights.as_mut(), opt.biases.as_mut());
        }

        Ok(loss)
    }

    /// Save the model as gzipped JSON.
    ///
    /// Parent directories are created as needed. Optimizer accumulators are
    /// not persisted; a loaded model starts with fresh optimizer state.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let dto = AutoencoderDto::from_model(self);
        let json =
            serde_json::to_vec(&dto).map_err(|e| AnomalyError::Serialization(e.to_string()))?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&json)?;
        encoder.finish()?;
        Ok(())
    }

    /// Load a model saved by [`Autoencoder::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut decoder = GzDecoder::new(file);
        let mut buf = Vec::new();
        decoder.read_to_end(&mut buf)?;
        let dto: AutoencoderDto =
            serde_json::from_slice(&buf).map_err(|e| AnomalyError::Serialization(e.to_string()))?;
        dto.into_model()
    }
}

fn flatten_checked(vectors: &[FeatureVector], d: usize) -> Result<Vec<f32>> {
    let mut flat = Vec::with_capacity(vectors.len() * d);
    for v in vectors {
        if v.len() != d {
            return Err(AnomalyError::DimensionMismatch {
                expected: d,
                actual: v.len(),
            });
        }
        flat.extend_from_slice(v);
    }
    Ok(flat)
}

// ============ Persistence DTOs ============

#[derive(Serialize, Deserialize)]
struct LayerDto {
    input_size: usize,
    output_size: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct AutoencoderDto {
    input_len: usize,
    learning_rate: f32,
    l2_penalty: f32,
    optimizer: String,
    layers: Vec<LayerDto>,
}

impl AutoencoderDto {
    fn from_model(model: &Autoencoder) -> Self {
        Self {
            input_len: model.input_len,
            learning_rate: model.learning_rate,
            l2_penalty: model.l2_penalty,
            optimizer: model.optimizer_kind.clone(),
            layers: model
                .layers
                .iter()
                .map(|l| LayerDto {
                    input_size: l.input_size(),
                    output_size: l.output_size(),
                    weights: l.weights().to_vec(),
                    biases: l.biases().to_vec(),
                })
                .collect(),
        }
    }

    fn into_model(self) -> Result<Autoencoder> {
        let count = self.layers.len();
        let layers: Vec<DenseLayer> = self
            .layers
            .into_iter()
            .map(|dto| {
                DenseLayer::from_parameters(
                    dto.input_size,
                    dto.output_size,
                    dto.weights,
                    dto.biases,
                )
            })
            .collect::<Result<_>>()?;

        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(AnomalyError::DimensionMismatch {
                    expected: pair[0].output_size(),
                    actual: pair[1].input_size(),
                });
            }
        }

        let optimizers =
            Autoencoder::fresh_optimizers(&self.optimizer, self.learning_rate, count)?;
        Ok(Autoencoder {
            layers,
            optimizers,
            input_len: self.input_len,
            learning_rate: self.learning_rate,
            l2_penalty: self.l2_penalty,
            optimizer_kind: self.optimizer,
        })
    }
}
