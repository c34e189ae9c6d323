//! Labeled feature batches and the deterministic train/test split.
//!
//! The dataset source hands the pipeline fixed-size batches of flattened
//! feature vectors paired with class labels. Each batch is partitioned into
//! a training subset (features only — training is self-supervised) and a
//! test subset (features with labels, for per-class ranking) using a seeded
//! permutation, so the split is reproducible from the run configuration.

use crate::error::{AnomalyError, Result};
use crate::utils::SimpleRng;

/// A flattened grayscale image: `rows × columns` values in [0, 1].
pub type FeatureVector = Vec<f32>;

/// An ordered batch of feature vectors paired 1:1 with class labels.
pub struct Batch {
    features: Vec<FeatureVector>,
    labels: Vec<u8>,
}

/// The result of splitting a [`Batch`]: training features and labeled test
/// examples.
pub struct TrainTestSplit {
    /// Feature vectors reserved for training.
    pub train: Vec<FeatureVector>,
    /// (feature, label) pairs reserved for evaluation.
    pub test: Vec<(FeatureVector, u8)>,
}

impl Batch {
    /// Create a batch from parallel feature and label sequences.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::DimensionMismatch`] if the sequences have
    /// different lengths.
    pub fn new(features: Vec<FeatureVector>, labels: Vec<u8>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(AnomalyError::DimensionMismatch {
                expected: features.len(),
                actual: labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Number of examples in the batch.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if the batch holds no examples.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Partition the batch into train and test subsets.
    ///
    /// A seeded Fisher-Yates permutation decides membership: the first
    /// `floor(train_percent * len)` permuted examples train, the rest test.
    /// Identical seed and percent reproduce the identical split.
    pub fn split(self, train_percent: f32, rng: &mut SimpleRng) -> TrainTestSplit {
        let n = self.features.len();
        let train_count = (train_percent * n as f32).floor() as usize;
        let order = rng.permutation(n);

        let mut examples: Vec<Option<(FeatureVector, u8)>> = self
            .features
            .into_iter()
            .zip(self.labels)
            .map(Some)
            .collect();

        let mut train = Vec::with_capacity(train_count);
        let mut test = Vec::with_capacity(n - train_count);
        for (rank, &idx) in order.iter().enumerate() {
            let (features, label) = examples[idx].take().expect("index visited once");
            if rank < train_count {
                train.push(features);
            } else {
                test.push((features, label));
            }
        }

        TrainTestSplit { train, test }
    }
}
