//! Per-class ranking of scored examples.
//!
//! Scored test examples are grouped by label, each group sorted ascending
//! by reconstruction error. The lowest-scoring entries reconstruct best —
//! the most "typical" members of their class — while the highest-scoring
//! entries are the anomaly candidates.

use crate::error::{AnomalyError, Result};
use crate::scoring::ScoredExample;

/// One label's scored examples, sorted ascending by score.
///
/// Built once per evaluation pass and discarded after extraction. Ties keep
/// their relative input order (the sort is stable), though ordering among
/// exact ties carries no meaning.
#[derive(Debug)]
pub struct RankedBucket {
    label: u8,
    examples: Vec<ScoredExample>,
}

impl RankedBucket {
    /// The class label this bucket collects.
    pub fn label(&self) -> u8 {
        self.label
    }

    /// Number of scored examples in the bucket.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// True if no test example carried this label.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// All examples, ascending by score.
    pub fn examples(&self) -> &[ScoredExample] {
        &self.examples
    }

    /// The `k` best (lowest score) and `k` worst (highest score) examples.
    ///
    /// Best entries come ascending; worst entries come from the highest
    /// score downward.
    ///
    /// # Errors
    ///
    /// [`AnomalyError::InsufficientData`] if the bucket holds fewer than `k`
    /// examples. Callers that prefer partial results use
    /// [`RankedBucket::best_worst_available`].
    pub fn best_worst(&self, k: usize) -> Result<(Vec<&ScoredExample>, Vec<&ScoredExample>)> {
        if self.examples.len() < k {
            return Err(AnomalyError::InsufficientData {
                label: self.label,
                available: self.examples.len(),
                requested: k,
            });
        }
        Ok(self.take_ends(k))
    }

    /// Like [`RankedBucket::best_worst`] but clamps `k` to the bucket size
    /// instead of failing, returning all available examples for small
    /// buckets. Label distribution across test data is not guaranteed
    /// uniform, so sparse buckets are expected.
    pub fn best_worst_available(&self, k: usize) -> (Vec<&ScoredExample>, Vec<&ScoredExample>) {
        self.take_ends(k.min(self.examples.len()))
    }

    fn take_ends(&self, k: usize) -> (Vec<&ScoredExample>, Vec<&ScoredExample>) {
        let best = self.examples.iter().take(k).collect();
        let worst = self.examples.iter().rev().take(k).collect();
        (best, worst)
    }
}

/// Group scored examples into one sorted bucket per label.
///
/// Every label in `0..num_classes` gets a bucket even when no example lands
/// in it. Within each bucket examples sort ascending by score with a stable
/// tie-break.
///
/// # Errors
///
/// [`AnomalyError::UnknownLabel`] if any example carries a label outside
/// `0..num_classes`; examples are never silently dropped.
pub fn bucket_by_label(
    scored: Vec<ScoredExample>,
    num_classes: usize,
) -> Result<Vec<RankedBucket>> {
    let mut buckets: Vec<RankedBucket> = (0..num_classes)
        .map(|label| RankedBucket {
            label: label as u8,
            examples: Vec::new(),
        })
        .collect();

    for example in scored {
        let label = example.label as usize;
        if label >= num_classes {
            return Err(AnomalyError::UnknownLabel {
                label: example.label,
                num_classes,
            });
        }
        buckets[label].examples.push(example);
    }

    for bucket in &mut buckets {
        bucket
            .examples
            .sort_by(|a, b| a.score.total_cmp(&b.score));
    }

    Ok(buckets)
}
