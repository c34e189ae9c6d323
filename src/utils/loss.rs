//! Mean squared error loss.
//!
//! Training and scoring share these functions so per-example scores stay
//! comparable with batch-averaged training losses.

/// MSE averaged over feature dimensions: `mean((prediction - target)^2)`.
///
/// # Panics
///
/// Panics if the slices have different lengths or are empty; callers
/// validate feature lengths before reaching this point.
pub fn mse(prediction: &[f32], target: &[f32]) -> f32 {
    assert_eq!(
        prediction.len(),
        target.len(),
        "prediction and target must have the same length"
    );
    assert!(!prediction.is_empty(), "mse of empty vectors is undefined");

    let sum: f32 = prediction
        .iter()
        .zip(target)
        .map(|(&p, &t)| (p - t) * (p - t))
        .sum();
    sum / prediction.len() as f32
}

/// Gradient of [`mse`] with respect to the prediction: `2 (p - t) / n`.
pub fn mse_deriv(prediction: &[f32], target: &[f32]) -> Vec<f32> {
    assert_eq!(
        prediction.len(),
        target.len(),
        "prediction and target must have the same length"
    );

    let scale = 2.0 / prediction.len() as f32;
    prediction
        .iter()
        .zip(target)
        .map(|(&p, &t)| scale * (p - t))
        .collect()
}
