//! Activation functions.
//!
//! The autoencoder's hidden layers squash with sigmoid; the output layer is
//! a linear identity paired with MSE loss, so no function is needed there.

/// Sigmoid activation function: 1 / (1 + exp(-x)).
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid applied in-place over a buffer.
pub fn sigmoid_inplace(data: &mut [f32]) {
    for value in data.iter_mut() {
        *value = sigmoid(*value);
    }
}

/// Sigmoid derivative given `a = sigmoid(z)`.
///
/// Returns `a * (1 - a)`, expressed in terms of the activation so callers
/// can reuse cached forward outputs.
pub fn sigmoid_derivative(a: f32) -> f32 {
    a * (1.0 - a)
}
