pub mod activations;
pub mod loss;
pub mod rng;

pub use activations::{sigmoid, sigmoid_derivative, sigmoid_inplace};
pub use loss::{mse, mse_deriv};
pub use rng::SimpleRng;
