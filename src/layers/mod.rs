//! Neural network layer implementations.

pub mod dense;

pub use dense::DenseLayer;
