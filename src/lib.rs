pub mod activation;
pub mod data;
pub mod error;
pub mod gradcheck;
pub mod math;
pub mod network;
pub mod params;
pub mod train;

// Convenience re-exports
pub use data::LabeledData;
pub use error::{NnError, Result};
pub use gradcheck::GradientChecker;
pub use math::Matrix;
pub use network::{NetworkConfig, NeuralNetwork};
pub use params::{BiasVector, Gradient, WeightMatrix};
pub use train::{success_rate, train_loop, BatchReducer, TrainConfig};
