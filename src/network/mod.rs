pub mod config;
pub mod index;
pub mod network;

pub use config::NetworkConfig;
pub use index::layer_from_end;
pub use network::{ForwardPass, NeuralNetwork};
