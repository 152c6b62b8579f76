use std::path::Path;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::network::network::NeuralNetwork;

/// Constructor-level hyperparameters of a network.
///
/// Only the architecture and knobs are stored here, never trained weights,
/// so a config can be kept next to experiment results and rebuilt on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Neurons per layer, input first and output last. At least 3 entries.
    pub layer_sizes: Vec<usize>,
    pub learning_rate: f64,
    /// Cross-check every backpropagation against finite differences.
    /// Slow; meant for diagnostics only.
    #[serde(default)]
    pub gradient_checking: bool,
    /// Seed for the Gaussian weight initialisation; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkConfig {
    pub fn new(layer_sizes: Vec<usize>, learning_rate: f64) -> Self {
        Self {
            layer_sizes,
            learning_rate,
            gradient_checking: false,
            seed: None,
        }
    }

    pub fn with_gradient_checking(mut self, enabled: bool) -> Self {
        self.gradient_checking = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_layer_sizes(&self.layer_sizes)?;
        validate_learning_rate(self.learning_rate)
    }

    /// Allocates and initialises the network described by this config.
    pub fn build(&self) -> Result<NeuralNetwork> {
        self.validate()?;

        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let network = NeuralNetwork::with_rng(&self.layer_sizes, self.learning_rate, &mut rng)?;
        Ok(network.with_gradient_checking(self.gradient_checking))
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: NetworkConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn validate_layer_sizes(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 3 {
        return Err(NnError::InvalidConfiguration(format!(
            "at least 3 layer sizes are required (input, hidden, output), got {}",
            layer_sizes.len()
        )));
    }
    if let Some(pos) = layer_sizes.iter().position(|&size| size == 0) {
        return Err(NnError::InvalidConfiguration(format!(
            "layer {pos} has size 0"
        )));
    }
    Ok(())
}

pub(crate) fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(NnError::InvalidConfiguration(format!(
            "learning rate must be a positive real, got {learning_rate}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_two_layers() {
        let config = NetworkConfig::new(vec![784, 10], 3.0);
        assert!(matches!(config.build(), Err(NnError::InvalidConfiguration(_))));
    }

    #[test]
    fn rejects_bad_learning_rate_and_empty_layer() {
        assert!(NetworkConfig::new(vec![2, 3, 1], 0.0).validate().is_err());
        assert!(NetworkConfig::new(vec![2, 3, 1], f64::NAN).validate().is_err());
        assert!(NetworkConfig::new(vec![2, 0, 1], 1.0).validate().is_err());
    }

    #[test]
    fn seeded_builds_are_identical() {
        let config = NetworkConfig::new(vec![4, 5, 2], 0.5).with_seed(11);
        let a = config.build().unwrap();
        let b = config.build().unwrap();
        assert_eq!(a.weights(), b.weights());
        assert_eq!(a.biases(), b.biases());
    }

    #[test]
    fn json_round_trip_through_a_file() {
        let config = NetworkConfig::new(vec![784, 30, 10], 3.0)
            .with_gradient_checking(true)
            .with_seed(5);
        let path = std::env::temp_dir().join("mlp_sgd_network_config_test.json");
        let path = path.to_str().unwrap();

        config.save_json(path).unwrap();
        let loaded = NetworkConfig::load_json(path).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn optional_fields_default() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{"layer_sizes":[2,3,1],"learning_rate":1.5}"#).unwrap();
        assert!(!config.gradient_checking);
        assert_eq!(config.seed, None);
    }
}
