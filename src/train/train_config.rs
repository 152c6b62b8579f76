use std::path::Path;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::train::reducer::{BatchReducer, DEFAULT_THRESHOLD};

fn default_reduce_threshold() -> usize {
    DEFAULT_THRESHOLD
}

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`           : total number of full passes over the training data
/// - `batch_size`       : samples per mini-batch; use `1` for online SGD
/// - `reduce_threshold` : batches shorter than this are summed on one thread
///                        instead of being split in half
/// - `worker_threads`   : size of a dedicated thread pool for the reducer;
///                        `None` uses rayon's global pool
/// - `seed`             : seed for the per-epoch shuffle; entropy when `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    #[serde(default = "default_reduce_threshold")]
    pub reduce_threshold: usize,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with the default reducer and an unseeded shuffle.
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            reduce_threshold: DEFAULT_THRESHOLD,
            worker_threads: None,
            seed: None,
        }
    }

    pub fn with_reduce_threshold(mut self, threshold: usize) -> Self {
        self.reduce_threshold = threshold;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NnError::InvalidConfiguration(
                "epoch count must be at least 1".to_owned(),
            ));
        }
        if self.batch_size == 0 {
            return Err(NnError::InvalidConfiguration(
                "mini-batch size must be at least 1".to_owned(),
            ));
        }
        if self.worker_threads == Some(0) {
            return Err(NnError::InvalidConfiguration(
                "worker thread count must be at least 1".to_owned(),
            ));
        }
        BatchReducer::validate_threshold(self.reduce_threshold)
    }

    /// The reducer this config describes.
    pub fn reducer(&self) -> Result<BatchReducer> {
        match self.worker_threads {
            Some(threads) => BatchReducer::with_threads(self.reduce_threshold, threads),
            None => BatchReducer::new(self.reduce_threshold),
        }
    }

    /// Shuffle source: seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        }
    }

    /// Deserializes a config from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
