use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::data::LabeledData;
use crate::error::{NnError, Result};
use crate::gradcheck::Trace;
use crate::network::NeuralNetwork;
use crate::params::Gradient;

/// Batches shorter than this are summed sequentially.
pub const DEFAULT_THRESHOLD: usize = 5;

/// Sums per-example gradients over a mini-batch by divide and conquer.
///
/// A batch at or above the threshold is split at `len / 2`; both halves are
/// reduced concurrently through [`rayon::join`] and merged left + right. The
/// split points and merge order depend only on the batch length, so the sum
/// is bit-identical whichever worker runs which half.
///
/// The network is only read here; it is updated afterwards, single-threaded,
/// by the training loop.
#[derive(Debug)]
pub struct BatchReducer {
    threshold: usize,
    pool: Option<ThreadPool>,
    forks: AtomicUsize,
}

impl BatchReducer {
    /// A reducer running on rayon's global pool.
    pub fn new(threshold: usize) -> Result<Self> {
        Self::validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            pool: None,
            forks: AtomicUsize::new(0),
        })
    }

    /// A reducer with a dedicated pool of `threads` workers.
    pub fn with_threads(threshold: usize, threads: usize) -> Result<Self> {
        Self::validate_threshold(threshold)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("batch-reducer-{i}"))
            .build()
            .map_err(|e| {
                NnError::InvalidConfiguration(format!("cannot build thread pool: {e}"))
            })?;

        Ok(Self {
            threshold,
            pool: Some(pool),
            forks: AtomicUsize::new(0),
        })
    }

    /// A threshold below 2 would split single-example batches forever.
    pub fn validate_threshold(threshold: usize) -> Result<()> {
        if threshold < 2 {
            return Err(NnError::InvalidConfiguration(format!(
                "reduce threshold must be at least 2, got {threshold}"
            )));
        }
        Ok(())
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// How many times a batch has been split since this reducer was built.
    pub fn forks(&self) -> usize {
        self.forks.load(Ordering::Relaxed)
    }

    /// Summed gradient of `batch` under the current parameters of `network`.
    pub fn sum_gradient(
        &self,
        network: &NeuralNetwork,
        batch: &[LabeledData],
        trace: &Trace,
    ) -> Result<Gradient> {
        match &self.pool {
            Some(pool) => pool.install(|| self.reduce(network, batch, 0, trace)),
            None => self.reduce(network, batch, 0, trace),
        }
    }

    fn reduce(
        &self,
        network: &NeuralNetwork,
        batch: &[LabeledData],
        offset: usize,
        trace: &Trace,
    ) -> Result<Gradient> {
        if batch.len() < self.threshold {
            return sum_sequential(network, batch, offset, trace);
        }

        self.forks.fetch_add(1, Ordering::Relaxed);
        let mid = batch.len() / 2;
        let (left, right) = batch.split_at(mid);
        trace!("fork at offset {offset}: {} + {}", left.len(), right.len());

        let (left_sum, right_sum) = rayon::join(
            || self.reduce(network, left, offset, trace),
            || self.reduce(network, right, offset + mid, trace),
        );

        Ok(left_sum? + right_sum?)
    }
}

/// Backpropagates every example in order and adds the results into a
/// zero-initialised accumulator.
pub fn sum_sequential(
    network: &NeuralNetwork,
    batch: &[LabeledData],
    offset: usize,
    trace: &Trace,
) -> Result<Gradient> {
    let mut sum = Gradient::zeros_like(network.weights(), network.biases());

    for (i, data) in batch.iter().enumerate() {
        let gradient = if network.gradient_checking() {
            let trace = trace.with(format!("data index: {}", offset + i));
            network.backpropagate_traced(data, &trace)?
        } else {
            network.backpropagate(data)?
        };
        sum.accumulate(&gradient);
    }

    Ok(sum)
}
