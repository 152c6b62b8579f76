use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::data::{shuffle, split_batches, LabeledData};
use crate::error::Result;
use crate::gradcheck::Trace;
use crate::network::NeuralNetwork;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` with mini-batch gradient descent for exactly
/// `config.epochs` epochs.
///
/// Every epoch shuffles `training_data` in place with `rng`, cuts it into
/// contiguous batches of `config.batch_size` (the last one may be shorter),
/// sums each batch's gradient through the parallel reducer and then applies
/// `param -= (learning_rate / batch_len) * summed_gradient`.
///
/// `each_epoch` is called with the 1-based epoch index once the epoch's last
/// update has been applied; it is the hook for evaluation and reporting.
///
/// # Errors
/// Invalid configuration is reported before any parameter is touched. A
/// shape mismatch or failed gradient check aborts the run; updates from
/// earlier batches stay applied.
pub fn train_loop<R, F>(
    network: &mut NeuralNetwork,
    training_data: &mut [LabeledData],
    config: &TrainConfig,
    rng: &mut R,
    mut each_epoch: F,
) -> Result<()>
where
    R: Rng + ?Sized,
    F: FnMut(usize),
{
    config.validate()?;
    let reducer = config.reducer()?;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();
        let epoch_trace = Trace::root().with(format!("epoch: {epoch}"));

        shuffle(training_data, rng);

        let batches = split_batches(&*training_data, config.batch_size)?;
        let n_batches = batches.len();

        for (batch_index, batch) in batches.into_iter().enumerate() {
            let trace = epoch_trace.with(format!("batch: {batch_index}"));
            debug!("epoch {epoch}, batch {batch_index}: {} examples", batch.len());
            let summed = reducer.sum_gradient(network, batch, &trace)?;
            network.apply_gradient(&summed, batch.len());
        }

        info!(
            "epoch {epoch}/{} done: {n_batches} batches in {} ms",
            config.epochs,
            t_start.elapsed().as_millis()
        );
        debug!("reducer forks so far: {}", reducer.forks());

        each_epoch(epoch);
    }

    Ok(())
}
