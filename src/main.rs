//! Trains a sigmoid network on MNIST digits and reports the held-out success
//! rate after every epoch.
//!
//! Run with:
//!   cargo run --release -- --mnist path/to/mnist
//!
//! Without `--mnist` a synthetic, linearly separable digit set is generated
//! instead. `--network` and `--train` accept JSON files holding a
//! `NetworkConfig` and a `TrainConfig`; `--epochs` overrides the epoch count.
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};
use rand::{rngs::StdRng, SeedableRng};

use mlp_sgd::data::{idx, synthetic};
use mlp_sgd::{success_rate, train_loop, LabeledData, NetworkConfig, Result, TrainConfig};

/// Mini-batch SGD trainer for a sigmoid feed-forward network
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Folder holding the four uncompressed MNIST idx files
    #[arg(long)]
    mnist: Option<PathBuf>,

    /// JSON file with the network configuration
    #[arg(long)]
    network: Option<PathBuf>,

    /// JSON file with the training configuration
    #[arg(long)]
    train: Option<PathBuf>,

    /// Overrides the epoch count of the training configuration
    #[arg(long)]
    epochs: Option<usize>,
}

fn load_data(args: &Args) -> Result<(Vec<LabeledData>, Vec<LabeledData>)> {
    if let Some(folder) = &args.mnist {
        return Ok((idx::load_mnist_training(folder)?, idx::load_mnist_test(folder)?));
    }

    info!("no --mnist folder given, generating synthetic digits");
    let mut rng = StdRng::seed_from_u64(2016);
    let prototypes = synthetic::digit_prototypes(idx::MNIST_CLASSES, 784, 120, &mut rng);
    let training = synthetic::synthetic_digits(&prototypes, 5_000, 0.1, &mut rng);
    let test = synthetic::synthetic_digits(&prototypes, 1_000, 0.1, &mut rng);
    Ok((training, test))
}

fn run(args: Args) -> Result<()> {
    let network_config = match &args.network {
        Some(path) => NetworkConfig::load_json(path)?,
        None => NetworkConfig::new(vec![784, 30, 10], 3.0),
    };
    let mut train_config = match &args.train {
        Some(path) => TrainConfig::load_json(path)?,
        None => TrainConfig::new(30, 10),
    };
    if let Some(epochs) = args.epochs {
        train_config.epochs = epochs;
    }

    let (mut training, test) = load_data(&args)?;
    let mut network = network_config.build()?;
    info!(
        "network {:?}, learning rate {}, {} training / {} test examples",
        network.layer_sizes(),
        network.learning_rate(),
        training.len(),
        test.len()
    );

    // Evaluation needs the network between epochs, so each epoch is its own
    // single-epoch run sharing one shuffle rng.
    train_config.validate()?;
    let single_epoch = TrainConfig {
        epochs: 1,
        ..train_config.clone()
    };
    let mut rng = train_config.rng();
    for epoch in 1..=train_config.epochs {
        train_loop(&mut network, &mut training, &single_epoch, &mut rng, |_| {})?;
        let rate = success_rate(&network, &test)?;
        info!("epoch {epoch}: success rate {:.2}%", rate * 100.0);
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        error!("{e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_optional() {
        let args = Args::try_parse_from(["mlp-sgd"]).unwrap();
        assert!(args.mnist.is_none() && args.network.is_none() && args.train.is_none());
        assert!(args.epochs.is_none());
    }

    #[test]
    fn parses_every_flag() {
        let args = Args::try_parse_from([
            "mlp-sgd",
            "--mnist",
            "data/mnist",
            "--network",
            "net.json",
            "--train",
            "train.json",
            "--epochs",
            "3",
        ])
        .unwrap();
        assert_eq!(args.mnist, Some(PathBuf::from("data/mnist")));
        assert_eq!(args.network, Some(PathBuf::from("net.json")));
        assert_eq!(args.train, Some(PathBuf::from("train.json")));
        assert_eq!(args.epochs, Some(3));
    }

    #[test]
    fn rejects_bad_epochs_and_unknown_flags() {
        assert!(Args::try_parse_from(["mlp-sgd", "--epochs", "many"]).is_err());
        assert!(Args::try_parse_from(["mlp-sgd", "--verbose"]).is_err());
    }
}
