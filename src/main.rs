//! Trains a two-layer ReLU network on a synthetic spiral dataset and prints
//! the learning curves as JSON.
//!
//! Run with:
//!   cargo run --release -- --config experiment.json
//!
//! Every field of the config file is optional; see `ExperimentConfig`.
//! Set `RUST_LOG=debug` to see per-epoch accuracy and learning rate.

use std::process::ExitCode;

use clap::Parser;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use two_layer_net::{Error, Matrix, NetworkSpec, Result, TrainConfig, TrainHistory};

#[derive(Parser, Debug)]
#[command(name = "two-layer-net")]
#[command(about = "Train a two-layer ReLU classifier on a spiral dataset")]
struct Args {
    /// JSON experiment config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Seed for data generation, initialisation and batch sampling
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Log the loss at every epoch boundary
    #[arg(short, long)]
    verbose: bool,
}

/// Shape of the generated spiral dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct DataSpec {
    points_per_class: usize,
    num_classes: usize,
    /// Fraction of points held out for validation.
    val_fraction: f64,
}

impl DataSpec {
    /// The split needs at least one training and one validation example.
    fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.val_fraction) {
            return Err(Error::InvalidHyperparameter(format!(
                "val_fraction must be in [0, 1), got {}",
                self.val_fraction
            )));
        }
        if self.points_per_class * self.num_classes < 2 {
            return Err(Error::InvalidHyperparameter(format!(
                "spiral data needs at least 2 points, got {} per class over {} classes",
                self.points_per_class, self.num_classes
            )));
        }
        Ok(())
    }
}

impl Default for DataSpec {
    fn default() -> Self {
        DataSpec { points_per_class: 100, num_classes: 3, val_fraction: 0.2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ExperimentConfig {
    network: NetworkSpec,
    train: TrainConfig,
    data: DataSpec,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            network: NetworkSpec { input_size: 2, hidden_size: 100, output_size: 3, std: 1e-2 },
            train: TrainConfig {
                learning_rate: 0.5,
                learning_rate_decay: 0.98,
                reg: 1e-3,
                num_iters: 2000,
                batch_size: 120,
                iterations_per_epoch: 100,
                ..TrainConfig::default()
            },
            data: DataSpec::default(),
        }
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    final_train_accuracy: f64,
    final_val_accuracy: f64,
    history: &'a TrainHistory,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            serde_json::from_reader::<_, ExperimentConfig>(std::io::BufReader::new(file))?
        }
        None => ExperimentConfig::default(),
    };
    config.train.verbose |= args.verbose;

    if config.network.input_size != 2 || config.network.output_size != config.data.num_classes {
        return Err(Error::InvalidHyperparameter(format!(
            "spiral data needs input_size 2 and output_size {}, got {} and {}",
            config.data.num_classes, config.network.input_size, config.network.output_size
        )));
    }
    config.data.validate()?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let (x, y) = spiral(config.data.points_per_class, config.data.num_classes, &mut rng)?;
    let (x_train, y_train, x_val, y_val) = split(&x, &y, config.data.val_fraction, &mut rng)?;
    info!(train = x_train.rows, val = x_val.rows, "generated spiral dataset");

    let mut network = config.network.build(&mut rng)?;
    let history = network.train_with_rng(&x_train, &y_train, &x_val, &y_val, &config.train, &mut rng)?;

    let summary = Summary {
        final_train_accuracy: network.accuracy(&x_train, &y_train)?,
        final_val_accuracy: network.accuracy(&x_val, &y_val)?,
        history: &history,
    };
    info!(
        train_acc = summary.final_train_accuracy,
        val_acc = summary.final_val_accuracy,
        "training finished"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Angle, in radians, swept by each spiral arm.
const ARM_SPAN: f64 = 4.0;

/// `num_classes` interleaved noisy spiral arms in the unit disc.
fn spiral<R: Rng>(points_per_class: usize, num_classes: usize, rng: &mut R) -> Result<(Matrix, Vec<usize>)> {
    let noise = Matrix::randn(points_per_class * num_classes, 1, 0.2, rng);
    let steps = points_per_class.saturating_sub(1).max(1) as f64;

    let mut rows = Vec::with_capacity(points_per_class * num_classes);
    let mut labels = Vec::with_capacity(points_per_class * num_classes);
    for class in 0..num_classes {
        for i in 0..points_per_class {
            let r = i as f64 / steps;
            let t = ARM_SPAN * (class as f64 + i as f64 / steps)
                + noise.data[class * points_per_class + i][0];
            rows.push(vec![r * t.sin(), r * t.cos()]);
            labels.push(class);
        }
    }
    Ok((Matrix::from_data(rows)?, labels))
}

/// Shuffles the examples and holds out `val_fraction` of them. Both sides
/// keep at least one example.
fn split<R: Rng>(x: &Matrix, y: &[usize], val_fraction: f64, rng: &mut R) -> Result<(Matrix, Vec<usize>, Matrix, Vec<usize>)> {
    if x.rows < 2 {
        return Err(Error::EmptyInput(format!("cannot split {} examples into train and validation", x.rows)));
    }
    let mut order: Vec<usize> = (0..x.rows).collect();
    order.shuffle(rng);

    let num_val = ((x.rows as f64 * val_fraction).round() as usize).clamp(1, x.rows - 1);
    let (val_idx, train_idx) = order.split_at(num_val);

    let gather = |idx: &[usize]| -> Result<(Matrix, Vec<usize>)> {
        let rows = idx.iter().map(|&i| x.data[i].clone()).collect();
        Ok((Matrix::from_data(rows)?, idx.iter().map(|&i| y[i]).collect()))
    };
    let (x_train, y_train) = gather(train_idx)?;
    let (x_val, y_val) = gather(val_idx)?;
    Ok((x_train, y_train, x_val, y_val))
}
