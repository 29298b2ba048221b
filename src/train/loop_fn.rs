use rand::Rng;
use tracing::{debug, info};

use crate::error::{check_labels, Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::TwoLayerNet;
use crate::optim::sgd::Sgd;
use crate::train::history::TrainHistory;
use crate::train::sampling::batch_indices;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Runs `config.num_iters` steps of minibatch SGD on `network` and returns
/// the recorded learning curves.
///
/// # Arguments
/// - `network`        — modified in place
/// - `x`, `y`         — training data (N × D) and labels
/// - `x_val`, `y_val` — validation data, used only for accuracy
/// - `config`         — hyperparameters
/// - `rng`            — source of minibatch indices
///
/// At every epoch boundary (`it % iterations_per_epoch == 0`, including the
/// first step) the loop records accuracy on the current minibatch and on the
/// validation set, then decays the learning rate.
///
/// # Errors
/// Rejects invalid hyperparameters, an empty training or validation set,
/// a `batch_size` larger than the training set, mismatched shapes and
/// out-of-range labels before any parameter is touched.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut TwoLayerNet,
    x: &Matrix,
    y: &[usize],
    x_val: &Matrix,
    y_val: &[usize],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainHistory> {
    config.validate()?;
    check_dataset(network, "training", x, y)?;
    check_dataset(network, "validation", x_val, y_val)?;

    let num_train = x.rows;
    if config.batch_size > num_train {
        return Err(Error::InvalidHyperparameter(format!(
            "batch_size {} exceeds the {} training examples",
            config.batch_size, num_train
        )));
    }

    debug!(
        num_train,
        num_iters = config.num_iters,
        iterations_per_epoch = config.iterations_per_epoch,
        sampling = ?config.sampling,
        "starting training"
    );

    let mut optimizer = Sgd::new(config.learning_rate);
    let mut history = TrainHistory::default();

    for it in 0..config.num_iters {
        let batch = batch_indices(config.sampling, it, num_train, config.batch_size, rng);
        let x_batch = x.select_rows(&batch);
        let y_batch: Vec<usize> = batch.iter().map(|&i| y[i]).collect();

        let (loss, grads) = network.loss(&x_batch, &y_batch, config.reg)?;
        history.loss_history.push(loss);

        optimizer.step(network.params_mut(), &grads)?;

        if it % config.iterations_per_epoch == 0 {
            if config.verbose {
                info!("iteration {} / {}: loss {:.6}", it, config.num_iters, loss);
            }

            let train_acc = network.accuracy(&x_batch, &y_batch)?;
            let val_acc = network.accuracy(x_val, y_val)?;
            history.train_acc_history.push(train_acc);
            history.val_acc_history.push(val_acc);

            optimizer.decay(config.learning_rate_decay);
            debug!(iteration = it, train_acc, val_acc, learning_rate = optimizer.learning_rate, "epoch boundary");
        }
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// A labelled set must be non-empty, as wide as the network input, have one
/// label per row, and use only the network's classes.
fn check_dataset(network: &TwoLayerNet, which: &str, x: &Matrix, y: &[usize]) -> Result<()> {
    if x.rows == 0 {
        return Err(Error::EmptyInput(format!("{which} set has no examples")));
    }
    network.check_input(x)?;
    if y.len() != x.rows {
        return Err(Error::ShapeMismatch {
            op: "labels",
            left: x.shape(),
            right: (y.len(), 1),
        });
    }
    check_labels(y, network.output_size())
}
