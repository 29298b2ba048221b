use rand::Rng;

use crate::activation::relu::Relu;
use crate::error::{Error, Result};
use crate::loss::softmax::{check_reg, softmax_cross_entropy};
use crate::math::matrix::Matrix;
use crate::network::params::{Gradients, Params};
use crate::train::history::TrainHistory;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

/// Scale of the Gaussian used to initialise `W1` and `W2`.
pub const DEFAULT_STD: f64 = 1e-4;

/// Result of [`TwoLayerNet::evaluate`].
#[derive(Debug, Clone)]
pub enum Evaluation {
    /// Class scores, shape (N, C). Returned when no labels are given.
    Scores(Matrix),
    /// Data loss plus L2 penalty, and the gradient of every parameter.
    Loss { loss: f64, grads: Gradients },
}

/// Intermediate values of one forward pass, kept for backprop.
struct Forward {
    z1: Matrix,
    a1: Matrix,
    scores: Matrix,
}

/// Fully-connected classifier with one hidden ReLU layer:
///
///   input → affine → ReLU → affine → softmax
///
/// Trained with softmax cross-entropy and L2 regularisation on the weight
/// matrices (never on the biases).
#[derive(Debug, Clone)]
pub struct TwoLayerNet {
    params: Params,
}

impl TwoLayerNet {
    /// Builds a D → H → C network with `W1`, `W2` drawn from N(0, std²) and
    /// zero biases, using the thread RNG.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize, std: f64) -> Result<TwoLayerNet> {
        TwoLayerNet::with_rng(input_size, hidden_size, output_size, std, &mut rand::thread_rng())
    }

    /// Same as [`TwoLayerNet::new`] but draws the initial weights from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        std: f64,
        rng: &mut R,
    ) -> Result<TwoLayerNet> {
        if !(std.is_finite() && std > 0.0) {
            return Err(Error::InvalidHyperparameter(format!("std must be finite and > 0, got {std}")));
        }
        TwoLayerNet::from_params(Params {
            w1: Matrix::randn(input_size, hidden_size, std, rng),
            b1: Matrix::zeros(1, hidden_size),
            w2: Matrix::randn(hidden_size, output_size, std, rng),
            b2: Matrix::zeros(1, output_size),
        })
    }

    /// Wraps explicit parameters after checking their shapes agree.
    pub fn from_params(params: Params) -> Result<TwoLayerNet> {
        params.validate()?;
        Ok(TwoLayerNet { params })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn input_size(&self) -> usize {
        self.params.input_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.params.hidden_size()
    }

    pub fn output_size(&self) -> usize {
        self.params.output_size()
    }

    /// Runs the network on `x` (N × D).
    ///
    /// Without labels this is inference only and returns the (N × C) class
    /// scores; `reg` is ignored. With labels it returns the regularised
    /// softmax loss and the gradient of every parameter.
    pub fn evaluate(&self, x: &Matrix, y: Option<&[usize]>, reg: f64) -> Result<Evaluation> {
        match y {
            None => Ok(Evaluation::Scores(self.scores(x)?)),
            Some(y) => {
                let (loss, grads) = self.loss(x, y, reg)?;
                Ok(Evaluation::Loss { loss, grads })
            }
        }
    }

    /// Class scores for `x`, shape (N × C).
    pub fn scores(&self, x: &Matrix) -> Result<Matrix> {
        Ok(self.forward(x)?.scores)
    }

    /// Regularised loss and gradients on the labelled batch `(x, y)`.
    pub fn loss(&self, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Gradients)> {
        check_reg(reg)?;
        let fwd = self.forward(x)?;
        let Params { w1, w2, .. } = &self.params;

        let (data_loss, dscores) = softmax_cross_entropy(&fwd.scores, y)?;
        let loss = data_loss + 0.5 * reg * (w1.sum_squares() + w2.sum_squares());

        // Output layer.
        let mut dw2 = fwd.a1.transpose().matmul(&dscores)?;
        let db2 = dscores.column_sums();

        // Hidden layer.
        let da1 = dscores.matmul(&w2.transpose())?;
        let dz1 = Relu::backward(&da1, &fwd.z1)?;
        let mut dw1 = x.transpose().matmul(&dz1)?;
        let db1 = dz1.column_sums();

        dw1.add_scaled_assign(w1, reg)?;
        dw2.add_scaled_assign(w2, reg)?;

        Ok((loss, Gradients { w1: dw1, b1: db1, w2: dw2, b2: db2 }))
    }

    /// Predicted class of every row of `x`: the index of its highest score,
    /// ties going to the lowest index.
    pub fn predict(&self, x: &Matrix) -> Result<Vec<usize>> {
        Ok(self.scores(x)?.argmax_rows())
    }

    /// Fraction of rows of `x` whose prediction equals the label in `y`.
    pub fn accuracy(&self, x: &Matrix, y: &[usize]) -> Result<f64> {
        if y.len() != x.rows {
            return Err(Error::ShapeMismatch {
                op: "labels",
                left: x.shape(),
                right: (y.len(), 1),
            });
        }
        if y.is_empty() {
            return Err(Error::EmptyInput("accuracy needs at least one example".to_owned()));
        }
        let predicted = self.predict(x)?;
        let correct = predicted.iter().zip(y.iter()).filter(|(p, t)| p == t).count();
        Ok(correct as f64 / y.len() as f64)
    }

    /// Minibatch SGD on `(x, y)`, sampling accuracy on the current batch and on
    /// `(x_val, y_val)` every `config.iterations_per_epoch` steps.
    /// Parameters are updated in place.
    pub fn train(
        &mut self,
        x: &Matrix,
        y: &[usize],
        x_val: &Matrix,
        y_val: &[usize],
        config: &TrainConfig,
    ) -> Result<TrainHistory> {
        train_loop(self, x, y, x_val, y_val, config, &mut rand::thread_rng())
    }

    /// Same as [`TwoLayerNet::train`] but samples minibatches from `rng`.
    pub fn train_with_rng<R: Rng + ?Sized>(
        &mut self,
        x: &Matrix,
        y: &[usize],
        x_val: &Matrix,
        y_val: &[usize],
        config: &TrainConfig,
        rng: &mut R,
    ) -> Result<TrainHistory> {
        train_loop(self, x, y, x_val, y_val, config, rng)
    }

    /// Checks that `x` has one column per network input.
    pub(crate) fn check_input(&self, x: &Matrix) -> Result<()> {
        if x.cols != self.input_size() {
            return Err(Error::ShapeMismatch {
                op: "input",
                left: x.shape(),
                right: self.params.w1.shape(),
            });
        }
        Ok(())
    }

    fn forward(&self, x: &Matrix) -> Result<Forward> {
        self.check_input(x)?;
        let Params { w1, b1, w2, b2 } = &self.params;

        let z1 = x.matmul(w1)?.add_row(b1)?;
        let a1 = Relu::forward(&z1);
        let scores = a1.matmul(w2)?.add_row(b2)?;

        Ok(Forward { z1, a1, scores })
    }
}
