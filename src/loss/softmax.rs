use crate::error::{check_labels, Error, Result};
use crate::math::matrix::Matrix;

/// Mean softmax cross-entropy over a batch of class scores, and its gradient
/// with respect to those scores.
///
/// Each row is shifted by its maximum before exponentiating, so large scores
/// never overflow. Returns `(loss, dscores)` where
///   dscores = (softmax(scores) - onehot(y)) / N
///
/// This is the combined Softmax + cross-entropy gradient; callers feed it
/// straight into the backward pass of whatever produced `scores`.
pub fn softmax_cross_entropy(scores: &Matrix, y: &[usize]) -> Result<(f64, Matrix)> {
    check_batch(scores.rows, scores.cols, y)?;
    let n = scores.rows as f64;

    let shifted = scores.sub_col(&scores.row_max())?;
    let exp = shifted.map(f64::exp);
    let sum_exp = exp.row_sums();
    let probs = exp.div_col(&sum_exp)?;

    // -log p[y] = log Σexp - shifted[y]; avoids log(0) when p underflows.
    let data_loss: f64 = shifted
        .data
        .iter()
        .zip(sum_exp.iter())
        .zip(y.iter())
        .map(|((row, s), &label)| s.ln() - row[label])
        .sum::<f64>()
        / n;

    let dscores = probs.sub(&Matrix::one_hot(y, scores.cols)?)?.scale(1.0 / n);
    Ok((data_loss, dscores))
}

/// Softmax loss for a linear classifier `W` (D × C), computed with explicit
/// loops over examples, classes and features.
///
/// Returns `(loss, dW)` with
///   loss = mean_i(-log p_i[y_i]) + 0.5·reg·ΣW²
///   dW   = (1/N)·Σ_i outer(X_i, p_i - onehot(y_i)) + reg·W
pub fn softmax_loss_naive(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Matrix)> {
    check_linear_inputs(w, x, y, reg)?;
    let (n, d, c) = (x.rows, w.rows, w.cols);

    let mut loss = 0.0;
    let mut dw = Matrix::zeros(d, c);

    for i in 0..n {
        let xi = &x.data[i];

        let mut scores = vec![0.0; c];
        for (j, score) in scores.iter_mut().enumerate() {
            for k in 0..d {
                *score += xi[k] * w.data[k][j];
            }
        }

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for score in scores.iter_mut() {
            *score -= max;
        }

        let sum_exp: f64 = scores.iter().map(|s| s.exp()).sum();
        loss += sum_exp.ln() - scores[y[i]];

        for j in 0..c {
            let p = scores[j].exp() / sum_exp;
            let coeff = if j == y[i] { p - 1.0 } else { p };
            for k in 0..d {
                dw.data[k][j] += xi[k] * coeff;
            }
        }
    }

    loss /= n as f64;
    loss += 0.5 * reg * w.sum_squares();

    let mut dw = dw.scale(1.0 / n as f64);
    dw.add_scaled_assign(w, reg)?;

    Ok((loss, dw))
}

/// Same contract as [`softmax_loss_naive`], computed with whole-matrix
/// operations: `X·W` for the scores, row reductions for the softmax and
/// `Xᵀ·(P - Y)` for the gradient.
pub fn softmax_loss_vectorized(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<(f64, Matrix)> {
    check_linear_inputs(w, x, y, reg)?;

    let scores = x.matmul(w)?;
    let (data_loss, dscores) = softmax_cross_entropy(&scores, y)?;

    let mut dw = x.transpose().matmul(&dscores)?;
    dw.add_scaled_assign(w, reg)?;

    Ok((data_loss + 0.5 * reg * w.sum_squares(), dw))
}

/// `y` must label each of `rows` examples with one of `num_classes` classes.
fn check_batch(rows: usize, num_classes: usize, y: &[usize]) -> Result<()> {
    if rows == 0 {
        return Err(Error::EmptyInput("batch has no examples".to_owned()));
    }
    if y.len() != rows {
        return Err(Error::ShapeMismatch {
            op: "labels",
            left: (rows, num_classes),
            right: (y.len(), 1),
        });
    }
    check_labels(y, num_classes)
}

fn check_linear_inputs(w: &Matrix, x: &Matrix, y: &[usize], reg: f64) -> Result<()> {
    if x.cols != w.rows {
        return Err(Error::ShapeMismatch {
            op: "scores",
            left: x.shape(),
            right: w.shape(),
        });
    }
    check_reg(reg)?;
    check_batch(x.rows, w.cols, y)
}

pub(crate) fn check_reg(reg: f64) -> Result<()> {
    if reg.is_finite() && reg >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidHyperparameter(format!("reg must be finite and >= 0, got {reg}")))
    }
}
