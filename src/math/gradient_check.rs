use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Step used by the gradient checks in this crate.
pub const DEFAULT_STEP: f64 = 1e-5;

/// Symmetric finite-difference estimate of `∂f/∂x`:
///
///   grad[i][j] = (f(x + h·e_ij) - f(x - h·e_ij)) / 2h
///
/// `f` receives a perturbed copy of `x`; `x` itself is never modified.
pub fn numerical_gradient<F>(x: &Matrix, h: f64, mut f: F) -> Result<Matrix>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let mut grad = Matrix::zeros(x.rows, x.cols);
    let mut probe = x.clone();

    for i in 0..x.rows {
        for j in 0..x.cols {
            let original = x.data[i][j];

            probe.data[i][j] = original + h;
            let plus = f(&probe)?;
            probe.data[i][j] = original - h;
            let minus = f(&probe)?;
            probe.data[i][j] = original;

            grad.data[i][j] = (plus - minus) / (2.0 * h);
        }
    }

    Ok(grad)
}

/// Largest element-wise relative error `|a - b| / max(1e-8, |a| + |b|)`.
pub fn rel_error(a: &Matrix, b: &Matrix) -> Result<f64> {
    if a.shape() != b.shape() {
        return Err(Error::ShapeMismatch {
            op: "rel_error",
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(a.data
        .iter()
        .flatten()
        .zip(b.data.iter().flatten())
        .map(|(x, y)| (x - y).abs() / (x.abs() + y.abs()).max(1e-8))
        .fold(0.0, f64::max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_gradient_of_quadratic() {
        // f(x) = Σ x² + 3·x[0][1]  ⇒  ∂f/∂x = 2x + 3·e_01
        let x = Matrix::from_data(vec![vec![0.5, -1.0], vec![2.0, 0.25]]).unwrap();
        let num = numerical_gradient(&x, DEFAULT_STEP, |p| Ok(p.sum_squares() + 3.0 * p.data[0][1])).unwrap();

        let mut expected = x.scale(2.0);
        expected.data[0][1] += 3.0;
        assert!(rel_error(&num, &expected).unwrap() < 1e-8);
    }

    #[test]
    fn rel_error_is_zero_for_identical_and_checks_shape() {
        let a = Matrix::from_data(vec![vec![1.0, 0.0]]).unwrap();
        assert_eq!(rel_error(&a, &a).unwrap(), 0.0);
        assert!(rel_error(&a, &Matrix::zeros(2, 1)).is_err());
    }

    #[test]
    fn propagates_errors_from_f() {
        let x = Matrix::zeros(1, 1);
        let res = numerical_gradient(&x, DEFAULT_STEP, |_| Err(Error::EmptyInput("probe".into())));
        assert!(matches!(res, Err(Error::EmptyInput(_))));
    }
}
