use crate::error::Result;
use crate::network::params::{Gradients, Params};

/// Vanilla stochastic gradient descent: `param -= learning_rate * grad`.
#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to all four parameters in place.
    pub fn step(&self, params: &mut Params, grads: &Gradients) -> Result<()> {
        let lr = self.learning_rate;
        params.w1.add_scaled_assign(&grads.w1, -lr)?;
        params.b1.add_scaled_assign(&grads.b1, -lr)?;
        params.w2.add_scaled_assign(&grads.w2, -lr)?;
        params.b2.add_scaled_assign(&grads.b2, -lr)
    }

    /// Multiplies the learning rate by `factor`.
    pub fn decay(&mut self, factor: f64) {
        self.learning_rate *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;

    fn filled(rows: usize, cols: usize, v: f64) -> Matrix {
        Matrix::zeros(rows, cols).map(|_| v)
    }

    #[test]
    fn step_moves_against_gradient() {
        let mut params = Params {
            w1: filled(2, 3, 1.0),
            b1: filled(1, 3, 0.0),
            w2: filled(3, 2, -1.0),
            b2: filled(1, 2, 0.5),
        };
        let grads = Gradients {
            w1: filled(2, 3, 2.0),
            b1: filled(1, 3, -1.0),
            w2: filled(3, 2, 0.0),
            b2: filled(1, 2, 4.0),
        };
        Sgd::new(0.25).step(&mut params, &grads).unwrap();
        assert_eq!(params.w1, filled(2, 3, 0.5));
        assert_eq!(params.b1, filled(1, 3, 0.25));
        assert_eq!(params.w2, filled(3, 2, -1.0));
        assert_eq!(params.b2, filled(1, 2, -0.5));
    }

    #[test]
    fn decay_scales_learning_rate() {
        let mut sgd = Sgd::new(1.0);
        sgd.decay(0.5);
        sgd.decay(0.5);
        assert_eq!(sgd.learning_rate, 0.25);
    }
}
