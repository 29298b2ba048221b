use crate::error::Result;
use crate::math::matrix::Matrix;

/// Rectified linear unit, `max(x, 0)`, the hidden-layer nonlinearity.
pub struct Relu;

impl Relu {
    pub fn function(x: f64) -> f64 {
        if x > 0.0 { x } else { 0.0 }
    }

    /// Subgradient; 0 at the kink so it agrees with the forward mask.
    pub fn derivative(x: f64) -> f64 {
        if x > 0.0 { 1.0 } else { 0.0 }
    }

    pub fn forward(pre: &Matrix) -> Matrix {
        pre.map(Relu::function)
    }

    /// Gates `upstream` (∂L/∂a) by the mask of positive pre-activations,
    /// giving ∂L/∂z.
    pub fn backward(upstream: &Matrix, pre: &Matrix) -> Result<Matrix> {
        upstream.hadamard(&pre.map(Relu::derivative))
    }
}
