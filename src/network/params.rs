use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Learnable parameters of a [`TwoLayerNet`](crate::network::TwoLayerNet).
///
/// Shapes, for input size D, hidden size H and C classes:
/// - `w1` — (D, H)
/// - `b1` — (1, H)
/// - `w2` — (H, C)
/// - `b2` — (1, C)
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub w1: Matrix,
    pub b1: Matrix,
    pub w2: Matrix,
    pub b2: Matrix,
}

/// Gradient of the loss with respect to each of the [`Params`]; every field
/// has the shape of its namesake.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub w1: Matrix,
    pub b1: Matrix,
    pub w2: Matrix,
    pub b2: Matrix,
}

impl Params {
    pub fn input_size(&self) -> usize {
        self.w1.rows
    }

    pub fn hidden_size(&self) -> usize {
        self.w1.cols
    }

    pub fn output_size(&self) -> usize {
        self.w2.cols
    }

    /// Checks that the four parameters describe one D → H → C network with
    /// no empty dimension.
    pub fn validate(&self) -> Result<()> {
        let (d, h, c) = (self.input_size(), self.hidden_size(), self.output_size());
        if d == 0 || h == 0 || c == 0 {
            return Err(Error::InvalidHyperparameter(format!(
                "network sizes must be > 0, got D={d} H={h} C={c}"
            )));
        }
        expect_shape("b1", &self.b1, (1, h))?;
        expect_shape("w2", &self.w2, (h, c))?;
        expect_shape("b2", &self.b2, (1, c))
    }
}

fn expect_shape(op: &'static str, m: &Matrix, shape: (usize, usize)) -> Result<()> {
    if m.shape() == shape {
        Ok(())
    } else {
        Err(Error::ShapeMismatch { op, left: m.shape(), right: shape })
    }
}
