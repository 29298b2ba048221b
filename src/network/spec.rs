use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::network::{TwoLayerNet, DEFAULT_STD};

fn default_std() -> f64 {
    DEFAULT_STD
}

/// Serializable description of a two-layer architecture.
///
/// Fields:
/// - `input_size`  — dimension D of each input row
/// - `hidden_size` — number of hidden ReLU units H
/// - `output_size` — number of classes C
/// - `std`         — scale of the initial weights; defaults to [`DEFAULT_STD`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    #[serde(default = "default_std")]
    pub std: f64,
}

impl NetworkSpec {
    /// Initialises a fresh network of this shape from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TwoLayerNet> {
        TwoLayerNet::with_rng(self.input_size, self.hidden_size, self.output_size, self.std, rng)
    }
}
