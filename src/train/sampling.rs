use rand::seq::index;
use rand::Rng;
use serde::{Serialize, Deserialize};

/// How minibatches are drawn from the training set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// `batch_size` distinct examples drawn uniformly at random each step.
    #[default]
    UniformNoReplacement,
    /// A contiguous run of `batch_size` examples starting at
    /// `(iteration * batch_size) % N`, wrapping around the end of the set.
    SequentialWrap,
}

/// Row indices of the minibatch used at step `iteration`.
///
/// `batch_size` must not exceed `num_train`.
pub fn batch_indices<R: Rng + ?Sized>(
    mode: SamplingMode,
    iteration: usize,
    num_train: usize,
    batch_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    match mode {
        SamplingMode::UniformNoReplacement => index::sample(rng, num_train, batch_size).into_vec(),
        SamplingMode::SequentialWrap => {
            let start = (iteration % num_train) * (batch_size % num_train) % num_train;
            (0..batch_size).map(|k| (start + k) % num_train).collect()
        }
    }
}
