use thiserror::Error;

/// Errors raised by the matrix primitive, the classifier and the softmax
/// loss functions. Every failure aborts the current call; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Two operands of `op` have incompatible dimensions.
    #[error("shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("label {label} at index {index} is outside [0, {num_classes})")]
    InvalidLabel {
        index: usize,
        label: usize,
        num_classes: usize,
    },

    #[error("invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejects any label that does not index one of `num_classes` classes.
pub(crate) fn check_labels(y: &[usize], num_classes: usize) -> Result<()> {
    match y.iter().enumerate().find(|(_, &label)| label >= num_classes) {
        Some((index, &label)) => Err(Error::InvalidLabel { index, label, num_classes }),
        None => Ok(()),
    }
}
