pub mod softmax;

pub use softmax::{softmax_cross_entropy, softmax_loss_naive, softmax_loss_vectorized};
