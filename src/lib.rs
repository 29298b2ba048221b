pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use network::network::{Evaluation, TwoLayerNet, DEFAULT_STD};
pub use network::params::{Gradients, Params};
pub use network::spec::NetworkSpec;
pub use loss::softmax::{softmax_loss_naive, softmax_loss_vectorized};
pub use optim::sgd::Sgd;
pub use train::{SamplingMode, TrainConfig, TrainHistory};
