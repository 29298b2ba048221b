pub mod network;
pub mod params;
pub mod spec;

pub use network::{Evaluation, TwoLayerNet, DEFAULT_STD};
pub use params::{Gradients, Params};
pub use spec::NetworkSpec;
