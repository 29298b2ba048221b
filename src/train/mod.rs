pub mod history;
pub mod loop_fn;
pub mod sampling;
pub mod train_config;

pub use history::TrainHistory;
pub use loop_fn::train_loop;
pub use sampling::SamplingMode;
pub use train_config::TrainConfig;
