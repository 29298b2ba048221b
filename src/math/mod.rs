pub mod matrix;
pub mod gradient_check;

pub use matrix::Matrix;
pub use gradient_check::{numerical_gradient, rel_error};
