pub mod relu;

pub use relu::Relu;
