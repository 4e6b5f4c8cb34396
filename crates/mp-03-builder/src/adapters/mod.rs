pub mod fixed_source;

pub use fixed_source::*;
