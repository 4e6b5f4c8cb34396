pub mod commitment_source;

pub use commitment_source::*;
