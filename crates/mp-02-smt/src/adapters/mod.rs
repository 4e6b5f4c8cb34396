pub mod smt_adapter;

pub use smt_adapter::*;
