pub mod builder;
pub mod config;
pub mod entities;
pub mod errors;

pub use builder::*;
pub use config::*;
pub use entities::*;
pub use errors::*;
