pub mod outcome;
pub mod transaction;
pub mod validator;

pub use outcome::*;
pub use transaction::*;
pub use validator::*;
