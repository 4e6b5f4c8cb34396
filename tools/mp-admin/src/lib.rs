//! MP-Admin: Merkle-Points command line tool
//!
//! Builds update records from a JSON account mirror, decodes record bytes and
//! runs the state validator locally. Every command returns a serializable
//! report; `main` prints it as JSON.

pub mod commands;

pub use commands::*;
