//! Builder configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use mp_03_builder::BuilderConfig;
//!
//! let config = BuilderConfig::default()
//!     .with_max_accounts(256)
//!     .with_verify_before_emit(false);
//! config.validate()?;
//! ```

use crate::domain::BuildError;
use serde::{Deserialize, Serialize};

/// Hard ceiling on accounts per record.
///
/// Bounds the proof a validator has to expand (256 siblings per key).
pub const MAX_ACCOUNTS_LIMIT: usize = 16_384;

/// Update builder configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Largest accepted batch
    pub max_accounts_per_update: usize,
    /// Replay both proof checks before returning a record
    pub verify_before_emit: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_accounts_per_update: 1024,
            verify_before_emit: true,
        }
    }
}

impl BuilderConfig {
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.max_accounts_per_update == 0 {
            return Err(BuildError::InvalidConfig(
                "max_accounts_per_update cannot be 0".to_string(),
            ));
        }

        if self.max_accounts_per_update > MAX_ACCOUNTS_LIMIT {
            return Err(BuildError::InvalidConfig(format!(
                "max_accounts_per_update must not exceed {}",
                MAX_ACCOUNTS_LIMIT
            )));
        }

        Ok(())
    }

    /// Builder-style method to set the batch ceiling
    pub fn with_max_accounts(mut self, max: usize) -> Self {
        self.max_accounts_per_update = max;
        self
    }

    /// Builder-style method to toggle the self-check
    pub fn with_verify_before_emit(mut self, verify: bool) -> Self {
        self.verify_before_emit = verify;
        self
    }
}
