//! Outbound Ports (Driven Ports)
//!
//! Dependencies the builder needs from the host ledger.

use async_trait::async_trait;
use shared_types::Hash;

use crate::domain::SourceError;

/// Where the current on-ledger commitment is read from.
///
/// Implementations may perform network I/O; retries and timeouts are theirs
/// to handle. The builder calls this once per build.
#[async_trait]
pub trait CommitmentSource: Send + Sync {
    /// Current root, or `None` when no ledger record exists yet.
    async fn current_commitment(&self) -> Result<Option<Hash>, SourceError>;
}
