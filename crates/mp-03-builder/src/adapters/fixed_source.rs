use async_trait::async_trait;
use shared_types::Hash;

use crate::domain::SourceError;
use crate::ports::CommitmentSource;

/// A `CommitmentSource` that always answers the same way.
///
/// Used by the admin CLI, where the prior root comes from a flag or a state
/// file, and in tests.
#[derive(Debug, Clone)]
pub struct FixedCommitment {
    answer: Result<Option<Hash>, SourceError>,
}

impl FixedCommitment {
    pub fn new(root: Option<Hash>) -> Self {
        Self { answer: Ok(root) }
    }

    pub fn failing(error: SourceError) -> Self {
        Self { answer: Err(error) }
    }
}

#[async_trait]
impl CommitmentSource for FixedCommitment {
    async fn current_commitment(&self) -> Result<Option<Hash>, SourceError> {
        self.answer.clone()
    }
}
