use std::sync::Arc;

use async_trait::async_trait;
use mp_03_builder::{CommitmentSource, SourceError};
use shared_crypto::HashPrimitive;
use shared_types::Hash;

use crate::domain::TypeId;
use crate::service::DevnetLedger;

/// Reads the current commitment of one record from a devnet ledger.
///
/// `type_id: None` stands for a record not created yet.
#[derive(Debug, Clone)]
pub struct LedgerCommitmentSource<H: HashPrimitive> {
    ledger: Arc<DevnetLedger<H>>,
    type_id: Option<TypeId>,
}

impl<H: HashPrimitive> LedgerCommitmentSource<H> {
    pub fn new(ledger: Arc<DevnetLedger<H>>, type_id: Option<TypeId>) -> Self {
        Self { ledger, type_id }
    }

    pub fn track(&mut self, type_id: TypeId) {
        self.type_id = Some(type_id);
    }
}

#[async_trait]
impl<H: HashPrimitive> CommitmentSource for LedgerCommitmentSource<H> {
    async fn current_commitment(&self) -> Result<Option<Hash>, SourceError> {
        let Some(type_id) = self.type_id else {
            return Ok(None);
        };
        match self.ledger.cell(&type_id).await {
            Some(cell) => Ok(Some(cell.root())),
            None => Err(SourceError::Unavailable(format!(
                "no live record for type id {}",
                shared_types::to_prefixed_hex(&type_id.0)
            ))),
        }
    }
}
