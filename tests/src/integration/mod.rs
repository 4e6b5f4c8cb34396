//! Cross-crate flows: builder output fed through the codec into the validator
//! and the devnet ledger.

pub mod devnet;
pub mod flows;
pub mod tamper;

/// Fixtures shared by the flows.
#[cfg(test)]
pub(crate) mod fixtures {
    use mp_01_codec::{encode, MerkleUpdate};
    use mp_03_builder::{AccountPoint, BuilderConfig, UpdateBuilder};
    use mp_04_validator::TransactionView;
    use shared_crypto::CkbBlake2b;
    use shared_types::Address;

    pub fn addr(byte: u8) -> Address {
        [byte; 32]
    }

    pub fn builder(accounts: &[(u8, u32)]) -> UpdateBuilder<CkbBlake2b> {
        UpdateBuilder::<CkbBlake2b>::with_accounts(
            BuilderConfig::default(),
            accounts.iter().map(|(a, p)| AccountPoint::new(addr(*a), *p)),
        )
        .unwrap()
    }

    /// Record moving the tracked state of `builder` to `targets`.
    pub fn record(builder: &UpdateBuilder<CkbBlake2b>, targets: &[(u8, u32)]) -> MerkleUpdate {
        let updates = builder.plan(targets.iter().map(|(a, p)| AccountPoint::new(addr(*a), *p)));
        builder
            .build_transition(Some(builder.current_root()), &updates)
            .unwrap()
    }

    /// Transaction replacing the commitment at `record.old_root`.
    pub fn replacement(record: &MerkleUpdate) -> TransactionView {
        TransactionView::replacement(&record.old_root, &record.new_root, encode(record).unwrap())
    }
}
