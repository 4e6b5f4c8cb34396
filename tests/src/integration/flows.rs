//! # Ledger Flows
//!
//! Builder → codec → validator on the happy paths:
//!
//! 1. **Creation**: no prior commitment, one account inserted
//! 2. **Update**: an existing commitment moved forward, record by record
//! 3. **Batch**: one present and one absent old leaf proven in one pass

#[cfg(test)]
mod tests {
    use mp_01_codec::{decode, encode, AccountUpdate};
    use mp_02_smt::{
        leaf_key, leaf_value, new_leaf, old_leaf, ProofVerifier, ProvenLeaf, SmtVerifier,
        EMPTY_ROOT,
    };
    use mp_03_builder::{AccountPoint, BuilderConfig, UpdateBuilder};
    use mp_04_validator::{StateValidator, TransactionView, ValidationOutcome};
    use shared_crypto::CkbBlake2b;

    use crate::integration::fixtures::{addr, builder, record, replacement};

    // =========================================================================
    // CREATION
    // =========================================================================

    #[test]
    fn test_creation_with_one_account() {
        let builder = UpdateBuilder::new(BuilderConfig::default()).unwrap();
        let record = builder
            .build_transition(None, &[AccountUpdate::new(addr(0xa1), 0, 150)])
            .unwrap();
        assert_eq!(record.old_root, EMPTY_ROOT);

        // The proof alone ties the new root to key(address) -> value(150)
        let leaf = (
            leaf_key::<CkbBlake2b>(&addr(0xa1)),
            Some(leaf_value::<CkbBlake2b>(150)),
        );
        assert!(SmtVerifier::<CkbBlake2b>::new().verify(&record.new_root, &record.proof, &[leaf]));

        let bytes = encode(&record).unwrap();
        assert_eq!(decode(&bytes).unwrap(), record);
        let tx = TransactionView::creation(&record.new_root, bytes);
        assert_eq!(StateValidator::new().outcome(&tx), ValidationOutcome::Accepted);
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    #[test]
    fn test_update_from_existing_commitment() {
        let builder = builder(&[(0xa1, 100)]);
        let r0 = builder.current_root();

        let record = record(&builder, &[(0xa1, 150)]);
        assert_eq!(record.old_root, r0);
        assert_eq!(record.accounts, vec![AccountUpdate::new(addr(0xa1), 100, 150)]);
        assert_eq!(
            StateValidator::new().outcome(&replacement(&record)),
            ValidationOutcome::Accepted
        );
    }

    #[test]
    fn test_chain_of_records_follows_the_mirror() {
        let mut builder = UpdateBuilder::new(BuilderConfig::default()).unwrap();
        let validator = StateValidator::new();

        let genesis = builder
            .build_transition(None, &[AccountUpdate::new(addr(1), 0, 10)])
            .unwrap();
        let tx = TransactionView::creation(&genesis.new_root, encode(&genesis).unwrap());
        assert!(validator.validate(&tx).is_ok());
        builder.apply(&genesis).unwrap();

        let mut prior = genesis.new_root;
        for step in 1..=5u32 {
            let updates = builder.plan(vec![
                AccountPoint::new(addr(1), 10 + step),
                AccountPoint::new(addr(step as u8 + 1), step * 7),
            ]);
            let record = builder.build_transition(Some(prior), &updates).unwrap();
            assert_eq!(record.old_root, prior);
            assert_eq!(
                validator.outcome(&replacement(&record)),
                ValidationOutcome::Accepted
            );
            builder.apply(&record).unwrap();
            prior = record.new_root;
        }
        assert_eq!(builder.current_root(), prior);
        assert_eq!(builder.point(&addr(1)), Some(15));
        assert_eq!(builder.accounts().len(), 6);
    }

    // =========================================================================
    // BATCH
    // =========================================================================

    #[test]
    fn test_batch_with_present_and_absent_old_leaves() {
        let builder = builder(&[(0xa1, 150), (0xb2, 40)]);
        let record = record(&builder, &[(0xa1, 200), (0xc3, 10)]);
        assert_eq!(record.accounts[0].old_point, 150);
        assert!(record.accounts[1].is_insertion());

        // One compiled proof serves both roots
        let verifier = SmtVerifier::<CkbBlake2b>::new();
        let old: Vec<ProvenLeaf> = record.accounts.iter().map(old_leaf::<CkbBlake2b>).collect();
        let new: Vec<ProvenLeaf> = record.accounts.iter().map(new_leaf::<CkbBlake2b>).collect();
        assert!(verifier.verify(&record.old_root, &record.proof, &old));
        assert!(verifier.verify(&record.new_root, &record.proof, &new));

        assert_eq!(
            StateValidator::new().outcome(&replacement(&record)),
            ValidationOutcome::Accepted
        );
    }

    #[test]
    fn test_account_order_in_record_does_not_matter() {
        let builder = builder(&[(1, 5), (2, 6), (3, 7)]);
        let mut record = record(&builder, &[(3, 70), (1, 50)]);
        record.accounts.reverse();
        assert_eq!(
            StateValidator::new().outcome(&replacement(&record)),
            ValidationOutcome::Accepted
        );
    }
}
