//! # Tamper Detection
//!
//! Every field of a correct record is altered in turn; the validator must
//! reject each alteration with the outcome of the check it breaks.

#[cfg(test)]
mod tests {
    use mp_01_codec::{encode, AccountUpdate};
    use mp_03_builder::{BuilderConfig, UpdateBuilder};
    use mp_04_validator::{StateValidator, TransactionView, ValidationOutcome};
    use proptest::prelude::*;
    use shared_crypto::{Blake3, CkbBlake2b};

    use crate::integration::fixtures::{addr, builder, record, replacement};

    fn outcome(record: &mp_01_codec::MerkleUpdate) -> ValidationOutcome {
        StateValidator::new().outcome(&replacement(record))
    }

    #[test]
    fn test_falsified_old_point_is_rejected() {
        let builder = builder(&[(0xa1, 100)]);
        let honest = record(&builder, &[(0xa1, 150)]);
        for forged in [0u32, 1, 99, 101, 150, u32::MAX] {
            let mut record = honest.clone();
            record.accounts[0].old_point = forged;
            assert_eq!(
                outcome(&record),
                ValidationOutcome::OldStateInvalid,
                "old point {}",
                forged
            );
        }
    }

    #[test]
    fn test_falsified_new_point_is_rejected() {
        let builder = builder(&[(1, 100), (2, 5)]);
        let honest = record(&builder, &[(1, 150), (2, 6)]);
        for index in 0..honest.accounts.len() {
            let mut record = honest.clone();
            record.accounts[index].new_point += 1;
            assert_eq!(outcome(&record), ValidationOutcome::NewStateInvalid);
        }
    }

    #[test]
    fn test_swapped_addresses_are_rejected() {
        let builder = builder(&[(1, 100), (2, 5)]);
        let mut record = record(&builder, &[(1, 150), (2, 6)]);
        record.accounts[0].address = addr(9);
        assert_ne!(outcome(&record), ValidationOutcome::Accepted);
    }

    #[test]
    fn test_tampered_roots_are_rejected() {
        let builder = builder(&[(1, 100)]);
        let honest = record(&builder, &[(1, 150)]);

        let mut record = honest.clone();
        record.old_root[31] ^= 0x80;
        assert_eq!(outcome(&record), ValidationOutcome::OldStateInvalid);

        let mut record = honest.clone();
        record.new_root[0] ^= 0x01;
        assert_eq!(outcome(&record), ValidationOutcome::NewStateInvalid);

        // Record intact, commitments on the ledger disagree with it
        let bytes = encode(&honest).unwrap();
        let tx = TransactionView::replacement(&[0x11; 32], &honest.new_root, bytes.clone());
        assert_eq!(StateValidator::new().outcome(&tx), ValidationOutcome::OldStateInvalid);
        let tx = TransactionView::replacement(&honest.old_root, &[0x22; 32], bytes);
        assert_eq!(StateValidator::new().outcome(&tx), ValidationOutcome::NewStateInvalid);
    }

    #[test]
    fn test_every_proof_byte_matters() {
        let builder = builder(&[(1, 100), (2, 7), (3, 9)]);
        let honest = record(&builder, &[(1, 150), (4, 1)]);
        for i in 0..honest.proof.len() {
            let mut record = honest.clone();
            record.proof[i] ^= 0x04;
            assert_ne!(outcome(&record), ValidationOutcome::Accepted, "proof byte {}", i);
        }

        let mut record = honest.clone();
        record.proof.truncate(honest.proof.len() - 1);
        assert_ne!(outcome(&record), ValidationOutcome::Accepted);
    }

    #[test]
    fn test_respelled_proof_is_rejected() {
        let builder = builder(&[(1, 100)]);
        let honest = record(&builder, &[(1, 150), (2, 5)]);
        assert_eq!(outcome(&honest), ValidationOutcome::Accepted);
        assert_eq!(honest.proof[0], 0x00);
        let run = honest.proof[1];
        assert!(run >= 2);

        // Same siblings, first run written as two runs
        let mut record = honest.clone();
        record.proof = [0x00, 1, 0x00, run - 1].to_vec();
        record.proof.extend_from_slice(&honest.proof[2..]);
        assert_eq!(outcome(&record), ValidationOutcome::OldStateInvalid);

        // Same siblings, first empty one written as an explicit hash
        let mut record = honest.clone();
        record.proof = vec![0x01];
        record.proof.extend_from_slice(&[0u8; 32]);
        record.proof.extend_from_slice(&[0x00, run - 1]);
        record.proof.extend_from_slice(&honest.proof[2..]);
        assert_eq!(outcome(&record), ValidationOutcome::OldStateInvalid);
    }

    #[test]
    fn test_missing_or_garbled_record() {
        let builder = builder(&[(1, 100)]);
        let honest = record(&builder, &[(1, 150)]);

        let mut tx = replacement(&honest);
        tx.witnesses.clear();
        assert_eq!(StateValidator::new().outcome(&tx), ValidationOutcome::MissingRecord);

        let mut tx = replacement(&honest);
        tx.witnesses[0].input_type = Some(vec![0xff; 7]);
        assert_eq!(StateValidator::new().outcome(&tx), ValidationOutcome::MissingRecord);
    }

    // =========================================================================
    // HASH PRIMITIVE MISMATCH
    // =========================================================================

    #[test]
    fn test_builder_and_validator_must_share_hasher() {
        let blake3 = UpdateBuilder::<Blake3>::with_config(BuilderConfig::default()).unwrap();
        let record = blake3
            .build_transition(None, &[AccountUpdate::new(addr(1), 0, 150)])
            .unwrap();
        let tx = TransactionView::creation(&record.new_root, encode(&record).unwrap());
        assert_ne!(StateValidator::new().outcome(&tx), ValidationOutcome::Accepted);
        assert_eq!(
            StateValidator::<Blake3>::default().outcome(&tx),
            ValidationOutcome::Accepted
        );

        let ckb = builder(&[(1, 100)]);
        let record = crate::integration::fixtures::record(&ckb, &[(1, 150)]);
        assert_ne!(
            StateValidator::<Blake3>::default().outcome(&replacement(&record)),
            ValidationOutcome::Accepted
        );
        assert_eq!(
            StateValidator::<CkbBlake2b>::default().outcome(&replacement(&record)),
            ValidationOutcome::Accepted
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_any_wrong_old_point_is_rejected(actual in 1u32..1_000_000, claimed in any::<u32>()) {
            prop_assume!(claimed != actual);
            let builder = builder(&[(7, actual)]);
            let mut record = record(&builder, &[(7, actual.wrapping_add(1))]);
            record.accounts[0].old_point = claimed;
            prop_assert_eq!(outcome(&record), ValidationOutcome::OldStateInvalid);
        }
    }
}
