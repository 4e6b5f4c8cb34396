//! # Devnet Lifecycle
//!
//! Builders reading the current commitment from the devnet ledger and
//! submitting replacements:
//!
//! ```text
//! [UpdateBuilder] ──build_against──→ [LedgerCommitmentSource] ──cell──→ [DevnetLedger]
//!        │                                                                 ↑
//!        └──────────────────── PendingTransition ──────────────────────────┘
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mp_01_codec::{encode, MerkleUpdate};
    use mp_03_builder::{AccountPoint, BuilderConfig, UpdateBuilder};
    use mp_04_validator::ValidationOutcome;
    use mp_05_devnet::{
        DevnetLedger, LedgerCommitmentSource, PendingTransition, Receipt, SubmitError,
    };
    use shared_crypto::CkbBlake2b;

    use crate::integration::fixtures::addr;

    type Ledger = Arc<DevnetLedger<CkbBlake2b>>;

    async fn prepare(
        source: &LedgerCommitmentSource<CkbBlake2b>,
        builder: &UpdateBuilder<CkbBlake2b>,
        consumes: Option<&Receipt>,
        targets: &[(u8, u32)],
    ) -> (PendingTransition, MerkleUpdate) {
        let updates = builder.plan(targets.iter().map(|(a, p)| AccountPoint::new(addr(*a), *p)));
        let record = builder.build_against(source, &updates).await.unwrap();
        let bytes = encode(&record).unwrap();
        let pending = match consumes {
            Some(receipt) => PendingTransition::replace(receipt.cell.out_point, record.new_root, bytes),
            None => PendingTransition::create(record.new_root, bytes),
        };
        (pending, record)
    }

    async fn submit_changes(
        ledger: &Ledger,
        source: &LedgerCommitmentSource<CkbBlake2b>,
        builder: &UpdateBuilder<CkbBlake2b>,
        consumes: Option<&Receipt>,
        targets: &[(u8, u32)],
    ) -> (Result<Receipt, SubmitError>, MerkleUpdate) {
        let (pending, record) = prepare(source, builder, consumes, targets).await;
        (ledger.submit(pending).await, record)
    }

    #[tokio::test]
    async fn test_record_lifecycle() {
        let ledger: Ledger = Arc::new(DevnetLedger::default());
        let mut source = LedgerCommitmentSource::new(ledger.clone(), None);
        let mut builder = UpdateBuilder::new(BuilderConfig::default()).unwrap();

        let (created, record) = submit_changes(&ledger, &source, &builder, None, &[(1, 100)]).await;
        let mut tip = created.unwrap();
        builder.apply(&record).unwrap();
        source.track(tip.cell.type_id);

        for round in 1..=4u32 {
            let targets = [(1, 100 + round), (round as u8 + 1, round)];
            let (result, record) =
                submit_changes(&ledger, &source, &builder, Some(&tip), &targets).await;
            let receipt = result.unwrap();
            assert_eq!(receipt.consumed, Some(tip.cell.out_point));
            assert_eq!(receipt.cell.type_id, tip.cell.type_id);
            builder.apply(&record).unwrap();
            tip = receipt;
        }

        assert_eq!(ledger.live_count().await, 1);
        let cell = ledger.cell(&tip.cell.type_id).await.unwrap();
        assert_eq!(cell.root(), builder.current_root());
        assert_eq!(builder.point(&addr(1)), Some(104));
    }

    #[tokio::test]
    async fn test_racing_builders_exactly_one_accepted() {
        let ledger: Ledger = Arc::new(DevnetLedger::default());
        let mut source = LedgerCommitmentSource::new(ledger.clone(), None);
        let mut seed = UpdateBuilder::new(BuilderConfig::default()).unwrap();
        let (created, record) = submit_changes(&ledger, &source, &seed, None, &[(1, 100), (2, 50)]).await;
        let tip = created.unwrap();
        seed.apply(&record).unwrap();
        source.track(tip.cell.type_id);

        // Both build against the same commitment, then race to submit
        let alice = UpdateBuilder::<CkbBlake2b>::with_accounts(BuilderConfig::default(), seed.accounts()).unwrap();
        let bob = UpdateBuilder::<CkbBlake2b>::with_accounts(BuilderConfig::default(), seed.accounts()).unwrap();
        let mut tasks = Vec::new();
        for (builder, targets) in [(&alice, [(1u8, 90u32)]), (&bob, [(2u8, 60u32)])] {
            let (pending, record) = prepare(&source, builder, Some(&tip), &targets).await;
            let ledger = ledger.clone();
            tasks.push(tokio::spawn(async move { (ledger.submit(pending).await, record) }));
        }

        let mut accepted = Vec::new();
        let mut refused = 0;
        for task in tasks {
            match task.await.unwrap() {
                (Ok(receipt), record) => accepted.push((receipt, record)),
                (Err(SubmitError::DeadInput { .. }), _) => refused += 1,
                (Err(e), _) => panic!("unexpected refusal: {e}"),
            }
        }
        assert_eq!(accepted.len(), 1);
        assert_eq!(refused, 1);
        let (winner, record) = &accepted[0];
        assert_eq!(ledger.live_count().await, 1);
        assert_eq!(ledger.cell(&winner.cell.type_id).await.unwrap().root(), record.new_root);

        // The loser refreshes its mirror and retries on the new tip
        seed.apply(record).unwrap();
        let (retry, _) = submit_changes(&ledger, &source, &seed, Some(winner), &[(3, 7)]).await;
        assert!(retry.is_ok());
    }

    #[tokio::test]
    async fn test_history_replays_to_live_root() {
        let ledger: Ledger = Arc::new(DevnetLedger::default());
        let mut source = LedgerCommitmentSource::new(ledger.clone(), None);
        let mut builder = UpdateBuilder::new(BuilderConfig::default()).unwrap();
        let (created, record) = submit_changes(&ledger, &source, &builder, None, &[(1, 100), (2, 3)]).await;
        let mut tip = created.unwrap();
        builder.apply(&record).unwrap();
        source.track(tip.cell.type_id);

        for targets in [vec![(1, 150)], vec![(2, 4), (5, 60)]] {
            let (result, record) = submit_changes(&ledger, &source, &builder, Some(&tip), &targets).await;
            tip = result.unwrap();
            builder.apply(&record).unwrap();
        }

        // A fresh client knows nothing but the ledger
        let history = ledger.history(&tip.cell.type_id).await;
        assert_eq!(history.len(), 3);
        let replayed = UpdateBuilder::<CkbBlake2b>::replay(BuilderConfig::default(), &history).unwrap();
        let live = ledger.cell(&tip.cell.type_id).await.unwrap();
        assert_eq!(replayed.current_root(), live.root());
        assert_eq!(replayed.accounts(), builder.accounts());
        assert_eq!(replayed.point(&addr(5)), Some(60));
    }

    #[tokio::test]
    async fn test_stale_record_on_new_tip_is_rejected() {
        let ledger: Ledger = Arc::new(DevnetLedger::default());
        let mut source = LedgerCommitmentSource::new(ledger.clone(), None);
        let mut builder = UpdateBuilder::new(BuilderConfig::default()).unwrap();
        let (created, record) = submit_changes(&ledger, &source, &builder, None, &[(1, 100)]).await;
        let first = created.unwrap();
        builder.apply(&record).unwrap();
        source.track(first.cell.type_id);

        let stale = {
            let updates = builder.plan(vec![AccountPoint::new(addr(1), 1)]);
            builder.build_transition(Some(first.cell.root()), &updates).unwrap()
        };
        let (second, _) = submit_changes(&ledger, &source, &builder, Some(&first), &[(1, 2)]).await;
        let second = second.unwrap();

        // Replays a record built against the consumed commitment
        let err = ledger
            .submit(PendingTransition::replace(
                second.cell.out_point,
                stale.new_root,
                encode(&stale).unwrap(),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.outcome(), Some(ValidationOutcome::OldStateInvalid));
        assert!(ledger.is_live(&second.cell.out_point).await);
    }
}
