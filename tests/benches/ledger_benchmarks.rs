//! # Merkle-Points Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | mp-02 SMT | multi-key proof generation |
//! | mp-03 Builder | full record build with self-check |
//! | mp-04 Validator | state validation of a replacement |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mp_01_codec::encode;
use mp_02_smt::{leaf_key, leaf_value, ProofTree, SmtAdapter};
use mp_03_builder::{AccountPoint, BuilderConfig, UpdateBuilder};
use mp_04_validator::{StateValidator, TransactionView};
use rand::Rng;
use shared_crypto::CkbBlake2b;

const TRACKED: usize = 1_000;

fn random_accounts(count: usize) -> Vec<AccountPoint> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| AccountPoint::new(rng.gen(), rng.gen_range(1..1_000_000)))
        .collect()
}

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mp-02-smt");
    let accounts = random_accounts(TRACKED);
    let mut tree = SmtAdapter::<CkbBlake2b>::new();
    for account in &accounts {
        tree.set(
            leaf_key::<CkbBlake2b>(&account.address),
            Some(leaf_value::<CkbBlake2b>(account.point)),
        );
    }

    for size in [1usize, 16, 128] {
        let keys: Vec<_> = accounts[..size]
            .iter()
            .map(|a| leaf_key::<CkbBlake2b>(&a.address))
            .collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("prove_multi", size), &keys, |b, keys| {
            b.iter(|| black_box(tree.prove_multi(keys).map(|p| p.len())))
        });
    }
    group.finish();
}

fn bench_build_and_validate(c: &mut Criterion) {
    let accounts = random_accounts(TRACKED);
    let builder =
        UpdateBuilder::<CkbBlake2b>::with_accounts(BuilderConfig::default(), accounts.clone())
            .expect("valid mirror");

    let mut group = c.benchmark_group("mp-03-builder");
    for size in [1usize, 16, 128] {
        let changes: Vec<_> = accounts[..size]
            .iter()
            .map(|a| AccountPoint::new(a.address, a.point + 1))
            .collect();
        let updates = builder.plan(changes);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build_transition", size), &updates, |b, updates| {
            b.iter(|| black_box(builder.build_transition(Some(builder.current_root()), updates)))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("mp-04-validator");
    let validator = StateValidator::new();
    for size in [1usize, 16, 128] {
        let changes: Vec<_> = accounts[..size]
            .iter()
            .map(|a| AccountPoint::new(a.address, a.point + 1))
            .collect();
        let record = builder
            .build_transition(Some(builder.current_root()), &builder.plan(changes))
            .expect("record builds");
        let tx = TransactionView::replacement(
            &record.old_root,
            &record.new_root,
            encode(&record).expect("record encodes"),
        );
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("validate", size), &tx, |b, tx| {
            b.iter(|| black_box(validator.validate(tx).is_ok()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_proof_generation, bench_build_and_validate);
criterion_main!(benches);
