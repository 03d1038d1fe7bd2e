use criterion::{Criterion, black_box, criterion_group, criterion_main};
use itertools::Itertools;
use rand::{Rng, thread_rng};
use std::sync::Arc;
use txpool_consensus_core::{
    constants::SEQUENCE_FINAL,
    tx::{ScriptPublicKey, Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput},
};
use txpool_mempool::mempool::{
    check_package::{check_package, is_consistent_package, is_topo_sorted_package},
    config::Config,
};

fn p2wpkh_output(value: u64) -> TransactionOutput {
    let mut script = vec![0x00, 0x14];
    script.extend([0x11; 20]);
    TransactionOutput::new(value, ScriptPublicKey::new(script))
}

fn witness_input(outpoint: TransactionOutpoint) -> TransactionInput {
    TransactionInput::new(outpoint, vec![], SEQUENCE_FINAL, vec![vec![0x30; 72], vec![0x02; 33]])
}

/// Builds `parent_count` parents spending random confirmed outpoints, followed by a child spending all of them
fn build_child_with_parents(parent_count: usize) -> Vec<Arc<Transaction>> {
    let mut rng = thread_rng();
    let parents = (0..parent_count)
        .map(|_| {
            let outpoint = TransactionOutpoint::new(TransactionId::from_bytes(rng.r#gen()), rng.gen_range(0..4));
            Arc::new(Transaction::new(2, vec![witness_input(outpoint)], vec![p2wpkh_output(100_000)], 0))
        })
        .collect_vec();
    let inputs = parents.iter().map(|x| witness_input(TransactionOutpoint::new(x.id(), 0))).collect();
    let child = Arc::new(Transaction::new(2, inputs, vec![p2wpkh_output(100_000 * parent_count as u64 - 10_000)], 0));
    parents.into_iter().chain(std::iter::once(child)).collect()
}

pub fn bench_check_package(c: &mut Criterion) {
    let mut group = c.benchmark_group("check package");
    let config = Config::default();

    let package = build_child_with_parents(config.maximum_package_count - 1);
    group.bench_function("child with 24 parents", |b| {
        b.iter(|| black_box(check_package(black_box(&package), &config).is_ok()))
    });

    let mut unsorted = package.clone();
    unsorted.rotate_right(1);
    group.bench_function("unsorted child with 24 parents", |b| {
        b.iter(|| black_box(check_package(black_box(&unsorted), &config).is_err()))
    });

    group.bench_function("topological sort and consistency predicates", |b| {
        b.iter(|| black_box(is_topo_sorted_package(black_box(&package)) && is_consistent_package(black_box(&package))))
    });

    group.finish();
}

criterion_group!(benches, bench_check_package);
criterion_main!(benches);
