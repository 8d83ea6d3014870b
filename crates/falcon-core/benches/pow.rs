use criterion::{criterion_group, criterion_main, Criterion};
use falcon_core::{mine_block_parallel, Block};
use serde_json::json;

fn bench_pow(c: &mut Criterion) {
    c.bench_function("mine_difficulty_3", |b| {
        let block = Block::new(1, "01/01/2018", json!({ "amount": 4 }));
        b.iter(|| {
            let mut candidate = block.clone();
            candidate.mine(3);
            candidate
        });
    });

    c.bench_function("mine_parallel_difficulty_3", |b| {
        let block = Block::new(1, "01/01/2018", json!({ "amount": 4 }));
        b.iter(|| mine_block_parallel(block.clone(), 3));
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
