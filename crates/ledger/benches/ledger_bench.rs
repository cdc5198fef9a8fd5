use criterion::{Criterion, criterion_group, criterion_main};
use ledger::{InMemoryLedger, InventoryRow, Ledger, ProductId};

fn bench_read_all_seeded(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ledger = InMemoryLedger::seeded();

    c.bench_function("ledger/read_all_seeded", |b| {
        b.iter(|| {
            rt.block_on(async {
                ledger.read_all().await.unwrap();
            });
        });
    });
}

fn bench_update_conditional(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let product_id = ProductId::new("A");

    c.bench_function("ledger/update_conditional", |b| {
        b.iter(|| {
            rt.block_on(async {
                let ledger = InMemoryLedger::with_rows([InventoryRow::new("A", "Ay", 1_000)]);
                ledger.update_conditional(&product_id, 1).await.unwrap();
            });
        });
    });
}

fn bench_contended_updates_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let product_id = ProductId::new("A");

    c.bench_function("ledger/contended_updates_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                let ledger = InMemoryLedger::with_rows([InventoryRow::new("A", "Ay", 50)]);
                let calls = (0..100).map(|_| ledger.update_conditional(&product_id, 1));
                futures_util::future::join_all(calls).await;
            });
        });
    });
}

criterion_group!(
    benches,
    bench_read_all_seeded,
    bench_update_conditional,
    bench_contended_updates_100
);
criterion_main!(benches);
