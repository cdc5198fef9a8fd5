use common::ProductId;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use domain::{CartLine, InventoryService, SharedState, effective_lines};
use ledger::{InMemoryLedger, InventoryRow};

fn bench_effective_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("domain/effective_lines");
    for size in [10usize, 100, 1000] {
        let lines: Vec<CartLine> = (0..size)
            .map(|i| CartLine::new(format!("P-{:03}", i % 25), (i % 7) as u32))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| effective_lines(lines));
        });
    }
    group.finish();
}

fn bench_consume(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ledger = InMemoryLedger::with_rows(vec![InventoryRow::new("BENCH-01", "Bench item", u32::MAX)]);
    let service = InventoryService::new(ledger, SharedState::new());
    let product_id = ProductId::new("BENCH-01");

    c.bench_function("domain/consume", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.consume(&product_id, 1).await.unwrap();
            });
        });
    });
}

fn bench_refresh_all(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rows = (0..500).map(|i| InventoryRow::new(format!("P-{i:03}"), format!("Product {i}"), 100));
    let service = InventoryService::new(InMemoryLedger::with_rows(rows), SharedState::new());

    c.bench_function("domain/refresh_all_500", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.refresh_all().await.unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_effective_lines, bench_consume, bench_refresh_all);
criterion_main!(benches);
