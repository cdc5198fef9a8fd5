//! Integration tests for inventory consumption under concurrency.

use domain::{ConsumptionResult, InventoryService, ProductId, SharedState};
use futures_util::future::join_all;
use ledger::{InMemoryLedger, InventoryRow};

fn setup(rows: Vec<InventoryRow>) -> (InventoryService<InMemoryLedger>, InMemoryLedger) {
    let ledger = InMemoryLedger::with_rows(rows);
    let service = InventoryService::new(ledger.clone(), SharedState::new());
    (service, ledger)
}

async fn consume_concurrently(
    service: &InventoryService<InMemoryLedger>,
    product_id: &ProductId,
    counts: &[u32],
) -> Vec<ConsumptionResult> {
    let handles: Vec<_> = counts
        .iter()
        .map(|&count| {
            let service = service.clone();
            let product_id = product_id.clone();
            tokio::spawn(async move { service.consume(&product_id, count).await.unwrap() })
        })
        .collect();

    join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect()
}

fn consumed_total(results: &[ConsumptionResult]) -> u32 {
    results.iter().map(ConsumptionResult::consumed).sum()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_racing_consumers_cannot_both_win() {
    let (service, ledger) = setup(vec![InventoryRow::new("P", "Projector", 5)]);
    let p = ProductId::new("P");

    let results = consume_concurrently(&service, &p, &[3, 4]).await;

    let winners = results.iter().filter(|r| r.is_consumed()).count();
    assert_eq!(winners, 1);
    assert!(consumed_total(&results) <= 5);
    let remaining = ledger.count_of(&p).await.unwrap();
    assert_eq!(remaining + consumed_total(&results), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_consumers_never_drive_count_negative() {
    let (service, ledger) = setup(vec![InventoryRow::new("M", "Mug", 20)]);
    let m = ProductId::new("M");
    let counts: Vec<u32> = (0..50).map(|i| (i % 4) + 1).collect();

    let results = consume_concurrently(&service, &m, &counts).await;

    let total = consumed_total(&results);
    assert!(total <= 20);
    assert_eq!(ledger.count_of(&m).await.unwrap(), 20 - total);
    assert!(results.iter().any(|r| !r.is_consumed()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_products_do_not_conflict() {
    let (service, ledger) = setup(vec![
        InventoryRow::new("A", "Apple crate", 10),
        InventoryRow::new("B", "Banner", 4),
    ]);

    let a = {
        let service = service.clone();
        tokio::spawn(async move { service.consume(&ProductId::new("A"), 2).await.unwrap() })
    };
    let b = {
        let service = service.clone();
        tokio::spawn(async move { service.consume(&ProductId::new("B"), 1).await.unwrap() })
    };

    assert!(a.await.unwrap().is_consumed());
    assert!(b.await.unwrap().is_consumed());
    assert_eq!(ledger.count_of(&ProductId::new("A")).await, Some(8));
    assert_eq!(ledger.count_of(&ProductId::new("B")).await, Some(3));
}

#[tokio::test]
async fn test_sequential_consumption_until_exhausted() {
    let (service, ledger) = setup(vec![InventoryRow::new("T", "T-shirt", 5)]);
    let t = ProductId::new("T");

    assert!(service.consume(&t, 2).await.unwrap().is_consumed());
    assert!(service.consume(&t, 2).await.unwrap().is_consumed());
    assert!(!service.consume(&t, 2).await.unwrap().is_consumed());
    assert!(service.consume(&t, 1).await.unwrap().is_consumed());
    assert!(!service.consume(&t, 1).await.unwrap().is_consumed());
    assert_eq!(ledger.count_of(&t).await, Some(0));
}
