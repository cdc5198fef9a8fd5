//! Fan-out/fan-in batches.

use std::future::Future;

use futures_util::future::join_all;
use thiserror::Error;
use tokio::task::JoinError;

/// A batch member that did not run to completion.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Batch member panicked: {0}")]
    Panicked(String),

    #[error("Batch member was cancelled")]
    Cancelled,
}

impl From<JoinError> for BatchError {
    fn from(err: JoinError) -> Self {
        if err.is_cancelled() {
            BatchError::Cancelled
        } else {
            BatchError::Panicked(err.to_string())
        }
    }
}

/// Spawns every call as its own task and waits for all of them.
///
/// Results come back in input order, one per call. A failing or panicking
/// member never cancels its siblings and never cuts the wait short.
pub async fn fan_out<I, F, T>(calls: I) -> Vec<Result<T, BatchError>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = calls.into_iter().map(tokio::spawn).collect();
    metrics::histogram!("fan_out_batch_size").record(handles.len() as f64);
    tracing::debug!(members = handles.len(), "fan-out batch dispatched");

    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.map_err(BatchError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Barrier;

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let calls = (0..5u64).map(|i| async move {
            tokio::time::sleep(Duration::from_millis(10 * (5 - i))).await;
            i
        });

        let results: Vec<u64> = fan_out(calls)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_members_run_concurrently() {
        // Every member waits on the same barrier, so a sequential run would hang.
        let barrier = Arc::new(Barrier::new(4));
        let calls = (0..4).map(|i| {
            let barrier = barrier.clone();
            async move {
                barrier.wait().await;
                i
            }
        });

        let results = tokio::time::timeout(Duration::from_secs(5), fan_out(calls))
            .await
            .expect("batch members did not run concurrently");

        assert_eq!(results.len(), 4);
    }

    #[tokio::test]
    async fn test_failures_do_not_short_circuit() {
        let calls = (0..4).map(|i| async move {
            if i == 1 {
                Err(format!("member {i} failed"))
            } else {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(i)
            }
        });

        let results = fan_out(calls).await;

        assert_eq!(results.len(), 4);
        let values: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values[0], Ok(0));
        assert!(values[1].is_err());
        assert_eq!(values[3], Ok(3));
    }

    #[tokio::test]
    async fn test_panic_is_reported_per_member() {
        let calls = (0..3).map(|i| async move {
            if i == 2 {
                panic!("boom");
            }
            i
        });

        let results = fan_out(calls).await;

        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(results[2], Err(BatchError::Panicked(_))));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let calls: Vec<std::future::Ready<u8>> = Vec::new();
        assert!(fan_out(calls).await.is_empty());
    }
}
