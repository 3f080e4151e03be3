//! Fan-out primitives for batch lookups.
//!
//! Two strategies, both of which attempt every item and never let one
//! failure cancel the rest:
//!
//! - [`settle_all`] runs every future concurrently on the calling task and
//!   returns each outcome in input position, success or failure.
//! - [`sequential_throttled`] runs one item at a time in input order with a
//!   fixed pause between consecutive items.

use futures::future::join_all;
use std::future::Future;
use std::time::Duration;

/// Await every future and keep every outcome, aligned with the input order.
///
/// This is the "settle all, discard none" aggregation: completion order is
/// unspecified, but the returned vector always has one entry per input at the
/// input's index.
pub async fn settle_all<I, F, T, E>(futures: I) -> Vec<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures).await
}

/// Run `op` for each item strictly in order, sleeping `delay` between
/// consecutive calls (never after the last one).
///
/// Every item is attempted regardless of earlier outcomes; outcomes are
/// returned in input order.
pub async fn sequential_throttled<'a, S, F, Fut, T, E>(
    items: &'a [S],
    delay: Duration,
    mut op: F,
) -> Vec<Result<T, E>>
where
    F: FnMut(&'a S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut outcomes = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcomes.push(op(item).await);
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_settle_all_keeps_failures_in_place() {
        let futures = (0..5).map(|i| async move {
            if i % 2 == 1 {
                Err(format!("item {} failed", i))
            } else {
                Ok(i)
            }
        });

        let outcomes = settle_all(futures).await;
        assert_eq!(outcomes.len(), 5);
        assert_eq!(outcomes[0], Ok(0));
        assert_eq!(outcomes[1], Err("item 1 failed".to_string()));
        assert_eq!(outcomes[4], Ok(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_all_runs_concurrently() {
        let start = Instant::now();
        let futures = (0..4).map(|i| async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok::<_, ()>(i)
        });

        let outcomes = settle_all(futures).await;
        assert_eq!(outcomes.len(), 4);
        // All four sleeps overlap instead of adding up
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_all_aligns_by_index_not_completion() {
        let finished: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let delays = [3u64, 2, 1];
        let futures = delays.iter().enumerate().map(|(i, secs)| {
            let finished = finished.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(*secs)).await;
                finished.lock().unwrap().push(i);
                if i == 1 {
                    Err(i)
                } else {
                    Ok(i * 10)
                }
            }
        });

        let outcomes = settle_all(futures).await;
        assert_eq!(*finished.lock().unwrap(), vec![2, 1, 0]);
        assert_eq!(outcomes, vec![Ok(0), Err(1), Ok(20)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_waits_between_items_only() {
        let calls: Arc<Mutex<Vec<(u32, Duration)>>> = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();
        let items = [1u32, 2, 3];

        let outcomes = sequential_throttled(&items, Duration::from_secs(1), |item| {
            let calls = calls.clone();
            async move {
                calls.lock().unwrap().push((*item, start.elapsed()));
                if *item == 2 {
                    Err("boom")
                } else {
                    Ok(*item * 10)
                }
            }
        })
        .await;

        assert_eq!(outcomes, vec![Ok(10), Err("boom"), Ok(30)]);
        let calls = calls.lock().unwrap();
        let order: Vec<u32> = calls.iter().map(|(item, _)| *item).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert!(calls[0].1 < Duration::from_millis(10));
        assert!(calls[1].1 >= Duration::from_secs(1));
        assert!(calls[2].1 >= Duration::from_secs(2));
        // No trailing delay after the last item
        assert!(start.elapsed() < Duration::from_millis(2100));
    }

    #[tokio::test]
    async fn test_sequential_empty_input() {
        let items: [u32; 0] = [];
        let outcomes =
            sequential_throttled(&items, Duration::from_secs(1), |i| async move { Ok::<_, ()>(*i) })
                .await;
        assert!(outcomes.is_empty());
    }
}
