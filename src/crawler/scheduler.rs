//! Bounded fan-out / fan-in of concurrent work
//!
//! Every concurrent stage of the harvest (result pages, listing cards,
//! CSV rows) goes through this module:
//! - One tokio task is spawned per unit of work
//! - A shared semaphore bounds how many of them run at once
//! - Each task reports `(launch_index, result)` on a channel
//! - The caller is the only owner of the collected results
//!
//! The first error reported by any task is returned to the caller and every
//! task still in flight is aborted.

use crate::HarvestError;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

type Report<T> = (usize, Result<T, HarvestError>);

/// A set of spawned tasks whose results are drained in arrival order
pub struct FanOut<T> {
    receiver: mpsc::UnboundedReceiver<Report<T>>,
    tasks: JoinSet<()>,
    remaining: usize,
}

impl<T: Send + 'static> FanOut<T> {
    /// Spawns one task per item, running at most `limit` of them at once
    ///
    /// `work` receives the launch index and the item and returns the future
    /// to run. The future is only polled once a permit is available.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<I, F, Fut>(items: Vec<I>, limit: usize, work: F) -> Self
    where
        F: Fn(usize, I) -> Fut,
        Fut: Future<Output = Result<T, HarvestError>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(limit.max(1)));
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut tasks = JoinSet::new();
        let remaining = items.len();

        for (index, item) in items.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let sender = sender.clone();
            let job = work(index, item);

            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => job.await,
                    Err(e) => Err(HarvestError::Task(e.to_string())),
                };

                // The receiver is gone only when the caller already bailed out
                let _ = sender.send((index, result));
            });
        }

        Self {
            receiver,
            tasks,
            remaining,
        }
    }

    /// Number of results not yet drained
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Waits for the next result to arrive
    ///
    /// Returns `None` once every launched task has reported. After an error
    /// has been returned the fan-out is finished and all other tasks are
    /// aborted.
    pub async fn next(&mut self) -> Option<Result<(usize, T), HarvestError>> {
        if self.remaining == 0 {
            return None;
        }

        match self.receiver.recv().await {
            Some((index, Ok(value))) => {
                self.remaining -= 1;
                Some(Ok((index, value)))
            }
            Some((index, Err(e))) => {
                tracing::debug!("Task {} failed, aborting {} others", index, self.remaining - 1);
                self.finish();
                Some(Err(e))
            }
            None => {
                // Every sender is dropped but some task never reported: it panicked
                let error = self.join_failure().await;
                self.finish();
                Some(Err(error))
            }
        }
    }

    fn finish(&mut self) {
        self.remaining = 0;
        self.tasks.abort_all();
    }

    async fn join_failure(&mut self) -> HarvestError {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                return HarvestError::Task(e.to_string());
            }
        }
        HarvestError::Task("worker exited without reporting a result".to_string())
    }
}

/// Runs `work` over every item concurrently and returns the results in item order
///
/// # Arguments
///
/// * `items` - One unit of work per element
/// * `limit` - Maximum number of units running at once
/// * `work` - Builds the future for one unit from its index and item
///
/// # Returns
///
/// * `Ok(Vec<T>)` - One result per item, in the order the items were given
/// * `Err(HarvestError)` - The first error any unit reported
///
/// # Example
///
/// ```no_run
/// use job_harvester::crawler::fan_out;
///
/// # async fn example() -> Result<(), job_harvester::HarvestError> {
/// let doubled = fan_out(vec![1, 2, 3], 2, |_, n| async move { Ok(n * 2) }).await?;
/// assert_eq!(doubled, vec![2, 4, 6]);
/// # Ok(())
/// # }
/// ```
pub async fn fan_out<I, T, F, Fut>(items: Vec<I>, limit: usize, work: F) -> Result<Vec<T>, HarvestError>
where
    T: Send + 'static,
    F: Fn(usize, I) -> Fut,
    Fut: Future<Output = Result<T, HarvestError>> + Send + 'static,
{
    let total = items.len();
    let mut results = FanOut::spawn(items, limit, work);

    // Reassemble by launch index; arrival order is whatever the tasks make it
    let mut collected = BTreeMap::new();
    while let Some(report) = results.next().await {
        let (index, value) = report?;
        collected.insert(index, value);
    }

    debug_assert_eq!(collected.len(), total);
    Ok(collected.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_fan_out_empty() {
        let results: Vec<u32> = fan_out(Vec::<u32>::new(), 4, |_, n| async move { Ok(n) })
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_fan_out_preserves_item_order() {
        // Earlier items sleep longer so they finish last
        let items: Vec<u64> = (0..10).collect();
        let results = fan_out(items, 10, |_, n| async move {
            tokio::time::sleep(Duration::from_millis((10 - n) * 5)).await;
            Ok(n * 10)
        })
        .await
        .unwrap();

        assert_eq!(results, (0..10).map(|n| n * 10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_fan_out_passes_launch_index() {
        let items = vec!["a", "b", "c"];
        let results = fan_out(items, 2, |index, item| async move {
            Ok(format!("{}{}", item, index))
        })
        .await
        .unwrap();

        assert_eq!(results, vec!["a0", "b1", "c2"]);
    }

    #[tokio::test]
    async fn test_fan_out_respects_limit() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = fan_out((0..20).collect::<Vec<u32>>(), 3, |_, n| {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(n)
            }
        })
        .await
        .unwrap();

        assert_eq!(results.len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_fan_out_returns_first_error() {
        let result = fan_out((0..5).collect::<Vec<u32>>(), 5, |_, n| async move {
            if n == 3 {
                Err(HarvestError::Status {
                    url: "https://example.com/".to_string(),
                    status: 500,
                })
            } else {
                Ok(n)
            }
        })
        .await;

        assert!(matches!(
            result,
            Err(HarvestError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_fan_out_reports_panicked_task() {
        let result = fan_out(vec![0u32, 1], 2, |_, n| async move {
            if n == 1 {
                panic!("boom");
            }
            Ok(n)
        })
        .await;

        assert!(matches!(result, Err(HarvestError::Task(_))));
    }

    #[tokio::test]
    async fn test_drain_in_arrival_order() {
        let mut results = FanOut::spawn(vec![30u64, 0], 2, |_, delay| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(delay)
        });
        assert_eq!(results.remaining(), 2);

        let (first, _) = results.next().await.unwrap().unwrap();
        let (second, _) = results.next().await.unwrap().unwrap();
        assert_eq!((first, second), (1, 0));
        assert!(results.next().await.is_none());
    }
}
