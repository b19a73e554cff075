use crate::domain::ports::{Scheduler, Task};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Schedules tasks on the ambient tokio runtime.
///
/// Handles are kept until [`Scheduler::drain`] collects them or a later
/// `schedule` call finds them finished. Under a paused test clock the sleeps
/// resolve as soon as the runtime is otherwise idle.
#[derive(Default, Clone)]
pub struct TokioScheduler {
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    async fn drain(&self) {
        loop {
            let handles =
                std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!(error = %e, "scheduled task panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_drain_waits_for_nested_tasks() {
        let scheduler = TokioScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let inner_scheduler = scheduler.clone();
        let inner_hits = hits.clone();
        scheduler.schedule(
            Duration::from_secs(2),
            Box::pin(async move {
                inner_hits.fetch_add(1, Ordering::SeqCst);
                let nested_hits = inner_hits.clone();
                inner_scheduler.schedule(
                    Duration::from_secs(3),
                    Box::pin(async move {
                        nested_hits.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        scheduler.drain().await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_delay() {
        let scheduler = TokioScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let task_hits = hits.clone();
        scheduler.schedule(
            Duration::from_secs(5),
            Box::pin(async move {
                task_hits.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        scheduler.drain().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_handles_pruned_without_drain() {
        let scheduler = TokioScheduler::new();
        for _ in 0..1000 {
            scheduler.schedule(Duration::ZERO, Box::pin(async {}));
        }
        tokio::time::sleep(Duration::from_millis(1)).await;

        scheduler.schedule(Duration::from_secs(1), Box::pin(async {}));
        assert_eq!(scheduler.pending.lock().unwrap().len(), 1);

        scheduler.drain().await;
        assert!(scheduler.pending.lock().unwrap().is_empty());
    }
}
