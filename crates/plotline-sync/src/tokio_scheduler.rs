//! `Scheduler` backed by tokio timers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use plotline_core::scheduler::{ScheduledTask, Scheduler};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

struct Timer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Timers {
    next_generation: u64,
    armed: HashMap<Uuid, Timer>,
}

type SharedTimers = Arc<Mutex<Timers>>;

/// Spawns each armed task on a tokio runtime behind a `sleep`.
///
/// A timer leaves the table as soon as its delay elapses, before its task
/// starts. From then on it can no longer be replaced or cancelled, so a
/// write already under way always runs to completion.
pub struct TokioScheduler {
    runtime: Handle,
    timers: SharedTimers,
}

impl std::fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("armed", &lock(&self.timers).armed.len())
            .finish()
    }
}

impl TokioScheduler {
    /// Creates a scheduler that spawns onto `runtime`.
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: SharedTimers::default(),
        }
    }
}

fn lock(timers: &Mutex<Timers>) -> MutexGuard<'_, Timers> {
    timers.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Scheduler for TokioScheduler {
    fn arm(&self, key: Uuid, delay: Duration, task: ScheduledTask) {
        let mut timers = lock(&self.timers);
        timers.next_generation += 1;
        let generation = timers.next_generation;

        let table = Arc::clone(&self.timers);
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut timers = lock(&table);
                let current = timers.armed.get(&key).map(|timer| timer.generation);
                if current != Some(generation) {
                    // Replaced or cancelled while waking up.
                    return;
                }
                timers.armed.remove(&key);
            }
            task.await;
        });

        if let Some(previous) = timers.armed.insert(key, Timer { generation, handle }) {
            previous.handle.abort();
        }
    }

    fn cancel(&self, key: Uuid) -> bool {
        match lock(&self.timers).armed.remove(&key) {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    fn is_armed(&self, key: Uuid) -> bool {
        lock(&self.timers).armed.contains_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_task(counter: &Arc<AtomicUsize>) -> ScheduledTask {
        let counter = Arc::clone(counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_delay() {
        let scheduler = TokioScheduler::new(Handle::current());
        let counter = Arc::new(AtomicUsize::new(0));
        let key = Uuid::new_v4();

        scheduler.arm(key, Duration::from_millis(2000), counting_task(&counter));
        assert!(scheduler.is_armed(key));
        tokio::time::sleep(Duration::from_millis(1999)).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        settle().await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_armed(key));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_replaces_pending_task() {
        // Arrange
        let scheduler = TokioScheduler::new(Handle::current());
        let counter = Arc::new(AtomicUsize::new(0));
        let key = Uuid::new_v4();

        // Act
        scheduler.arm(key, Duration::from_millis(2000), counting_task(&counter));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        scheduler.arm(key, Duration::from_millis(2000), counting_task(&counter));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        settle().await;

        // Assert
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(1001)).await;
        settle().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_task() {
        let scheduler = TokioScheduler::new(Handle::current());
        let counter = Arc::new(AtomicUsize::new(0));
        let key = Uuid::new_v4();
        scheduler.arm(key, Duration::from_millis(100), counting_task(&counter));

        assert!(scheduler.cancel(key));
        assert!(!scheduler.cancel(key));
        tokio::time::sleep(Duration::from_millis(200)).await;
        settle().await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let scheduler = TokioScheduler::new(Handle::current());
        let counter = Arc::new(AtomicUsize::new(0));

        scheduler.arm(Uuid::new_v4(), Duration::from_millis(10), counting_task(&counter));
        scheduler.arm(Uuid::new_v4(), Duration::from_millis(10), counting_task(&counter));
        tokio::time::sleep(Duration::from_millis(20)).await;
        settle().await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
