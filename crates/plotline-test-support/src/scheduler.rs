//! Virtual-time `Scheduler` for tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use plotline_core::scheduler::{ScheduledTask, Scheduler};
use uuid::Uuid;

struct Pending {
    due: Duration,
    task: ScheduledTask,
}

#[derive(Default)]
struct State {
    now: Duration,
    pending: HashMap<Uuid, Pending>,
}

/// A scheduler driven by an explicit virtual clock. Nothing runs until the
/// test calls `advance`.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<State>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl ManualScheduler {
    /// Creates a scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Moves virtual time forward by `by` and runs every task that has come
    /// due, earliest first. Returns how many tasks ran.
    pub async fn advance(&self, by: Duration) -> usize {
        let mut due: Vec<Pending> = {
            let mut state = self.lock();
            state.now += by;
            let now = state.now;
            let keys: Vec<Uuid> = state
                .pending
                .iter()
                .filter(|(_, p)| p.due <= now)
                .map(|(key, _)| *key)
                .collect();
            keys.into_iter()
                .filter_map(|key| state.pending.remove(&key))
                .collect()
        };
        due.sort_by_key(|p| p.due);

        let ran = due.len();
        for pending in due {
            pending.task.await;
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&self, key: Uuid, delay: Duration, task: ScheduledTask) {
        let mut state = self.lock();
        let due = state.now + delay;
        state.pending.insert(key, Pending { due, task });
    }

    fn cancel(&self, key: Uuid) -> bool {
        self.lock().pending.remove(&key).is_some()
    }

    fn is_armed(&self, key: Uuid) -> bool {
        self.lock().pending.contains_key(&key)
    }
}
