//! Deferred-work abstraction.
//!
//! A scheduler holds at most one pending task per key. Arming a key that
//! already has a pending task replaces it, which is how repeated edits
//! coalesce into a single deferred flush. Production code injects a
//! runtime-backed implementation; tests inject a virtual clock.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use uuid::Uuid;

/// A unit of deferred work. The future is not polled until its delay has
/// elapsed, so it observes whatever state is current at that moment.
pub type ScheduledTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Keyed, cancelable timers.
pub trait Scheduler: Send + Sync {
    /// Schedule `task` to run after `delay`, replacing any task still
    /// waiting under `key`.
    fn arm(&self, key: Uuid, delay: Duration, task: ScheduledTask);

    /// Drop the task waiting under `key`. Returns `true` if one was pending.
    ///
    /// A task whose delay has already elapsed is not interrupted.
    fn cancel(&self, key: Uuid) -> bool;

    /// Returns `true` if a task is waiting under `key`.
    fn is_armed(&self, key: Uuid) -> bool;
}
