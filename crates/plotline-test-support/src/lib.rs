//! Shared test doubles for the Plotline branching-script editor.

mod clock;
mod scheduler;
mod store;

pub use clock::FixedClock;
pub use scheduler::ManualScheduler;
pub use store::{
    ContentUpdateCall, EmptyGraphStore, FailingGraphStore, FailingScriptStore,
    RecordingGraphStore, RecordingScriptStore,
};
