//! Plotline Sync: debounced persistence of script graphs.
//!
//! Edits land in the in-memory session first. This crate decides when the
//! whole graph is written back to the backing store: after a quiet period
//! for drags and structural edits, or straight away for a manual save.

pub mod position_sync;
pub mod snapshot;
pub mod tokio_scheduler;

pub use position_sync::{DEFAULT_DEBOUNCE, PositionSync};
pub use snapshot::GraphSnapshot;
pub use tokio_scheduler::TokioScheduler;
