//! Read access to the graph state a flush writes out.

use std::sync::{Mutex, PoisonError};

use plotline_core::model::Layer;
use plotline_graph::EditorSession;
use uuid::Uuid;

/// Source of the graph to persist. Read at flush time, never at schedule
/// time.
pub trait GraphSnapshot: Send + Sync {
    /// Script the graph belongs to.
    fn script_id(&self) -> Uuid;

    /// A copy of every layer as it stands right now.
    fn snapshot(&self) -> Vec<Layer>;
}

impl GraphSnapshot for Mutex<EditorSession> {
    fn script_id(&self) -> Uuid {
        self.lock().unwrap_or_else(PoisonError::into_inner).script_id()
    }

    fn snapshot(&self) -> Vec<Layer> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .graph()
            .layers()
            .to_vec()
    }
}
