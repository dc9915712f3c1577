//! Edit-session state: the authoritative graph plus canvas settings.
//!
//! Handlers never capture graph state. They reach it through a
//! `SharedSession` at call time, so every read sees the latest snapshot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::domain::graph::ScriptGraph;
use crate::domain::layout::{LayoutDirection, PositionMode, auto_arrange};
use crate::domain::trace::Highlight;
use crate::domain::view::{CanvasView, project};
use plotline_core::error::DomainError;

/// One script open for editing.
#[derive(Debug, Clone)]
pub struct EditorSession {
    graph: ScriptGraph,
    direction: LayoutDirection,
    /// Node whose ancestors are highlighted.
    focus: Option<Uuid>,
}

/// The single mutable cell holding a session.
pub type SharedSession = Arc<Mutex<EditorSession>>;

impl EditorSession {
    /// Opens a session over `graph` with the default direction and no
    /// highlight.
    #[must_use]
    pub fn new(graph: ScriptGraph) -> Self {
        Self {
            graph,
            direction: LayoutDirection::default(),
            focus: None,
        }
    }

    /// Wraps the session in a `SharedSession`.
    #[must_use]
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// The script being edited.
    #[must_use]
    pub fn script_id(&self) -> Uuid {
        self.graph.script_id()
    }

    /// The current graph.
    #[must_use]
    pub fn graph(&self) -> &ScriptGraph {
        &self.graph
    }

    /// Mutable access for the command handlers.
    pub fn graph_mut(&mut self) -> &mut ScriptGraph {
        &mut self.graph
    }

    /// The current layout direction.
    #[must_use]
    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// The focused node, if its ancestors are highlighted.
    #[must_use]
    pub fn focus(&self) -> Option<Uuid> {
        self.focus
    }

    /// The highlight derived from the focused node and the current edges.
    #[must_use]
    pub fn highlight(&self) -> Highlight {
        match self.focus {
            Some(node_id) if self.graph.find_node(node_id).is_some() => {
                Highlight::ancestors_of(node_id, &self.graph.edges())
            }
            _ => Highlight::none(),
        }
    }

    /// Highlights every ancestor of `node_id` and returns the set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the node does not exist.
    pub fn focus_ancestors(&mut self, node_id: Uuid) -> Result<Highlight, DomainError> {
        self.graph.require_node(node_id)?;
        self.focus = Some(node_id);
        Ok(self.highlight())
    }

    /// Resets every node and edge to its default appearance.
    pub fn clear_highlight(&mut self) {
        self.focus = None;
    }

    /// Drops the focus when it points at `node_id`.
    pub(crate) fn release_focus(&mut self, node_id: Uuid) {
        if self.focus == Some(node_id) {
            self.focus = None;
        }
    }

    /// The canvas view, honouring stored positions.
    #[must_use]
    pub fn view(&self) -> CanvasView {
        project(
            &self.graph,
            self.direction,
            PositionMode::RespectStored,
            &self.highlight(),
        )
    }

    /// Recomputes and stores every position, switching direction first when
    /// one is given.
    pub fn arrange(&mut self, direction: Option<LayoutDirection>) -> CanvasView {
        if let Some(direction) = direction {
            self.direction = direction;
        }
        auto_arrange(&mut self.graph, self.direction);
        self.view()
    }

    /// Flips the layout direction and re-arranges for it.
    pub fn toggle_direction(&mut self) -> CanvasView {
        self.arrange(Some(self.direction.toggled()))
    }
}

/// Locks a shared session. A poisoned lock still holds a consistent graph
/// because every mutation completes before returning, so it is recovered.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, EditorSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
