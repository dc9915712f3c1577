//! Events raised by the canvas and what handling them produced.

use plotline_core::model::{Branch, StoryNode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An interaction reported by the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// The user dragged a connection between two nodes.
    Connect {
        /// Source node.
        source: Uuid,
        /// Target node.
        target: Uuid,
    },
    /// The user dropped a node at a new position.
    NodeMoved {
        /// Node that moved.
        id: Uuid,
        /// New x coordinate.
        x: f64,
        /// New y coordinate.
        y: f64,
    },
    /// The user clicked a node.
    NodeClicked {
        /// Clicked node.
        id: Uuid,
    },
    /// The user double-clicked a node.
    NodeDoubleClicked {
        /// Double-clicked node.
        id: Uuid,
    },
    /// The user deleted an edge.
    EdgeDeleted {
        /// Deleted branch.
        id: Uuid,
    },
    /// The user clicked empty canvas.
    PaneClicked,
}

/// Result of handling a `CanvasEvent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    /// A branch was created.
    Connected {
        /// The new branch.
        branch: Branch,
    },
    /// A node position was stored.
    Moved {
        /// Node that moved.
        node_id: Uuid,
    },
    /// Ancestors of a node are now highlighted.
    Highlighted {
        /// Clicked node.
        node_id: Uuid,
        /// Size of the highlighted set.
        count: usize,
    },
    /// The shell should open the node editor.
    EditRequested {
        /// Node to edit.
        node: StoryNode,
    },
    /// An edge delete was handled; `removed` is false when it was already gone.
    EdgeRemoved {
        /// Branch id from the event.
        branch_id: Uuid,
        /// Whether a branch was actually removed.
        removed: bool,
    },
    /// The highlight was reset.
    HighlightCleared,
}

impl EventOutcome {
    /// Whether the outcome changed graph state that should be flushed.
    #[must_use]
    pub fn changes_graph(&self) -> bool {
        match self {
            Self::Connected { .. } | Self::Moved { .. } => true,
            Self::EdgeRemoved { removed, .. } => *removed,
            Self::Highlighted { .. } | Self::EditRequested { .. } | Self::HighlightCleared => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_event_deserializes_tagged_json() {
        let id = Uuid::new_v4();
        let json = serde_json::json!({ "type": "node_moved", "id": id, "x": 1.5, "y": -2.0 });

        let event: CanvasEvent = serde_json::from_value(json).unwrap();

        assert_eq!(event, CanvasEvent::NodeMoved { id, x: 1.5, y: -2.0 });
    }

    #[test]
    fn test_pane_clicked_deserializes_without_fields() {
        let event: CanvasEvent =
            serde_json::from_value(serde_json::json!({ "type": "pane_clicked" })).unwrap();

        assert_eq!(event, CanvasEvent::PaneClicked);
    }

    #[test]
    fn test_only_effective_edge_removal_changes_graph() {
        let branch_id = Uuid::new_v4();
        assert!(EventOutcome::EdgeRemoved { branch_id, removed: true }.changes_graph());
        assert!(!EventOutcome::EdgeRemoved { branch_id, removed: false }.changes_graph());
        assert!(!EventOutcome::HighlightCleared.changes_graph());
    }
}
