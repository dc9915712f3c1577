//! Query handlers for script editing.
//!
//! Read-only views over an `EditorSession`.

use plotline_core::error::DomainError;
use plotline_core::model::StoryNode;
use serde::Serialize;
use uuid::Uuid;

use crate::application::session::EditorSession;
use crate::domain::view::CanvasView;

/// A node entry in the layer outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineNode {
    /// Node id.
    pub id: Uuid,
    /// Node title.
    pub title: String,
    /// Node content.
    pub content: String,
}

/// A layer entry in the sidebar outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerOutline {
    /// Layer id.
    pub id: Uuid,
    /// Layer rank.
    pub layer_order: u32,
    /// Layer title.
    pub title: String,
    /// Number of nodes in the layer.
    pub node_count: usize,
    /// Nodes in display order.
    pub nodes: Vec<OutlineNode>,
}

/// The current canvas view.
#[must_use]
pub fn get_canvas_view(session: &EditorSession) -> CanvasView {
    session.view()
}

/// The layer-by-layer outline shown beside the canvas.
#[must_use]
pub fn get_layer_outline(session: &EditorSession) -> Vec<LayerOutline> {
    session
        .graph()
        .layers()
        .iter()
        .map(|layer| LayerOutline {
            id: layer.id,
            layer_order: layer.layer_order,
            title: layer.title.clone(),
            node_count: layer.nodes.len(),
            nodes: layer
                .nodes
                .iter()
                .map(|node| OutlineNode {
                    id: node.id,
                    title: node.title.clone(),
                    content: node.content.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Retrieves a node by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the node does not exist.
pub fn get_node(session: &EditorSession, node_id: Uuid) -> Result<StoryNode, DomainError> {
    session.graph().require_node(node_id).cloned()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use plotline_core::error::DomainError;
    use uuid::Uuid;

    use super::*;
    use crate::domain::graph::ScriptGraph;
    use crate::domain::seed::generate_seed_layers;
    use plotline_test_support::FixedClock;

    fn seeded_session() -> EditorSession {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let script_id = Uuid::new_v4();
        let layers = generate_seed_layers(script_id, &clock);
        EditorSession::new(ScriptGraph::from_layers(script_id, layers))
    }

    #[test]
    fn test_layer_outline_lists_layers_with_counts() {
        let session = seeded_session();

        let outline = get_layer_outline(&session);

        assert_eq!(outline.len(), 6);
        assert_eq!(outline[0].title, "Act 1");
        assert_eq!(outline[3].node_count, 8);
        assert_eq!(outline[3].nodes.len(), 8);
        assert_eq!(outline[1].nodes[0].title, "Act 2 - Beat 1");
    }

    #[test]
    fn test_get_node_returns_not_found_for_unknown_id() {
        let session = seeded_session();
        let missing = Uuid::new_v4();

        match get_node(&session, missing).unwrap_err() {
            DomainError::NotFound { id, .. } => assert_eq!(id, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_canvas_view_covers_seed_graph() {
        let session = seeded_session();

        let view = get_canvas_view(&session);

        assert_eq!(view.nodes.len(), 63);
        assert_eq!(view.edges.len(), 62);
    }
}
