//! Projection of the graph into the node and edge lists the canvas draws.
//!
//! A projection is a pure function of graph state, layout direction,
//! position mode, and highlight. It is rebuilt after every change rather
//! than patched.

use serde::Serialize;
use uuid::Uuid;

use super::graph::ScriptGraph;
use super::layout::{ConnectorSides, LayoutDirection, Position, PositionMode, assign_positions};
use super::trace::Highlight;

const UNTITLED_LABEL: &str = "Untitled beat";
const EMPTY_CONTENT: &str = "No description";

/// Edge colouring by branch rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeAccent {
    /// A node's first branch.
    Primary,
    /// Any later branch.
    Secondary,
}

/// A node as the canvas renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasNode {
    /// Node id.
    pub id: Uuid,
    /// Owning layer.
    pub layer_id: Uuid,
    /// Canvas position.
    pub position: Position,
    /// Sides edges attach to.
    pub connector_sides: ConnectorSides,
    /// Title, or a placeholder when blank.
    pub display_label: String,
    /// Content, or a placeholder when blank.
    pub display_content: String,
    /// Rendered faded because it is outside the highlight.
    pub dimmed: bool,
}

/// An edge as the canvas renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasEdge {
    /// Branch id.
    pub id: Uuid,
    /// Source node.
    pub source: Uuid,
    /// Target node.
    pub target: Uuid,
    /// Branch label.
    pub label: String,
    /// Colour class.
    pub accent: EdgeAccent,
    /// Both endpoints are inside the highlight.
    pub highlighted: bool,
    /// Rendered faded.
    pub dimmed: bool,
    /// Rendered with flow animation.
    pub animated: bool,
}

/// Everything the canvas needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasView {
    /// Layout direction the positions were computed for.
    pub direction: LayoutDirection,
    /// Nodes in layer order.
    pub nodes: Vec<CanvasNode>,
    /// Edges grouped by source node.
    pub edges: Vec<CanvasEdge>,
    /// Size of the highlighted set; 0 when nothing is highlighted.
    pub highlighted_count: usize,
}

fn display_or(text: &str, placeholder: &str) -> String {
    if text.trim().is_empty() {
        placeholder.to_owned()
    } else {
        text.to_owned()
    }
}

/// Builds the canvas view of `graph`.
#[must_use]
pub fn project(
    graph: &ScriptGraph,
    direction: LayoutDirection,
    mode: PositionMode,
    highlight: &Highlight,
) -> CanvasView {
    // `assign_positions` walks nodes in the same order as `all_nodes`.
    let nodes = assign_positions(graph, direction, mode)
        .into_iter()
        .zip(graph.all_nodes())
        .map(|(placed, node)| CanvasNode {
            id: node.id,
            layer_id: placed.layer_id,
            position: placed.position,
            connector_sides: placed.sides,
            display_label: display_or(&node.title, UNTITLED_LABEL),
            display_content: display_or(&node.content, EMPTY_CONTENT),
            dimmed: highlight.dims_node(node.id),
        })
        .collect();

    let edges = graph
        .all_branches()
        .map(|branch| {
            let (highlighted, dimmed, animated) = if highlight.is_empty() {
                (false, false, true)
            } else {
                let lit = highlight.lights_edge(branch.from_node_id, branch.to_node_id);
                (lit, !lit, lit)
            };
            CanvasEdge {
                id: branch.id,
                source: branch.from_node_id,
                target: branch.to_node_id,
                label: branch.branch_label.clone(),
                accent: if branch.branch_order <= 1 {
                    EdgeAccent::Primary
                } else {
                    EdgeAccent::Secondary
                },
                highlighted,
                dimmed,
                animated,
            }
        })
        .collect();

    CanvasView {
        direction,
        nodes,
        edges,
        highlighted_count: highlight.len(),
    }
}
