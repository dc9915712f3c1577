//! Commands issued by the editor shell.

use uuid::Uuid;

use super::layout::LayoutDirection;

/// Command to append a layer.
#[derive(Debug, Clone)]
pub struct AddLayer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Layer title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Command to append a node to a layer.
#[derive(Debug, Clone)]
pub struct AddNode {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Layer to append to.
    pub layer_id: Uuid,
    /// Node title.
    pub title: String,
    /// Node content.
    pub content: String,
    /// Duration in seconds.
    pub duration: Option<u32>,
}

/// Command to connect two nodes with a new branch.
#[derive(Debug, Clone)]
pub struct ConnectNodes {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Source node.
    pub from_node_id: Uuid,
    /// Target node.
    pub to_node_id: Uuid,
}

/// Command to delete a branch.
#[derive(Debug, Clone)]
pub struct DeleteBranch {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Branch to delete.
    pub branch_id: Uuid,
}

/// Command to delete a node and every branch that targets it.
#[derive(Debug, Clone)]
pub struct DeleteNode {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Node to delete.
    pub node_id: Uuid,
}

/// Command to replace a node's content and, optionally, its title.
#[derive(Debug, Clone)]
pub struct UpdateNodeContent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Node to update.
    pub node_id: Uuid,
    /// New content.
    pub content: String,
    /// New title, when renaming.
    pub title: Option<String>,
}

/// Command to record a dragged node position.
#[derive(Debug, Clone)]
pub struct MoveNode {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Node that moved.
    pub node_id: Uuid,
    /// New x coordinate.
    pub x: f64,
    /// New y coordinate.
    pub y: f64,
}

/// Command to recompute every position from topology.
#[derive(Debug, Clone)]
pub struct ArrangeLayout {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Direction to arrange in; keeps the current one when absent.
    pub direction: Option<LayoutDirection>,
}
