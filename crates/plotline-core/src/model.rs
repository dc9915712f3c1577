//! Script graph records: layers own nodes, nodes own their outgoing branches.
//!
//! These are the shapes exchanged with the backing store. Structural
//! invariants are enforced by `plotline_graph::ScriptGraph`, not here.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered act grouping story beats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer identifier.
    pub id: Uuid,
    /// The script this layer belongs to.
    pub script_id: Uuid,
    /// Rank of the layer; unique within a script, not necessarily contiguous.
    pub layer_order: u32,
    /// Display title.
    pub title: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Nodes in display order.
    #[serde(default)]
    pub nodes: Vec<StoryNode>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// How a beat is framed on camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraType {
    /// Wide establishing shot.
    #[default]
    Wide,
    /// Close-up shot.
    CloseUp,
}

/// Production metadata attached to a beat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Camera framing.
    #[serde(default)]
    pub camera_type: CameraType,
    /// Characters appearing in the beat.
    #[serde(default)]
    pub characters: BTreeSet<String>,
    /// Scene name.
    #[serde(default)]
    pub scene: String,
}

/// A single story beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryNode {
    /// Node identifier.
    pub id: Uuid,
    /// Back-reference to the owning layer.
    pub layer_id: Uuid,
    /// Rank within the layer (informational).
    pub node_order: u32,
    /// Display title.
    pub title: String,
    /// Free-text beat content.
    pub content: String,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Persisted canvas x coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    /// Persisted canvas y coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
    /// Production metadata.
    #[serde(default)]
    pub metadata: NodeMetadata,
    /// Outgoing branches; this node is the source of each.
    #[serde(default)]
    pub branches: Vec<Branch>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl StoryNode {
    /// Returns the stored canvas position when both coordinates are present.
    #[must_use]
    pub fn stored_position(&self) -> Option<(f64, f64)> {
        match (self.position_x, self.position_y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }

    /// Highest `branch_order` among outgoing branches, or 0 with none.
    #[must_use]
    pub fn max_branch_order(&self) -> u32 {
        self.branches
            .iter()
            .map(|b| b.branch_order)
            .max()
            .unwrap_or(0)
    }
}

/// Kind of narrative transition a branch represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchType {
    /// A reader-facing choice.
    Choice,
    /// An unconditional continuation.
    #[default]
    Default,
}

/// A labeled directed edge between two beats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch identifier.
    pub id: Uuid,
    /// Source node; always the node that stores this branch.
    pub from_node_id: Uuid,
    /// Target node.
    pub to_node_id: Uuid,
    /// Label shown on the edge.
    #[serde(default)]
    pub branch_label: String,
    /// Transition kind.
    #[serde(default)]
    pub branch_type: BranchType,
    /// Rank among the source node's outgoing branches.
    pub branch_order: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Applies a content (and optional title) replacement to the node with
/// `node_id` inside `layers`, returning the updated node.
///
/// Timestamps are left as they are; callers stamp `updated_at` themselves.
pub fn apply_content_update(
    layers: &mut [Layer],
    node_id: Uuid,
    content: &str,
    title: Option<&str>,
) -> Option<StoryNode> {
    let node = layers
        .iter_mut()
        .flat_map(|layer| layer.nodes.iter_mut())
        .find(|node| node.id == node_id)?;
    content.clone_into(&mut node.content);
    if let Some(title) = title {
        title.clone_into(&mut node.title);
    }
    Some(node.clone())
}
