//! The in-memory script graph and its structural mutations.
//!
//! `ScriptGraph` is the single source of truth for an edit session. Every
//! mutation either succeeds with the invariants intact or fails with
//! `DomainError::NotFound` naming the missing id. Deletes are idempotent.

use plotline_core::clock::Clock;
use plotline_core::error::DomainError;
use plotline_core::model::{Branch, BranchType, Layer, NodeMetadata, StoryNode};
use uuid::Uuid;

/// What a node deletion removed.
#[derive(Debug, Clone)]
pub struct NodeRemoval {
    /// The deleted node, including its own outgoing branches.
    pub node: StoryNode,
    /// Branches stored on other nodes that targeted the deleted node.
    pub pruned_branches: Vec<Branch>,
}

/// Layers, nodes, and branches for one script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptGraph {
    script_id: Uuid,
    layers: Vec<Layer>,
}

impl ScriptGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new(script_id: Uuid) -> Self {
        Self {
            script_id,
            layers: Vec::new(),
        }
    }

    /// Builds a graph from stored layers, ordering them by `layer_order`.
    #[must_use]
    pub fn from_layers(script_id: Uuid, mut layers: Vec<Layer>) -> Self {
        layers.sort_by_key(|layer| layer.layer_order);
        Self { script_id, layers }
    }

    /// The script this graph belongs to.
    #[must_use]
    pub fn script_id(&self) -> Uuid {
        self.script_id
    }

    /// Layers in `layer_order`.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Consumes the graph, returning its layers.
    #[must_use]
    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }

    /// Returns `true` when the graph has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Looks up a layer by id.
    #[must_use]
    pub fn find_layer(&self, layer_id: Uuid) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == layer_id)
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn find_node(&self, node_id: Uuid) -> Option<&StoryNode> {
        self.all_nodes().find(|node| node.id == node_id)
    }

    /// Looks up a node by id, failing with `NotFound` when absent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no node has `node_id`.
    pub fn require_node(&self, node_id: Uuid) -> Result<&StoryNode, DomainError> {
        self.find_node(node_id)
            .ok_or_else(|| DomainError::node_not_found(node_id))
    }

    fn find_node_mut(&mut self, node_id: Uuid) -> Option<&mut StoryNode> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.nodes.iter_mut())
            .find(|node| node.id == node_id)
    }

    /// Every node, layer by layer in display order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &StoryNode> {
        self.layers.iter().flat_map(|layer| layer.nodes.iter())
    }

    /// Every branch, grouped by source node.
    pub fn all_branches(&self) -> impl Iterator<Item = &Branch> {
        self.all_nodes().flat_map(|node| node.branches.iter())
    }

    /// The current edge set as `(source, target)` pairs.
    #[must_use]
    pub fn edges(&self) -> Vec<(Uuid, Uuid)> {
        self.all_branches()
            .map(|branch| (branch.from_node_id, branch.to_node_id))
            .collect()
    }

    /// The `layer_order` a newly appended layer receives.
    #[must_use]
    pub fn next_layer_order(&self) -> u32 {
        self.layers
            .iter()
            .map(|layer| layer.layer_order)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Appends an empty layer after every existing one.
    pub fn add_layer(
        &mut self,
        title: &str,
        description: Option<&str>,
        clock: &dyn Clock,
    ) -> Layer {
        let now = clock.now();
        let layer = Layer {
            id: Uuid::new_v4(),
            script_id: self.script_id,
            layer_order: self.next_layer_order(),
            title: title.to_owned(),
            description: description.map(str::to_owned),
            nodes: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.layers.push(layer.clone());
        layer
    }

    /// Appends a node to a layer. The node has no position until the next
    /// layout pass and takes the layer title as its scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if `layer_id` does not exist.
    pub fn add_node(
        &mut self,
        layer_id: Uuid,
        title: &str,
        content: &str,
        duration: Option<u32>,
        clock: &dyn Clock,
    ) -> Result<StoryNode, DomainError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|layer| layer.id == layer_id)
            .ok_or_else(|| DomainError::layer_not_found(layer_id))?;

        let now = clock.now();
        #[allow(clippy::cast_possible_truncation)]
        let node_order = layer.nodes.len() as u32 + 1;
        let node = StoryNode {
            id: Uuid::new_v4(),
            layer_id,
            node_order,
            title: title.to_owned(),
            content: content.to_owned(),
            duration,
            position_x: None,
            position_y: None,
            metadata: NodeMetadata {
                scene: layer.title.clone(),
                ..NodeMetadata::default()
            },
            branches: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        layer.nodes.push(node.clone());
        layer.updated_at = now;
        Ok(node)
    }

    /// Adds a branch from `from_node_id` to `to_node_id`.
    ///
    /// Duplicate edges between the same pair are allowed, and no cycle check
    /// is made.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if either node does not exist.
    pub fn connect(
        &mut self,
        from_node_id: Uuid,
        to_node_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Branch, DomainError> {
        self.require_node(to_node_id)?;
        let source = self
            .find_node_mut(from_node_id)
            .ok_or_else(|| DomainError::node_not_found(from_node_id))?;

        let now = clock.now();
        let branch = Branch {
            id: Uuid::new_v4(),
            from_node_id,
            to_node_id,
            branch_label: String::new(),
            branch_type: BranchType::Default,
            branch_order: source.max_branch_order() + 1,
            created_at: now,
        };
        source.branches.push(branch.clone());
        source.updated_at = now;
        Ok(branch)
    }

    /// Removes a branch from its owning node. Returns `None` when no branch
    /// has `branch_id`, leaving the graph untouched.
    pub fn delete_edge(&mut self, branch_id: Uuid) -> Option<Branch> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.nodes.iter_mut())
            .find_map(|node| {
                let index = node.branches.iter().position(|b| b.id == branch_id)?;
                Some(node.branches.remove(index))
            })
    }

    /// Deletes a node and sweeps every branch that targeted it.
    ///
    /// Returns `None` when the node does not exist; the graph is unchanged.
    pub fn delete_node(&mut self, node_id: Uuid) -> Option<NodeRemoval> {
        let node = self.remove_node_record(node_id)?;
        let pruned_branches = self.prune_branches_to(node_id);
        Some(NodeRemoval {
            node,
            pruned_branches,
        })
    }

    /// First phase of a node deletion: detach the node from its layer.
    fn remove_node_record(&mut self, node_id: Uuid) -> Option<StoryNode> {
        self.layers.iter_mut().find_map(|layer| {
            let index = layer.nodes.iter().position(|n| n.id == node_id)?;
            Some(layer.nodes.remove(index))
        })
    }

    /// Second phase of a node deletion: remove every branch targeting
    /// `node_id`, wherever it is stored.
    fn prune_branches_to(&mut self, node_id: Uuid) -> Vec<Branch> {
        let mut pruned = Vec::new();
        for node in self.layers.iter_mut().flat_map(|l| l.nodes.iter_mut()) {
            let (dangling, kept): (Vec<Branch>, Vec<Branch>) = node
                .branches
                .drain(..)
                .partition(|b| b.to_node_id == node_id);
            node.branches = kept;
            pruned.extend(dangling);
        }
        pruned
    }

    /// Replaces a node's content (and title, when given) and refreshes its
    /// modification timestamp.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the node does not exist.
    pub fn update_content(
        &mut self,
        node_id: Uuid,
        content: &str,
        title: Option<&str>,
        clock: &dyn Clock,
    ) -> Result<StoryNode, DomainError> {
        let node = self
            .find_node_mut(node_id)
            .ok_or_else(|| DomainError::node_not_found(node_id))?;
        content.clone_into(&mut node.content);
        if let Some(title) = title {
            title.clone_into(&mut node.title);
        }
        node.updated_at = clock.now();
        Ok(node.clone())
    }

    /// Records a dragged canvas position on a node.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for non-finite coordinates and
    /// `DomainError::NotFound` if the node does not exist.
    pub fn move_node(&mut self, node_id: Uuid, x: f64, y: f64) -> Result<(), DomainError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(DomainError::Validation(format!(
                "position ({x}, {y}) for node {node_id} is not finite"
            )));
        }
        let node = self
            .find_node_mut(node_id)
            .ok_or_else(|| DomainError::node_not_found(node_id))?;
        node.position_x = Some(x);
        node.position_y = Some(y);
        Ok(())
    }

    /// Overwrites stored positions for every listed node. Ids that no longer
    /// exist are skipped.
    pub(crate) fn store_positions(
        &mut self,
        positions: impl IntoIterator<Item = (Uuid, f64, f64)>,
    ) {
        for (node_id, x, y) in positions {
            if let Some(node) = self.find_node_mut(node_id) {
                node.position_x = Some(x);
                node.position_y = Some(y);
            }
        }
    }

    /// Checks every branch for a missing source or target.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a branch stored on the wrong
    /// node and `DomainError::NotFound` for a dangling target.
    pub fn check_references(&self) -> Result<(), DomainError> {
        for node in self.all_nodes() {
            for branch in &node.branches {
                if branch.from_node_id != node.id {
                    return Err(DomainError::Validation(format!(
                        "branch {} is stored on node {} but claims source {}",
                        branch.id, node.id, branch.from_node_id
                    )));
                }
                self.require_node(branch.to_node_id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use plotline_core::error::EntityKind;
    use plotline_test_support::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    /// Two layers: `a` in the first, `b` and `c` in the second, `a -> b`.
    fn small_graph() -> (ScriptGraph, Uuid, Uuid, Uuid) {
        let clock = clock();
        let mut graph = ScriptGraph::new(Uuid::new_v4());
        let first = graph.add_layer("Act 1", None, &clock).id;
        let second = graph.add_layer("Act 2", Some("rising action"), &clock).id;
        let a = graph.add_node(first, "a", "", None, &clock).unwrap().id;
        let b = graph.add_node(second, "b", "", None, &clock).unwrap().id;
        let c = graph.add_node(second, "c", "", Some(45), &clock).unwrap().id;
        graph.connect(a, b, &clock).unwrap();
        (graph, a, b, c)
    }

    #[test]
    fn test_add_layer_appends_with_next_order() {
        // Arrange
        let clock = clock();
        let mut graph = ScriptGraph::new(Uuid::new_v4());

        // Act
        let first = graph.add_layer("Act 1", None, &clock);
        let second = graph.add_layer("Act 2", None, &clock);

        // Assert
        assert_eq!(first.layer_order, 1);
        assert_eq!(second.layer_order, 2);
        assert!(second.nodes.is_empty());
        assert_eq!(second.script_id, graph.script_id());
    }

    #[test]
    fn test_add_layer_follows_max_order_after_gaps() {
        // Arrange
        let clock = clock();
        let mut graph = ScriptGraph::new(Uuid::new_v4());
        graph.add_layer("Act 1", None, &clock);
        let mut layers = graph.into_layers();
        layers[0].layer_order = 7;
        let mut graph = ScriptGraph::from_layers(Uuid::new_v4(), layers);

        // Act
        let layer = graph.add_layer("Epilogue", None, &clock);

        // Assert
        assert_eq!(layer.layer_order, 8);
    }

    #[test]
    fn test_from_layers_sorts_by_layer_order() {
        let clock = clock();
        let mut graph = ScriptGraph::new(Uuid::new_v4());
        graph.add_layer("one", None, &clock);
        graph.add_layer("two", None, &clock);
        let mut layers = graph.into_layers();
        layers.reverse();

        let graph = ScriptGraph::from_layers(Uuid::new_v4(), layers);

        let orders: Vec<u32> = graph.layers().iter().map(|l| l.layer_order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn test_add_node_sets_order_scene_and_no_position() {
        // Arrange
        let clock = clock();
        let mut graph = ScriptGraph::new(Uuid::new_v4());
        let layer_id = graph.add_layer("The Heist", None, &clock).id;
        graph.add_node(layer_id, "first", "", None, &clock).unwrap();

        // Act
        let node = graph
            .add_node(layer_id, "second", "vault door", Some(30), &clock)
            .unwrap();

        // Assert
        assert_eq!(node.node_order, 2);
        assert_eq!(node.metadata.scene, "The Heist");
        assert_eq!(node.duration, Some(30));
        assert!(node.branches.is_empty());
        assert_eq!(node.stored_position(), None);
        assert_eq!(graph.find_layer(layer_id).unwrap().nodes.len(), 2);
    }

    #[test]
    fn test_add_node_to_missing_layer_returns_not_found() {
        let clock = clock();
        let mut graph = ScriptGraph::new(Uuid::new_v4());
        let missing = Uuid::new_v4();

        let result = graph.add_node(missing, "x", "", None, &clock);

        match result.unwrap_err() {
            DomainError::NotFound { entity, id } => {
                assert_eq!(entity, EntityKind::Layer);
                assert_eq!(id, missing);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_connect_increments_outgoing_count_and_order() {
        // Arrange
        let clock = clock();
        let (mut graph, a, _, c) = small_graph();
        let before = graph.find_node(a).unwrap().branches.len();
        let previous_max = graph.find_node(a).unwrap().max_branch_order();

        // Act
        let branch = graph.connect(a, c, &clock).unwrap();

        // Assert
        let source = graph.find_node(a).unwrap();
        assert_eq!(source.branches.len(), before + 1);
        assert_eq!(branch.branch_order, previous_max + 1);
        assert_eq!(branch.from_node_id, a);
        assert_eq!(branch.to_node_id, c);
        assert_eq!(branch.branch_type, BranchType::Default);
    }

    #[test]
    fn test_connect_allows_duplicate_edges() {
        let clock = clock();
        let (mut graph, a, b, _) = small_graph();

        graph.connect(a, b, &clock).unwrap();

        let to_b = graph
            .all_branches()
            .filter(|br| br.from_node_id == a && br.to_node_id == b)
            .count();
        assert_eq!(to_b, 2);
    }

    #[test]
    fn test_connect_order_follows_max_after_edge_delete() {
        // Arrange
        let clock = clock();
        let (mut graph, a, b, c) = small_graph();
        let second = graph.connect(a, c, &clock).unwrap();
        let first_id = graph.find_node(a).unwrap().branches[0].id;
        graph.delete_edge(first_id);

        // Act
        let third = graph.connect(a, b, &clock).unwrap();

        // Assert
        assert_eq!(second.branch_order, 2);
        assert_eq!(third.branch_order, 3);
    }

    #[test]
    fn test_connect_with_missing_endpoint_returns_not_found() {
        let clock = clock();
        let (mut graph, a, _, _) = small_graph();
        let missing = Uuid::new_v4();

        assert!(matches!(
            graph.connect(a, missing, &clock),
            Err(DomainError::NotFound { id, .. }) if id == missing
        ));
        assert!(matches!(
            graph.connect(missing, a, &clock),
            Err(DomainError::NotFound { id, .. }) if id == missing
        ));
        assert_eq!(graph.find_node(a).unwrap().branches.len(), 1);
    }

    #[test]
    fn test_delete_edge_unknown_id_leaves_branches_untouched() {
        // Arrange
        let (mut graph, _, _, _) = small_graph();
        let before: Vec<Branch> = graph.all_branches().cloned().collect();

        // Act
        let removed = graph.delete_edge(Uuid::new_v4());

        // Assert
        assert!(removed.is_none());
        let after: Vec<Branch> = graph.all_branches().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_delete_edge_twice_is_a_noop() {
        let (mut graph, a, _, _) = small_graph();
        let branch_id = graph.find_node(a).unwrap().branches[0].id;

        assert!(graph.delete_edge(branch_id).is_some());
        assert!(graph.delete_edge(branch_id).is_none());
        assert_eq!(graph.all_branches().count(), 0);
    }

    #[test]
    fn test_delete_node_prunes_incoming_branches() {
        // Arrange
        let clock = clock();
        let (mut graph, a, b, c) = small_graph();
        graph.connect(c, b, &clock).unwrap();
        graph.connect(b, c, &clock).unwrap();

        // Act
        let removal = graph.delete_node(b).unwrap();

        // Assert
        assert_eq!(removal.node.id, b);
        assert_eq!(removal.pruned_branches.len(), 2);
        assert!(graph.find_node(b).is_none());
        assert!(graph.all_branches().all(|br| br.to_node_id != b));
        assert!(graph.find_node(a).unwrap().branches.is_empty());
        graph.check_references().unwrap();
    }

    #[test]
    fn test_delete_node_twice_matches_single_delete() {
        let (mut graph, _, b, _) = small_graph();
        graph.delete_node(b);
        let once = graph.clone();

        let second = graph.delete_node(b);

        assert!(second.is_none());
        assert_eq!(graph, once);
    }

    #[test]
    fn test_update_content_replaces_fields_and_stamps_time() {
        // Arrange
        let (mut graph, a, _, _) = small_graph();
        let later = FixedClock(Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap());

        // Act
        let updated = graph
            .update_content(a, "new content", Some("renamed"), &later)
            .unwrap();

        // Assert
        assert_eq!(updated.content, "new content");
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.updated_at, later.0);
        assert_eq!(graph.find_node(a).unwrap(), &updated);
    }

    #[test]
    fn test_update_content_keeps_title_when_absent() {
        let clock = clock();
        let (mut graph, a, _, _) = small_graph();

        let updated = graph.update_content(a, "text", None, &clock).unwrap();

        assert_eq!(updated.title, "a");
    }

    #[test]
    fn test_update_content_missing_node_returns_not_found() {
        let clock = clock();
        let (mut graph, _, _, _) = small_graph();

        let result = graph.update_content(Uuid::new_v4(), "x", None, &clock);

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn test_move_node_rejects_non_finite_coordinates() {
        let (mut graph, a, _, _) = small_graph();

        let result = graph.move_node(a, f64::NAN, 10.0);

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(graph.find_node(a).unwrap().stored_position(), None);
    }

    #[test]
    fn test_move_node_stores_position() {
        let (mut graph, a, _, _) = small_graph();

        graph.move_node(a, 12.5, -40.0).unwrap();

        assert_eq!(
            graph.find_node(a).unwrap().stored_position(),
            Some((12.5, -40.0))
        );
    }
}
