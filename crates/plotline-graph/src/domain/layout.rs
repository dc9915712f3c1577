//! Position assignment for the canvas.
//!
//! Layers sit on the primary axis at `layer_order * layer_spacing`. Within a
//! layer, nodes are centered on the cross axis around a shared origin:
//! node `i` of `n` lands at `origin + (i - (n - 1) / 2) * node_spacing`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::graph::ScriptGraph;

/// Which way layers flow across the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    /// Layers run left to right; the primary axis is x.
    #[default]
    Horizontal,
    /// Layers run top to bottom; the primary axis is y.
    Vertical,
}

impl LayoutDirection {
    /// The other direction.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Spacing constants for this direction.
    #[must_use]
    pub fn spacing(self) -> LayoutSpacing {
        match self {
            Self::Horizontal => LayoutSpacing {
                layer_spacing: 400.0,
                cross_origin: 100.0,
                node_spacing: 120.0,
            },
            Self::Vertical => LayoutSpacing {
                layer_spacing: 200.0,
                cross_origin: 100.0,
                node_spacing: 200.0,
            },
        }
    }

    fn sides(self) -> (ConnectorSide, ConnectorSide) {
        match self {
            Self::Horizontal => (ConnectorSide::Left, ConnectorSide::Right),
            Self::Vertical => (ConnectorSide::Top, ConnectorSide::Bottom),
        }
    }
}

/// Whether stored node positions win over computed ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    /// Use a node's stored position when it has one.
    #[default]
    RespectStored,
    /// Ignore stored positions.
    ForceRecompute,
}

/// Per-direction layout constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpacing {
    /// Distance between consecutive layer orders on the primary axis.
    pub layer_spacing: f64,
    /// Cross-axis coordinate each layer is centered on.
    pub cross_origin: f64,
    /// Distance between neighbouring nodes on the cross axis.
    pub node_spacing: f64,
}

/// A canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Side of a node where an edge attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorSide {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
}

/// Connector sides a node exposes. The first layer has no incoming side and
/// the last layer no outgoing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorSides {
    /// Where incoming edges attach.
    pub incoming: Option<ConnectorSide>,
    /// Where outgoing edges attach.
    pub outgoing: Option<ConnectorSide>,
}

/// A node's place on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    /// The node being placed.
    pub node_id: Uuid,
    /// The layer it belongs to.
    pub layer_id: Uuid,
    /// Resolved canvas position.
    pub position: Position,
    /// Connector sides for its edges.
    pub sides: ConnectorSides,
}

/// Formula position of node `index` among `count` nodes in a layer.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn computed_position(
    direction: LayoutDirection,
    layer_order: u32,
    index: usize,
    count: usize,
) -> Position {
    let spacing = direction.spacing();
    let primary = f64::from(layer_order) * spacing.layer_spacing;
    let offset = index as f64 - (count.saturating_sub(1) as f64) / 2.0;
    let cross = spacing.cross_origin + offset * spacing.node_spacing;
    match direction {
        LayoutDirection::Horizontal => Position { x: primary, y: cross },
        LayoutDirection::Vertical => Position { x: cross, y: primary },
    }
}

/// Places every node of `graph`, layer by layer in display order.
#[must_use]
pub fn assign_positions(
    graph: &ScriptGraph,
    direction: LayoutDirection,
    mode: PositionMode,
) -> Vec<PlacedNode> {
    let layers = graph.layers();
    let last = layers.len().saturating_sub(1);
    let (incoming_side, outgoing_side) = direction.sides();

    let mut placed = Vec::with_capacity(graph.all_nodes().count());
    for (rank, layer) in layers.iter().enumerate() {
        let sides = ConnectorSides {
            incoming: (rank > 0).then_some(incoming_side),
            outgoing: (rank < last).then_some(outgoing_side),
        };
        let count = layer.nodes.len();
        for (index, node) in layer.nodes.iter().enumerate() {
            let stored = match mode {
                PositionMode::RespectStored => node.stored_position(),
                PositionMode::ForceRecompute => None,
            };
            let position = stored.map_or_else(
                || computed_position(direction, layer.layer_order, index, count),
                |(x, y)| Position { x, y },
            );
            placed.push(PlacedNode {
                node_id: node.id,
                layer_id: layer.id,
                position,
                sides,
            });
        }
    }
    placed
}

/// Recomputes every position from topology and writes the result into the
/// node records, so later renders keep it until a node is moved again.
pub fn auto_arrange(graph: &mut ScriptGraph, direction: LayoutDirection) -> Vec<PlacedNode> {
    let placed = assign_positions(graph, direction, PositionMode::ForceRecompute);
    graph.store_positions(
        placed
            .iter()
            .map(|p| (p.node_id, p.position.x, p.position.y)),
    );
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use plotline_test_support::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    /// Layers of 1, 2, and 4 nodes.
    fn pyramid() -> ScriptGraph {
        let clock = clock();
        let mut graph = ScriptGraph::new(Uuid::new_v4());
        for (order, size) in [(1, 1), (2, 2), (3, 4)] {
            let layer_id = graph.add_layer(&format!("Act {order}"), None, &clock).id;
            for n in 0..size {
                graph
                    .add_node(layer_id, &format!("{order}.{n}"), "", None, &clock)
                    .unwrap();
            }
        }
        graph
    }

    fn positions(placed: &[PlacedNode]) -> Vec<(f64, f64)> {
        placed.iter().map(|p| (p.position.x, p.position.y)).collect()
    }

    #[test]
    fn test_vertical_auto_arrange_centers_each_layer() {
        // Arrange
        let mut graph = pyramid();

        // Act
        let placed = auto_arrange(&mut graph, LayoutDirection::Vertical);

        // Assert
        assert_eq!(
            positions(&placed),
            vec![
                (100.0, 200.0),
                (0.0, 400.0),
                (200.0, 400.0),
                (-200.0, 600.0),
                (0.0, 600.0),
                (200.0, 600.0),
                (400.0, 600.0),
            ]
        );
    }

    #[test]
    fn test_horizontal_layout_uses_wider_layer_spacing() {
        let graph = pyramid();

        let placed =
            assign_positions(&graph, LayoutDirection::Horizontal, PositionMode::RespectStored);

        assert_eq!(placed[0].position, Position { x: 400.0, y: 100.0 });
        assert_eq!(placed[1].position, Position { x: 800.0, y: 40.0 });
        assert_eq!(placed[2].position, Position { x: 800.0, y: 160.0 });
        assert_eq!(placed[3].position, Position { x: 1200.0, y: -80.0 });
    }

    #[test]
    fn test_auto_arrange_persists_positions_into_nodes() {
        let mut graph = pyramid();

        let placed = auto_arrange(&mut graph, LayoutDirection::Vertical);

        for p in &placed {
            let node = graph.find_node(p.node_id).unwrap();
            assert_eq!(node.stored_position(), Some((p.position.x, p.position.y)));
        }
    }

    #[test]
    fn test_respect_stored_prefers_dragged_position() {
        // Arrange
        let mut graph = pyramid();
        let dragged = graph.layers()[1].nodes[0].id;
        graph.move_node(dragged, 999.0, -3.0).unwrap();

        // Act
        let respected =
            assign_positions(&graph, LayoutDirection::Vertical, PositionMode::RespectStored);
        let forced =
            assign_positions(&graph, LayoutDirection::Vertical, PositionMode::ForceRecompute);

        // Assert
        assert_eq!(respected[1].position, Position { x: 999.0, y: -3.0 });
        assert_eq!(forced[1].position, Position { x: 0.0, y: 400.0 });
    }

    #[test]
    fn test_toggle_and_back_with_force_recompute_ignores_stale_positions() {
        // Arrange
        let mut graph = pyramid();
        let original =
            assign_positions(&graph, LayoutDirection::Horizontal, PositionMode::ForceRecompute);
        let dragged = graph.layers()[2].nodes[3].id;
        graph.move_node(dragged, 5.0, 5.0).unwrap();

        // Act
        auto_arrange(&mut graph, LayoutDirection::Horizontal.toggled());
        let back = auto_arrange(&mut graph, LayoutDirection::Horizontal);

        // Assert
        assert_eq!(positions(&back), positions(&original));
        let node = graph.find_node(dragged).unwrap();
        assert_eq!(node.stored_position(), Some((1200.0, 280.0)));
    }

    #[test]
    fn test_connector_sides_drop_at_first_and_last_layer() {
        let graph = pyramid();

        let placed =
            assign_positions(&graph, LayoutDirection::Horizontal, PositionMode::RespectStored);

        assert_eq!(
            placed[0].sides,
            ConnectorSides {
                incoming: None,
                outgoing: Some(ConnectorSide::Right),
            }
        );
        assert_eq!(
            placed[1].sides,
            ConnectorSides {
                incoming: Some(ConnectorSide::Left),
                outgoing: Some(ConnectorSide::Right),
            }
        );
        assert_eq!(placed[6].sides.outgoing, None);

        let vertical =
            assign_positions(&graph, LayoutDirection::Vertical, PositionMode::RespectStored);
        assert_eq!(vertical[1].sides.incoming, Some(ConnectorSide::Top));
        assert_eq!(vertical[1].sides.outgoing, Some(ConnectorSide::Bottom));
    }

    #[test]
    fn test_single_layer_exposes_no_connector_sides() {
        let clock = clock();
        let mut graph = ScriptGraph::new(Uuid::new_v4());
        let layer_id = graph.add_layer("Only", None, &clock).id;
        graph.add_node(layer_id, "solo", "", None, &clock).unwrap();

        let placed =
            assign_positions(&graph, LayoutDirection::Vertical, PositionMode::RespectStored);

        assert_eq!(
            placed[0].sides,
            ConnectorSides {
                incoming: None,
                outgoing: None,
            }
        );
    }
}
