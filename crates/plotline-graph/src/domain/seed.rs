//! Demo graph for scripts opened with nothing stored.
//!
//! Six layers in a binary pyramid: layer `k` holds `2^(k-1)` beats and beat
//! `i` of layer `k` branches to beats `2i` and `2i + 1` of layer `k + 1`,
//! clamped to the next layer's size.

use std::collections::BTreeSet;

use plotline_core::clock::Clock;
use plotline_core::model::{Branch, BranchType, CameraType, Layer, NodeMetadata, StoryNode};
use uuid::Uuid;

/// Number of layers in the seed pyramid.
pub const SEED_LAYER_COUNT: u32 = 6;

/// Branch labels, indexed by fan-out slot.
const CHOICE_LABELS: [&str; 2] = ["Choice A", "Choice B"];

/// Node count of seed layer `layer_order` (1-based).
#[must_use]
pub fn seed_layer_size(layer_order: u32) -> usize {
    1 << (layer_order - 1)
}

/// Indices in the next layer that node `index` fans out to.
#[must_use]
pub fn fan_out_targets(index: usize, next_layer_size: usize) -> Vec<usize> {
    (0..CHOICE_LABELS.len())
        .map(|slot| 2 * index + slot)
        .filter(|&target| target < next_layer_size)
        .collect()
}

/// Builds the seed pyramid for `script_id`.
#[must_use]
pub fn generate_seed_layers(script_id: Uuid, clock: &dyn Clock) -> Vec<Layer> {
    let now = clock.now();

    let mut layers: Vec<Layer> = (1..=SEED_LAYER_COUNT)
        .map(|layer_order| {
            let layer_id = Uuid::new_v4();
            let size = seed_layer_size(layer_order);
            let nodes = (1..=size)
                .map(|position| {
                    #[allow(clippy::cast_possible_truncation)]
                    let node_order = position as u32;
                    seed_node(layer_id, layer_order, node_order, now)
                })
                .collect();
            Layer {
                id: layer_id,
                script_id,
                layer_order,
                title: format!("Act {layer_order}"),
                description: Some(format!("Act {layer_order} ({size} nodes)")),
                nodes,
                created_at: now,
                updated_at: now,
            }
        })
        .collect();

    for k in 0..layers.len().saturating_sub(1) {
        let next_ids: Vec<Uuid> = layers[k + 1].nodes.iter().map(|n| n.id).collect();
        for (index, node) in layers[k].nodes.iter_mut().enumerate() {
            node.branches = fan_out_targets(index, next_ids.len())
                .into_iter()
                .zip(CHOICE_LABELS)
                .zip(1..)
                .map(|((target, label), branch_order)| Branch {
                    id: Uuid::new_v4(),
                    from_node_id: node.id,
                    to_node_id: next_ids[target],
                    branch_label: label.to_owned(),
                    branch_type: BranchType::Choice,
                    branch_order,
                    created_at: now,
                })
                .collect();
        }
    }

    layers
}

fn seed_node(
    layer_id: Uuid,
    layer_order: u32,
    node_order: u32,
    now: chrono::DateTime<chrono::Utc>,
) -> StoryNode {
    let camera_type = if layer_order % 2 == 0 {
        CameraType::CloseUp
    } else {
        CameraType::Wide
    };
    StoryNode {
        id: Uuid::new_v4(),
        layer_id,
        node_order,
        title: format!("Act {layer_order} - Beat {node_order}"),
        content: format!(
            "Beat {node_order} of act {layer_order}.\n\n\
             Describe the scene, dialogue, and action here.\n\n\
             Open the beat to edit this text."
        ),
        duration: Some(30 + (layer_order - 1) * 10 + node_order * 5),
        position_x: None,
        position_y: None,
        metadata: NodeMetadata {
            camera_type,
            characters: BTreeSet::from([format!("Character {node_order}")]),
            scene: format!("Scene {layer_order}"),
        },
        branches: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}
