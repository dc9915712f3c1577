//! Ancestor tracing: every node with a path to a chosen node.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

/// Returns `target` plus every node that reaches it, following
/// `(source, target)` edges backward breadth-first.
///
/// Each node is enqueued at most once, so malformed (cyclic) input still
/// terminates. Runs in O(V + E).
#[must_use]
pub fn trace_ancestors(target: Uuid, edges: &[(Uuid, Uuid)]) -> HashSet<Uuid> {
    let mut parents: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for &(source, to) in edges {
        parents.entry(to).or_default().push(source);
    }

    let mut visited = HashSet::from([target]);
    let mut queue = VecDeque::from([target]);
    while let Some(current) = queue.pop_front() {
        let Some(sources) = parents.get(&current) else {
            continue;
        };
        for &source in sources {
            if visited.insert(source) {
                queue.push_back(source);
            }
        }
    }
    visited
}

/// The node set the canvas currently emphasizes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    nodes: HashSet<Uuid>,
}

impl Highlight {
    /// No highlight: everything renders at full strength.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Highlight the ancestors of `target`.
    #[must_use]
    pub fn ancestors_of(target: Uuid, edges: &[(Uuid, Uuid)]) -> Self {
        Self {
            nodes: trace_ancestors(target, edges),
        }
    }

    /// Returns `true` when nothing is highlighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of highlighted nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `node_id` should be dimmed.
    #[must_use]
    pub fn dims_node(&self, node_id: Uuid) -> bool {
        !self.is_empty() && !self.nodes.contains(&node_id)
    }

    /// Whether the edge `source -> target` lies on a highlighted path.
    #[must_use]
    pub fn lights_edge(&self, source: Uuid, target: Uuid) -> bool {
        self.nodes.contains(&source) && self.nodes.contains(&target)
    }
}
