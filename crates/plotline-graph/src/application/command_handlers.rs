//! Command handlers for script editing.
//!
//! Each handler applies one command to an `EditorSession` through the
//! graph's mutation API. Only opening a script and updating content talk to
//! the backing store; everything else is local and reaches the store through
//! the persistence sync.

use plotline_core::clock::Clock;
use plotline_core::error::DomainError;
use plotline_core::model::{Branch, Layer, StoryNode};
use plotline_core::store::GraphStore;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::session::{EditorSession, SharedSession, lock_session};
use crate::domain::commands::{
    AddLayer, AddNode, ArrangeLayout, ConnectNodes, DeleteBranch, DeleteNode, MoveNode,
    UpdateNodeContent,
};
use crate::domain::events::{CanvasEvent, EventOutcome};
use crate::domain::graph::{NodeRemoval, ScriptGraph};
use crate::domain::seed::generate_seed_layers;
use crate::domain::view::CanvasView;

/// A graph read from the store, or a seed that has not been saved yet.
#[derive(Debug)]
pub struct OpenedScript {
    /// The opened session.
    pub session: EditorSession,
    /// `true` when nothing was stored and the demo pyramid was generated.
    pub seeded: bool,
}

/// Loads a script's graph, seeding the demo pyramid when nothing is stored.
///
/// A seed is not written here. The caller that ends up owning the session
/// persists it with `handle_persist_seed`, so racing opens cannot leave a
/// different seed in the store.
///
/// # Errors
///
/// Returns `DomainError::PersistenceFailure` if loading fails or the stored
/// graph has a branch pointing outside it.
pub async fn handle_open_script(
    script_id: Uuid,
    clock: &dyn Clock,
    store: &dyn GraphStore,
) -> Result<OpenedScript, DomainError> {
    let layers = store.load_graph(script_id).await?;
    if layers.is_empty() {
        debug!(%script_id, "seeded new graph");
        let seeded = generate_seed_layers(script_id, clock);
        return Ok(OpenedScript {
            session: EditorSession::new(ScriptGraph::from_layers(script_id, seeded)),
            seeded: true,
        });
    }

    let graph = ScriptGraph::from_layers(script_id, layers);
    graph.check_references().map_err(|err| {
        DomainError::PersistenceFailure(format!("stored graph for {script_id} is corrupt: {err}"))
    })?;
    debug!(%script_id, layers = graph.layers().len(), "loaded stored graph");
    Ok(OpenedScript {
        session: EditorSession::new(graph),
        seeded: false,
    })
}

/// Saves a freshly seeded graph so its ids survive a reload. A failure is
/// logged and the session stays usable.
pub async fn handle_persist_seed(session: &SharedSession, store: &dyn GraphStore) {
    let (script_id, layers) = {
        let guard = lock_session(session);
        (guard.script_id(), guard.graph().layers().to_vec())
    };
    if let Err(err) = store.save_graph(script_id, &layers).await {
        warn!(%script_id, error = %err, "failed to persist seeded graph");
    }
}

/// Handles `AddLayer`.
pub fn handle_add_layer(
    command: &AddLayer,
    session: &mut EditorSession,
    clock: &dyn Clock,
) -> Layer {
    let layer = session
        .graph_mut()
        .add_layer(&command.title, command.description.as_deref(), clock);
    debug!(correlation_id = %command.correlation_id, layer_id = %layer.id, "layer added");
    layer
}

/// Handles `AddNode`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the layer does not exist.
pub fn handle_add_node(
    command: &AddNode,
    session: &mut EditorSession,
    clock: &dyn Clock,
) -> Result<StoryNode, DomainError> {
    let node = session.graph_mut().add_node(
        command.layer_id,
        &command.title,
        &command.content,
        command.duration,
        clock,
    )?;
    debug!(correlation_id = %command.correlation_id, node_id = %node.id, "node added");
    Ok(node)
}

/// Handles `ConnectNodes`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if either node does not exist.
pub fn handle_connect_nodes(
    command: &ConnectNodes,
    session: &mut EditorSession,
    clock: &dyn Clock,
) -> Result<Branch, DomainError> {
    let branch = session
        .graph_mut()
        .connect(command.from_node_id, command.to_node_id, clock)?;
    debug!(correlation_id = %command.correlation_id, branch_id = %branch.id, "nodes connected");
    Ok(branch)
}

/// Handles `DeleteBranch`. Deleting an unknown branch is a no-op.
pub fn handle_delete_branch(command: &DeleteBranch, session: &mut EditorSession) -> Option<Branch> {
    let removed = session.graph_mut().delete_edge(command.branch_id);
    debug!(
        correlation_id = %command.correlation_id,
        branch_id = %command.branch_id,
        removed = removed.is_some(),
        "branch delete handled"
    );
    removed
}

/// Handles `DeleteNode`. Deleting an unknown node is a no-op.
pub fn handle_delete_node(
    command: &DeleteNode,
    session: &mut EditorSession,
) -> Option<NodeRemoval> {
    let removal = session.graph_mut().delete_node(command.node_id);
    if removal.is_some() {
        session.release_focus(command.node_id);
    }
    debug!(
        correlation_id = %command.correlation_id,
        node_id = %command.node_id,
        pruned = removal.as_ref().map_or(0, |r| r.pruned_branches.len()),
        "node delete handled"
    );
    removal
}

/// Handles `MoveNode`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the node does not exist and
/// `DomainError::Validation` for non-finite coordinates.
pub fn handle_move_node(
    command: &MoveNode,
    session: &mut EditorSession,
) -> Result<(), DomainError> {
    session
        .graph_mut()
        .move_node(command.node_id, command.x, command.y)
}

/// Handles `ArrangeLayout`: recomputes every position and stores it.
pub fn handle_arrange_layout(command: &ArrangeLayout, session: &mut EditorSession) -> CanvasView {
    let view = session.arrange(command.direction);
    debug!(
        correlation_id = %command.correlation_id,
        direction = ?view.direction,
        "layout arranged"
    );
    view
}

/// Handles `UpdateNodeContent`: applies the edit locally, then forwards it
/// to the store.
///
/// The local edit is kept even when the store call fails.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the node does not exist and
/// `DomainError::PersistenceFailure` if the store rejects the update.
pub async fn handle_update_node_content(
    command: &UpdateNodeContent,
    session: &SharedSession,
    clock: &dyn Clock,
    store: &dyn GraphStore,
) -> Result<StoryNode, DomainError> {
    let (script_id, updated, layers) = {
        let mut guard = lock_session(session);
        let updated = guard.graph_mut().update_content(
            command.node_id,
            &command.content,
            command.title.as_deref(),
            clock,
        )?;
        (guard.script_id(), updated, guard.graph().layers().to_vec())
    };

    let stored = store
        .update_node_content(
            script_id,
            command.node_id,
            &command.content,
            &layers,
            command.title.as_deref(),
        )
        .await?;

    if stored.is_none() {
        warn!(
            correlation_id = %command.correlation_id,
            node_id = %command.node_id,
            "store did not find the updated node"
        );
    }
    Ok(stored.unwrap_or(updated))
}

/// Dispatches a canvas event to the matching operation.
///
/// # Errors
///
/// Returns `DomainError::NotFound` when the event names a missing node and
/// `DomainError::Validation` for non-finite drag coordinates.
pub fn handle_canvas_event(
    event: &CanvasEvent,
    session: &mut EditorSession,
    clock: &dyn Clock,
) -> Result<EventOutcome, DomainError> {
    let correlation_id = Uuid::new_v4();
    match *event {
        CanvasEvent::Connect { source, target } => {
            let command = ConnectNodes {
                correlation_id,
                from_node_id: source,
                to_node_id: target,
            };
            let branch = handle_connect_nodes(&command, session, clock)?;
            Ok(EventOutcome::Connected { branch })
        }
        CanvasEvent::NodeMoved { id, x, y } => {
            let command = MoveNode {
                correlation_id,
                node_id: id,
                x,
                y,
            };
            handle_move_node(&command, session)?;
            Ok(EventOutcome::Moved { node_id: id })
        }
        CanvasEvent::NodeClicked { id } => {
            let highlight = session.focus_ancestors(id)?;
            debug!(node_id = %id, count = highlight.len(), "ancestors highlighted");
            Ok(EventOutcome::Highlighted {
                node_id: id,
                count: highlight.len(),
            })
        }
        CanvasEvent::NodeDoubleClicked { id } => {
            let node = session.graph().require_node(id)?.clone();
            Ok(EventOutcome::EditRequested { node })
        }
        CanvasEvent::EdgeDeleted { id } => {
            let command = DeleteBranch {
                correlation_id,
                branch_id: id,
            };
            let removed = handle_delete_branch(&command, session).is_some();
            Ok(EventOutcome::EdgeRemoved {
                branch_id: id,
                removed,
            })
        }
        CanvasEvent::PaneClicked => {
            session.clear_highlight();
            Ok(EventOutcome::HighlightCleared)
        }
    }
}
