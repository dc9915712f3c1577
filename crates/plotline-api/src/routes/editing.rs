//! Structural and content edits: layers and nodes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use plotline_core::model::{Layer, StoryNode};
use plotline_graph::application::{command_handlers, query_handlers};
use plotline_graph::domain::commands;
use plotline_graph::lock_session;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /layers.
#[derive(Debug, Deserialize)]
pub struct AddLayerRequest {
    /// Layer title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for POST /nodes.
#[derive(Debug, Deserialize)]
pub struct AddNodeRequest {
    /// Layer that receives the node.
    pub layer_id: Uuid,
    /// Node title.
    pub title: String,
    /// Beat content.
    #[serde(default)]
    pub content: String,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: Option<u32>,
}

/// Request body for PUT /nodes/{node_id}/content.
#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    /// New content.
    pub content: String,
    /// New title; the title is kept when absent.
    #[serde(default)]
    pub title: Option<String>,
}

/// POST /{script_id}/layers
#[instrument(skip_all, fields(%script_id))]
async fn add_layer(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
    Json(request): Json<AddLayerRequest>,
) -> Result<(StatusCode, Json<Layer>), ApiError> {
    let command = commands::AddLayer {
        correlation_id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
    };

    info!(correlation_id = %command.correlation_id, "handling add_layer command");

    let session = state.session(script_id).await?;
    let layer = command_handlers::handle_add_layer(
        &command,
        &mut lock_session(&session),
        state.clock.as_ref(),
    );
    state.sync.schedule_flush(session);
    Ok((StatusCode::CREATED, Json(layer)))
}

/// POST /{script_id}/nodes
#[instrument(skip_all, fields(%script_id))]
async fn add_node(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
    Json(request): Json<AddNodeRequest>,
) -> Result<(StatusCode, Json<StoryNode>), ApiError> {
    let command = commands::AddNode {
        correlation_id: Uuid::new_v4(),
        layer_id: request.layer_id,
        title: request.title,
        content: request.content,
        duration: request.duration,
    };

    info!(
        correlation_id = %command.correlation_id,
        layer_id = %command.layer_id,
        "handling add_node command"
    );

    let session = state.session(script_id).await?;
    let node = command_handlers::handle_add_node(
        &command,
        &mut lock_session(&session),
        state.clock.as_ref(),
    )?;
    state.sync.schedule_flush(session);
    Ok((StatusCode::CREATED, Json(node)))
}

/// GET /{script_id}/nodes/{node_id}
#[instrument(skip_all, fields(%script_id, %node_id))]
async fn get_node(
    State(state): State<AppState>,
    Path((script_id, node_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<StoryNode>, ApiError> {
    let session = state.session(script_id).await?;
    let node = query_handlers::get_node(&lock_session(&session), node_id)?;
    Ok(Json(node))
}

/// PUT /{script_id}/nodes/{node_id}/content
#[instrument(skip_all, fields(%script_id, %node_id))]
async fn update_content(
    State(state): State<AppState>,
    Path((script_id, node_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateContentRequest>,
) -> Result<Json<StoryNode>, ApiError> {
    let command = commands::UpdateNodeContent {
        correlation_id: Uuid::new_v4(),
        node_id,
        content: request.content,
        title: request.title,
    };

    info!(correlation_id = %command.correlation_id, "handling update_node_content command");

    let session = state.session(script_id).await?;
    let node = command_handlers::handle_update_node_content(
        &command,
        &session,
        state.clock.as_ref(),
        state.store.as_ref(),
    )
    .await?;
    Ok(Json(node))
}

/// DELETE /{script_id}/nodes/{node_id}
#[instrument(skip_all, fields(%script_id, %node_id))]
async fn delete_node(
    State(state): State<AppState>,
    Path((script_id, node_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteNode {
        correlation_id: Uuid::new_v4(),
        node_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_node command");

    let session = state.session(script_id).await?;
    let removal = command_handlers::handle_delete_node(&command, &mut lock_session(&session));
    if removal.is_some() {
        state.sync.schedule_flush(session);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for layer and node edits.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{script_id}/layers", post(add_layer))
        .route("/{script_id}/nodes", post(add_node))
        .route("/{script_id}/nodes/{node_id}", get(get_node).delete(delete_node))
        .route("/{script_id}/nodes/{node_id}/content", put(update_content))
}
