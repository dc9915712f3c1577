//! Script catalogue routes: list, create, rename, tag, soft-delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, put},
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use plotline_catalogue::application::{command_handlers, query_handlers};
use plotline_catalogue::domain::commands;
use plotline_core::script::Script;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateScriptRequest {
    /// Script title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional outline.
    #[serde(default)]
    pub outline: Option<String>,
    /// Tag names.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for PATCH /{script_id}. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateScriptRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New outline.
    #[serde(default)]
    pub outline: Option<String>,
    /// Replacement tag names.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Request body for PUT /{script_id}/title.
#[derive(Debug, Deserialize)]
pub struct RenameScriptRequest {
    /// New title.
    pub title: String,
}

/// Request body for PUT /{script_id}/tags.
#[derive(Debug, Deserialize)]
pub struct UpdateTagsRequest {
    /// Replacement tag names.
    pub tags: Vec<String>,
}

/// GET /
#[instrument(skip_all)]
async fn list_scripts(State(state): State<AppState>) -> Result<Json<Vec<Script>>, ApiError> {
    let scripts = query_handlers::list_scripts(state.scripts.as_ref()).await?;
    Ok(Json(scripts))
}

/// POST /
#[instrument(skip_all)]
async fn create_script(
    State(state): State<AppState>,
    Json(request): Json<CreateScriptRequest>,
) -> Result<(StatusCode, Json<Script>), ApiError> {
    let command = commands::CreateScript {
        correlation_id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        outline: request.outline,
        tags: request.tags,
    };

    info!(correlation_id = %command.correlation_id, "handling create_script command");

    let script = command_handlers::handle_create_script(
        &command,
        state.clock.as_ref(),
        state.scripts.as_ref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(script)))
}

/// GET /{script_id}
#[instrument(skip_all, fields(%script_id))]
async fn get_script(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
) -> Result<Json<Script>, ApiError> {
    let script = query_handlers::get_script(script_id, state.scripts.as_ref()).await?;
    Ok(Json(script))
}

async fn apply_update(
    state: &AppState,
    command: commands::UpdateScript,
) -> Result<Json<Script>, ApiError> {
    info!(correlation_id = %command.correlation_id, "handling update_script command");

    let script = command_handlers::handle_update_script(
        &command,
        state.clock.as_ref(),
        state.scripts.as_ref(),
    )
    .await?;
    Ok(Json(script))
}

/// PATCH /{script_id}
#[instrument(skip_all, fields(%script_id))]
async fn update_script(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
    Json(request): Json<UpdateScriptRequest>,
) -> Result<Json<Script>, ApiError> {
    let command = commands::UpdateScript {
        correlation_id: Uuid::new_v4(),
        script_id,
        title: request.title,
        description: request.description,
        outline: request.outline,
        tags: request.tags,
    };
    apply_update(&state, command).await
}

/// PUT /{script_id}/title
#[instrument(skip_all, fields(%script_id))]
async fn rename_script(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
    Json(request): Json<RenameScriptRequest>,
) -> Result<Json<Script>, ApiError> {
    let command = commands::UpdateScript::rename(Uuid::new_v4(), script_id, request.title);
    apply_update(&state, command).await
}

/// PUT /{script_id}/tags
#[instrument(skip_all, fields(%script_id))]
async fn update_tags(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
    Json(request): Json<UpdateTagsRequest>,
) -> Result<Json<Script>, ApiError> {
    let command = commands::UpdateScript::retag(Uuid::new_v4(), script_id, request.tags);
    apply_update(&state, command).await
}

/// DELETE /{script_id}
///
/// The record is kept with `deleted_at` set. The script's open session and
/// any pending flush are dropped, and its graph routes answer 404 from then
/// on.
#[instrument(skip_all, fields(%script_id))]
async fn delete_script(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteScript {
        correlation_id: Uuid::new_v4(),
        script_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_script command");

    command_handlers::handle_delete_script(&command, state.clock.as_ref(), state.scripts.as_ref())
        .await?;
    state.close(script_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the script catalogue.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_scripts).post(create_script))
        .route(
            "/{script_id}",
            get(get_script).patch(update_script).delete(delete_script),
        )
        .route("/{script_id}/title", put(rename_script))
        .route("/{script_id}/tags", put(update_tags))
}
