//! Whole-script routes: loading, viewing, arranging, and saving.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use plotline_graph::application::{command_handlers, query_handlers};
use plotline_graph::domain::commands;
use plotline_graph::domain::layout::LayoutDirection;
use plotline_graph::domain::view::CanvasView;
use plotline_graph::lock_session;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /arrange.
#[derive(Debug, Default, Deserialize)]
pub struct ArrangeRequest {
    /// Direction to switch to before arranging; keeps the current one when
    /// absent.
    #[serde(default)]
    pub direction: Option<LayoutDirection>,
}

/// Response body for POST /save.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    /// The saved script.
    pub script_id: Uuid,
    /// Always `true`; failures are reported as errors.
    pub saved: bool,
}

/// POST /{script_id}/load
#[instrument(skip_all, fields(%script_id))]
async fn load_script(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
) -> Result<Json<CanvasView>, ApiError> {
    let session = state.reload(script_id).await?;
    let view = query_handlers::get_canvas_view(&lock_session(&session));
    info!(nodes = view.nodes.len(), edges = view.edges.len(), "script loaded");
    Ok(Json(view))
}

/// GET /{script_id}/view
#[instrument(skip_all, fields(%script_id))]
async fn get_view(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
) -> Result<Json<CanvasView>, ApiError> {
    let session = state.session(script_id).await?;
    let view = query_handlers::get_canvas_view(&lock_session(&session));
    Ok(Json(view))
}

/// GET /{script_id}/outline
#[instrument(skip_all, fields(%script_id))]
async fn get_outline(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
) -> Result<Json<Vec<query_handlers::LayerOutline>>, ApiError> {
    let session = state.session(script_id).await?;
    let outline = query_handlers::get_layer_outline(&lock_session(&session));
    Ok(Json(outline))
}

/// POST /{script_id}/arrange
#[instrument(skip_all, fields(%script_id))]
async fn arrange(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
    Json(request): Json<ArrangeRequest>,
) -> Result<Json<CanvasView>, ApiError> {
    let command = commands::ArrangeLayout {
        correlation_id: Uuid::new_v4(),
        direction: request.direction,
    };

    info!(correlation_id = %command.correlation_id, "handling arrange_layout command");

    let session = state.session(script_id).await?;
    let view = command_handlers::handle_arrange_layout(&command, &mut lock_session(&session));
    state.sync.schedule_flush(session);
    Ok(Json(view))
}

/// POST /{script_id}/toggle-direction
#[instrument(skip_all, fields(%script_id))]
async fn toggle_direction(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
) -> Result<Json<CanvasView>, ApiError> {
    let session = state.session(script_id).await?;
    let view = lock_session(&session).toggle_direction();
    info!(direction = ?view.direction, "layout direction toggled");
    state.sync.schedule_flush(session);
    Ok(Json(view))
}

/// POST /{script_id}/save
#[instrument(skip_all, fields(%script_id))]
async fn save(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
) -> Result<Json<SaveResponse>, ApiError> {
    let session = state.session(script_id).await?;
    state.sync.save_now(&*session).await?;
    Ok(Json(SaveResponse {
        script_id,
        saved: true,
    }))
}

/// Returns the router for whole-script operations.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{script_id}/load", post(load_script))
        .route("/{script_id}/view", get(get_view))
        .route("/{script_id}/outline", get(get_outline))
        .route("/{script_id}/arrange", post(arrange))
        .route("/{script_id}/toggle-direction", post(toggle_direction))
        .route("/{script_id}/save", post(save))
}
