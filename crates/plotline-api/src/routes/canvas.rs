//! Canvas interaction events.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::post};
use tracing::{info, instrument};
use uuid::Uuid;

use plotline_graph::application::command_handlers;
use plotline_graph::domain::events::{CanvasEvent, EventOutcome};
use plotline_graph::lock_session;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /{script_id}/events
///
/// Drags, connections, and edge deletions schedule a flush. Clicks only
/// change the highlight.
#[instrument(skip_all, fields(%script_id))]
async fn handle_event(
    State(state): State<AppState>,
    Path(script_id): Path<Uuid>,
    Json(event): Json<CanvasEvent>,
) -> Result<Json<EventOutcome>, ApiError> {
    info!(event = ?event, "handling canvas event");

    let session = state.session(script_id).await?;
    let outcome = command_handlers::handle_canvas_event(
        &event,
        &mut lock_session(&session),
        state.clock.as_ref(),
    )?;
    if outcome.changes_graph() {
        state.sync.schedule_flush(session);
    }
    Ok(Json(outcome))
}

/// Returns the router for canvas events.
pub fn router() -> Router<AppState> {
    Router::new().route("/{script_id}/events", post(handle_event))
}
