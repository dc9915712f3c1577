//! Route modules. Everything except the health check and the catalogue
//! listing is scoped to one script.

use axum::Router;

use crate::state::AppState;

pub mod canvas;
pub mod catalogue;
pub mod editing;
pub mod health;
pub mod scripts;

/// The catalogue plus every script-scoped route, to be nested under
/// `/api/v1/scripts`.
pub fn script_routes() -> Router<AppState> {
    catalogue::router()
        .merge(scripts::router())
        .merge(editing::router())
        .merge(canvas::router())
}
