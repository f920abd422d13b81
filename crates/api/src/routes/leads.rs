//! Route definitions for the `/leads` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// PUT    /{id}/status      -> update_status
/// POST   /{id}/respond     -> respond
/// POST   /{id}/message     -> add_message
/// POST   /{id}/compose     -> compose
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leads::list).post(leads::create))
        .route(
            "/{id}",
            get(leads::get_by_id)
                .put(leads::update)
                .delete(leads::delete),
        )
        .route("/{id}/status", put(leads::update_status))
        .route("/{id}/respond", post(leads::respond))
        .route("/{id}/message", post(leads::add_message))
        .route("/{id}/compose", post(leads::compose))
}
