pub mod health;
pub mod leads;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /leads                       list, create
/// /leads/{id}                  get, update, delete
/// /leads/{id}/status           status transition (PUT)
/// /leads/{id}/respond          influencer reply (POST)
/// /leads/{id}/message          message from either party (POST)
/// /leads/{id}/compose          render a template for the lead (POST)
///
/// /templates                   list, create
/// /templates/{id}              get, update, delete
/// ```
///
/// Every route requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/leads", leads::router())
        .nest("/templates", templates::router())
}
