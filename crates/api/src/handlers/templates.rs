//! Handlers for the `/templates` resource.
//!
//! Templates are shared across accounts; the caller only needs to be
//! authenticated.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use influence_core::template::{CreateTemplate, UpdateTemplate};
use influence_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::{MessageResponse, TemplateListResponse, TemplateResponse};
use crate::state::AppState;

/// GET /api/templates
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<TemplateListResponse>> {
    let templates = state.templates.list().await?;
    Ok(Json(TemplateListResponse {
        success: true,
        templates,
    }))
}

/// GET /api/templates/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<TemplateResponse>> {
    let template = state.templates.get(id).await?;
    Ok(Json(TemplateResponse::found(template)))
}

/// POST /api/templates
pub async fn create(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTemplate>,
) -> AppResult<(StatusCode, Json<TemplateResponse>)> {
    let template = state.templates.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(TemplateResponse::changed(
            "Template created successfully",
            template,
        )),
    ))
}

/// PUT /api/templates/{id}
pub async fn update(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateTemplate>,
) -> AppResult<Json<TemplateResponse>> {
    let template = state.templates.update(id, &input).await?;
    Ok(Json(TemplateResponse::changed(
        "Template updated successfully",
        template,
    )))
}

/// DELETE /api/templates/{id}
pub async fn delete(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    state.templates.delete(id).await?;
    Ok(Json(MessageResponse::ok("Template deleted successfully")))
}
