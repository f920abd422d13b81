//! Handlers for the `/leads` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use influence_core::error::CoreError;
use influence_core::lead::{CreateLead, UpdateLead};
use influence_core::message::{PostMessage, RespondToLead};
use influence_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::{ComposeResponse, LeadListResponse, LeadResponse, MessageResponse};
use crate::state::AppState;

/// Body of `PUT /leads/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: Option<String>,
}

/// Body of `POST /leads/{id}/compose`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeInput {
    pub template_id: Option<DbId>,
}

/// GET /api/leads
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<LeadListResponse>> {
    let leads = state.lifecycle.list_leads(auth.account_id).await?;
    Ok(Json(LeadListResponse {
        success: true,
        leads,
    }))
}

/// GET /api/leads/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<LeadResponse>> {
    let lead = state.lifecycle.get_lead(auth.account_id, id).await?;
    Ok(Json(LeadResponse::found(lead)))
}

/// POST /api/leads
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateLead>,
) -> AppResult<(StatusCode, Json<LeadResponse>)> {
    let lead = state.lifecycle.create_lead(auth.account_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(LeadResponse::changed("Lead created successfully", lead)),
    ))
}

/// PUT /api/leads/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateLead>,
) -> AppResult<Json<LeadResponse>> {
    let lead = state
        .lifecycle
        .update_fields(auth.account_id, id, &input)
        .await?;
    Ok(Json(LeadResponse::changed("Lead updated successfully", lead)))
}

/// PUT /api/leads/{id}/status
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<StatusInput>,
) -> AppResult<Json<LeadResponse>> {
    let lead = state
        .lifecycle
        .set_status(auth.account_id, id, input.status.as_deref())
        .await?;
    Ok(Json(LeadResponse::changed(
        "Lead status updated successfully",
        lead,
    )))
}

/// POST /api/leads/{id}/respond
pub async fn respond(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<RespondToLead>,
) -> AppResult<Json<LeadResponse>> {
    let lead = state
        .conversations
        .respond(auth.account_id, id, &input)
        .await?;
    Ok(Json(LeadResponse::changed("Response sent successfully", lead)))
}

/// POST /api/leads/{id}/message
pub async fn add_message(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<PostMessage>,
) -> AppResult<Json<LeadResponse>> {
    let lead = state
        .conversations
        .append_message(auth.account_id, id, &input)
        .await?;
    Ok(Json(LeadResponse::changed("Message added successfully", lead)))
}

/// POST /api/leads/{id}/compose
pub async fn compose(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ComposeInput>,
) -> AppResult<Json<ComposeResponse>> {
    let template_id = input
        .template_id
        .ok_or_else(|| CoreError::Validation("templateId is required".to_string()))?;

    let content = state
        .conversations
        .compose(auth.account_id, id, template_id)
        .await?;

    tracing::debug!(
        owner_id = auth.account_id,
        lead_id = id,
        template_id,
        "Reply composed"
    );
    Ok(Json(ComposeResponse {
        success: true,
        content,
    }))
}

/// DELETE /api/leads/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    state.lifecycle.delete_lead(auth.account_id, id).await?;
    Ok(Json(MessageResponse::ok("Lead deleted successfully")))
}
