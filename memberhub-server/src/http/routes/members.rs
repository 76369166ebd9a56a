//! Member endpoints
//!
//! Creation failures (store locked, nothing inserted) answer 200 with an
//! `error` body rather than an error status; existing front-ends key off
//! the body.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use crate::db::DbError;
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, MemberId};
use crate::http::server::AppState;
use crate::models::{Member, NewMember};

/// Body carrying a human-readable outcome
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Body returned by a successful create
#[derive(Serialize)]
pub struct CreatedMemberResponse {
    pub message: &'static str,
    pub member: Member,
}

/// GET /members - list all members
async fn list_members(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Member>>, ApiError> {
    let members = state.repos.members.list_members().await?;
    Ok(Json(members))
}

/// POST /members - insert a member (retries while the embedded store is locked)
async fn create_member(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<NewMember>,
) -> Result<Response, ApiError> {
    req.validate()?;

    let member = state
        .repos
        .members
        .insert_member(req)
        .await
        .map_err(|e| match e {
            DbError::Locked { .. } => {
                ApiError::rejected("Database is locked. Please try again later.")
            }
            DbError::NotInserted { .. } => ApiError::rejected("Failed to create member."),
            other => ApiError::from(other),
        })?;

    tracing::info!(id = member.id, "Member created");
    let location = format!("/members/{}", member.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreatedMemberResponse {
            message: "Member created successfully",
            member,
        }),
    )
        .into_response())
}

/// DELETE /members/{id} - delete a member by id
async fn delete_member(
    State(state): State<Arc<AppState>>,
    MemberId(id): MemberId,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.repos.members.delete_member(id).await {
        Ok(()) => {
            tracing::info!(id, "Member deleted");
            Ok(Json(MessageResponse {
                message: "Member deleted successfully",
            }))
        }
        Err(DbError::NotFound { .. }) => Err(ApiError::NotFound {
            message: "Member not found".into(),
        }),
        Err(e) => {
            tracing::error!(id, error = %e, "Member delete failed");
            Err(ApiError::bad_request(e.to_string()))
        }
    }
}

/// Member routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route("/members/{id}", delete(delete_member))
}
