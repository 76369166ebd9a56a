//! Admin endpoints and the login gate

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::db::DbError;
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::routes::members::MessageResponse;
use crate::http::server::AppState;
use crate::models::{Admin, AdminCredentials};

/// GET /admins - list admins without credentials
async fn list_admins(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Admin>>, ApiError> {
    let admins = state.repos.admins.list_admins().await?;
    Ok(Json(admins))
}

/// POST /add-admin - create an admin
async fn add_admin(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AdminCredentials>,
) -> Result<Json<MessageResponse>, ApiError> {
    req.validate()?;

    let admin = state.repos.admins.insert_admin(req).await.map_err(|e| {
        tracing::error!(error = %e, "Admin insert failed");
        ApiError::bad_request("Failed to add admin")
    })?;

    tracing::info!(id = admin.id, username = %admin.username, "Admin added");
    Ok(Json(MessageResponse {
        message: "Admin added successfully",
    }))
}

/// POST /admin/login - check credentials
async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AdminCredentials>,
) -> Result<Json<MessageResponse>, ApiError> {
    req.validate()?;

    match state.repos.admins.authenticate(&req).await {
        Ok(admin) => {
            tracing::info!(id = admin.id, "Admin login succeeded");
            Ok(Json(MessageResponse {
                message: "Login successful",
            }))
        }
        Err(DbError::InvalidCredentials) => {
            tracing::info!(username = %req.username, "Admin login rejected");
            Err(DbError::InvalidCredentials.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Admin routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admins", get(list_admins))
        .route("/add-admin", post(add_admin))
        .route("/admin/login", post(login))
}
