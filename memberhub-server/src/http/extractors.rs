//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::{ApiError, INVALID_REQUEST_DATA};

/// JSON body whose rejection is a 400 `{"error": "Invalid request data"}`
/// instead of axum's plain-text 400/415/422.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(%rejection, "Rejected request body");
            ApiError::bad_request(INVALID_REQUEST_DATA)
        })?;
        Ok(Self(value))
    }
}

/// Extract a numeric member id from path
pub struct MemberId(pub i64);

impl<S> FromRequestParts<S> for MemberId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("member id is required"))?;

        let id = id
            .parse::<i64>()
            .map_err(|_| ApiError::bad_request(format!("invalid member id '{}'", id)))?;

        Ok(Self(id))
    }
}
