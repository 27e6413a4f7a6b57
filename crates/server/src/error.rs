use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carbon_passport::{form, gateway};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Form(#[from] form::Error),
    #[error("No valid routes")]
    NoRoutes(Vec<String>),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Passport has expired")]
    Expired,
    #[error(transparent)]
    Gateway(#[from] gateway::Error),
    /// The passport row exists but none of its routes were stored.
    #[error("Routes could not be saved for passport {passport_id}: {source}")]
    Orphaned {
        passport_id: Uuid,
        source: gateway::Error,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": message }),
            ),
            ApiError::Form(err) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": err.to_string(), "field": err.field() }),
            ),
            ApiError::NoRoutes(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": self.to_string(), "errors": errors }),
            ),
            ApiError::NotFound(_) | ApiError::Gateway(gateway::Error::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "error": "Not found" }),
            ),
            ApiError::Expired => (
                StatusCode::GONE,
                json!({ "success": false, "error": self.to_string() }),
            ),
            ApiError::Gateway(gateway::Error::Photo(err)) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": err.to_string(), "field": "photo" }),
            ),
            ApiError::Gateway(err) => {
                error!("Gateway failure: {err}");
                let status = if err.is_transient() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (
                    status,
                    json!({ "success": false, "error": "Something went wrong, please try again" }),
                )
            }
            ApiError::Orphaned { passport_id, .. } => {
                error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": "Passport was created but its routes could not be saved",
                        "passportId": passport_id,
                    }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (ApiError::BadRequest("q".into()), StatusCode::BAD_REQUEST),
            (ApiError::Form(form::Error::NoLegs), StatusCode::BAD_REQUEST),
            (ApiError::NoRoutes(vec![]), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("passport".into()), StatusCode::NOT_FOUND),
            (ApiError::Expired, StatusCode::GONE),
            (
                gateway::Error::NotFound("passport".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                gateway::Error::Photo(gateway::PhotoError::Empty).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                gateway::Error::Unavailable("timeout".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                gateway::Error::Storage("disk".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Orphaned {
                    passport_id: Uuid::nil(),
                    source: gateway::Error::Storage("disk".into()),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
