use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
}

pub enum APIResponse {
    OK,
    NotFound(String),
}

impl IntoResponse for APIResponse {
    fn into_response(self) -> Response {
        match self {
            Self::OK => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
            Self::NotFound(msg) => APIError::NotFound(msg).into_response(),
        }
    }
}

/// Errors surfaced to API callers as `{ok: false, error}`.
#[derive(Debug, Error)]
pub enum APIError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    UnAuthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InternalServerError(String),
}

impl APIError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnAuthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for APIError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            ok: false,
            error: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}
