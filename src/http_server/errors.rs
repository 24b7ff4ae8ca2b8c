//! REST error mapping
//!
//! Every failure leaves the server as `{"error": message, "code": code}`.
//! Missing datasets map to 404; every other request failure is a 400.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::ParseKindError;
use crate::facade::FacadeError;

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum RestError {
    #[error("Unknown dataset kind '{0}'")]
    UnknownKind(String),

    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Request could not be completed: {0}")]
    Internal(String),

    #[error(transparent)]
    Facade(#[from] FacadeError),
}

impl RestError {
    /// HTTP status for the failure
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::Facade(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable code of the failure
    pub fn code(&self) -> &'static str {
        match self {
            RestError::UnknownKind(_) => "DATASET_INVALID_KIND",
            RestError::InvalidJson(_) => "REQUEST_INVALID_JSON",
            RestError::Internal(_) => "REQUEST_INTERNAL",
            RestError::Facade(err) => err.code(),
        }
    }
}

impl From<ParseKindError> for RestError {
    fn from(err: ParseKindError) -> Self {
        RestError::UnknownKind(err.input().to_string())
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::InvalidJson(err.to_string())
    }
}

impl From<tokio::task::JoinError> for RestError {
    fn from(err: tokio::task::JoinError) -> Self {
        RestError::Internal(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    error: String,
    code: &'static str,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorPayload {
            error: self.to_string(),
            code: self.code(),
        });
        (status, body).into_response()
    }
}
