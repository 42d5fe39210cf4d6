//! HTTP surface: the refresh endpoint, admin pages and login.

pub mod app;
pub mod handlers;
pub mod session;
pub mod state;

pub use app::build_router;
pub use state::AppState;

use crate::core::FlexError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Input(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl From<FlexError> for WebError {
    fn from(err: FlexError) -> Self {
        match err {
            FlexError::MalformedHashedName(_)
            | FlexError::InvalidInput(_)
            | FlexError::TypeMismatch(_) => Self::Input(err.to_string()),
            FlexError::RecordNotFound { .. } | FlexError::UnresolvedPath(_) => {
                Self::NotFound(err.to_string())
            }
            FlexError::Auth(_) => Self::Unauthorized(err.to_string()),
            FlexError::ModelNotFound(_)
            | FlexError::FieldNotFound(_, _)
            | FlexError::NotRegistered(_)
            | FlexError::WidgetNotConfigured(_, _)
            | FlexError::Serialization(_)
            | FlexError::LockError(_) => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::Input(msg) => (StatusCode::BAD_REQUEST, msg, "bad_request"),
            WebError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "unauthorized"),
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "not_found"),
            WebError::Internal(msg) => {
                error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, "internal_error")
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flex_errors_map_to_status_classes() {
        let cases = [
            (
                WebError::from(FlexError::MalformedHashedName("bogus".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                WebError::from(FlexError::ModelNotFound("app.nope".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WebError::from(FlexError::NotRegistered("app.order".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WebError::from(FlexError::RecordNotFound {
                    model: "Order".into(),
                    pk: "9".into(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                WebError::from(FlexError::Auth("nope".into())),
                StatusCode::UNAUTHORIZED,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
