use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::{RouteError, SessionError};

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Converts our `HTTPError` into a JSON `{"error": ...}` response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<RouteError> for HTTPError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::NoMatch(_) => HTTPError::new(StatusCode::NOT_FOUND, e.to_string()),
            _ => {
                error!("Route table error: {}", e);
                HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl From<SessionError> for HTTPError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidCredentials | SessionError::Unauthorized(_) => {
                HTTPError::new(StatusCode::UNAUTHORIZED, e.to_string())
            }
            SessionError::Storage(_) => {
                error!("Session storage error: {}", e);
                HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            _ => HTTPError::new(StatusCode::BAD_GATEWAY, e.to_string()),
        }
    }
}
