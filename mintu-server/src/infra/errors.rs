use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mintu_core::{ViewError, claim::ClaimError};

use crate::sessions::OpenSessionError;
use serde_json::json;
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }

    pub fn gone(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GONE, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::TornDown => Self::gone(err.to_string()),
            ViewError::AlreadyMounted | ViewError::NotConnected => {
                Self::conflict(err.to_string())
            }
            ViewError::UnknownConnector(_) => Self::bad_request(err.to_string()),
            ViewError::Claim(ClaimError::Disabled(_)) => {
                Self::conflict(err.to_string())
            }
            ViewError::Claim(ClaimError::Transaction(_)) => {
                Self::bad_request(err.to_string())
            }
            ViewError::Wallet(_) | ViewError::Host(_) => {
                tracing::warn!(error = %err, "collaborator call failed");
                Self::bad_gateway(err.to_string())
            }
        }
    }
}

impl From<OpenSessionError> for AppError {
    fn from(err: OpenSessionError) -> Self {
        match err {
            OpenSessionError::Full { .. } => Self::rate_limited(err.to_string()),
            OpenSessionError::View(err) => err.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!(error = %err, "response serialization failed");
        Self::internal("Failed to render response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_errors_map_to_statuses() {
        assert_eq!(AppError::from(ViewError::TornDown).status, StatusCode::GONE);
        assert_eq!(
            AppError::from(ViewError::UnknownConnector("x".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ViewError::NotConnected).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(OpenSessionError::Full { limit: 1 }).status,
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
