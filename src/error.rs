use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::MediaType;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A catalog answered with an error status or an unusable payload
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// The general-purpose assistant backend failed to produce a reply
    #[error("Assistant backend error: {0}")]
    Assistant(String),

    #[error("{provider} does not catalog {media_type}")]
    UnsupportedMediaType {
        provider: &'static str,
        media_type: MediaType,
    },

    #[error("Item {item_id} is not in the library of session {session_id}")]
    ItemNotFound { session_id: String, item_id: String },

    #[error("Session {0} not found")]
    SessionNotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::ItemNotFound { .. } | AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnsupportedMediaType { .. } => StatusCode::BAD_REQUEST,
            AppError::Http(_) | AppError::Catalog(_) | AppError::Assistant(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
