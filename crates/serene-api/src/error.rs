use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use serene_types::api::ErrorBody;

/// Every failure a handler can report. Nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or out-of-range request body.
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No valid session. Rendered without a body.
    #[error("Authentication required")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UsernameTaken => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Unauthorized => status.into_response(),
            Self::Internal(e) => {
                error!("Internal error: {:#}", e);
                let body = ErrorBody {
                    message: "Internal Server Error".to_string(),
                };
                (status, Json(body)).into_response()
            }
            other => {
                let body = ErrorBody {
                    message: other.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
