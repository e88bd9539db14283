use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use nexgen_core::NexgenError;

/// JSON API error type for REST endpoints.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<NexgenError> for ApiError {
    fn from(err: NexgenError) -> Self {
        match &err {
            NexgenError::NotFound(_) => Self::not_found(err.to_string()),
            NexgenError::InvalidInput(_) => Self::bad_request(err.to_string()),
            NexgenError::Auth(_) => Self::unauthorized(err.to_string()),
            _ if err.is_connectivity() => {
                tracing::error!("backend unavailable: {}", err);
                Self::unavailable(err.to_string())
            }
            _ => {
                tracing::error!("api error: {}", err);
                Self::internal(err.to_string())
            }
        }
    }
}
