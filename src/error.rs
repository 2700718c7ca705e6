use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Application error taxonomy for HTTP handlers.
///
/// Domain failures carry enough context for the response message; store and
/// collaborator failures are sanitized before leaving the process.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("invalid {kind} option: {key}")]
    InvalidOption { kind: &'static str, key: String },

    #[error("not enough points: have {balance}, need {cost}")]
    InsufficientPoints { balance: i32, cost: i32 },

    #[error("{0}")]
    Validation(String),

    #[error("upstream service error: {0}")]
    Upstream(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::InvalidOption { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::InsufficientPoints { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Upstream(msg) => {
                error!(error = %msg, "upstream collaborator failed");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let e = ApiError::NotFound { entity: "User" };
        assert_eq!(e.to_string(), "User not found");
    }

    #[test]
    fn insufficient_points_message_carries_amounts() {
        let e = ApiError::InsufficientPoints {
            balance: 10,
            cost: 30,
        };
        assert_eq!(e.to_string(), "not enough points: have 10, need 30");
    }

    #[test]
    fn invalid_option_names_kind_and_key() {
        let e = ApiError::InvalidOption {
            kind: "avatar",
            key: "wizard".into(),
        };
        assert_eq!(e.to_string(), "invalid avatar option: wizard");
    }
}
