use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::examples::DocumentRefError;
use crate::documents::store::StoreError;
use crate::editors::EditError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Deleting the last document, or renaming/deleting a built-in example.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("No AI credential configured")]
    CredentialsMissing,

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => AppError::NotFound(e.to_string()),
            StoreError::LastDocument => AppError::InvariantViolation(e.to_string()),
            StoreError::Corrupt { .. } | StoreError::Backend(_) => AppError::Storage(e.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::CredentialsMissing => AppError::CredentialsMissing,
            LlmError::Parse(_) | LlmError::EmptyContent => AppError::MalformedResponse(e.to_string()),
            LlmError::Credentials(_) => AppError::Storage(e.to_string()),
            LlmError::Http(_) | LlmError::Api { .. } => AppError::Llm(e.to_string()),
        }
    }
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<DocumentRefError> for AppError {
    fn from(e: DocumentRefError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvariantViolation(msg) => {
                (StatusCode::CONFLICT, "INVARIANT_VIOLATION", msg.clone())
            }
            AppError::CredentialsMissing => (
                StatusCode::PRECONDITION_REQUIRED,
                "CREDENTIALS_MISSING",
                "Configure an API key in settings to use AI features".to_string(),
            ),
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed AI response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    "The AI service returned an unusable response".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        assert!(matches!(
            AppError::from(StoreError::NotFound(Uuid::new_v4())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::LastDocument),
            AppError::InvariantViolation(_)
        ));
    }

    #[test]
    fn test_llm_errors_map_to_taxonomy() {
        assert!(matches!(
            AppError::from(LlmError::CredentialsMissing),
            AppError::CredentialsMissing
        ));
        assert!(matches!(
            AppError::from(LlmError::EmptyContent),
            AppError::MalformedResponse(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::CredentialsMissing.into_response().status(),
            StatusCode::PRECONDITION_REQUIRED
        );
        assert_eq!(
            AppError::InvariantViolation("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::MalformedResponse("x".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
