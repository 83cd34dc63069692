use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A vendor dependency (model API, payment API) failed. The detail is
    /// logged and never returned to the caller.
    #[error("Upstream error: {detail}")]
    Upstream {
        public_message: String,
        detail: String,
    },

    /// The model answered, but its output could not be used. The raw output
    /// is echoed back for debugging.
    #[error("Model output error: {message}")]
    ModelOutput {
        message: String,
        raw_response: String,
        violations: Vec<String>,
    },

    #[error("Payment not completed (status {0})")]
    PaymentNotCompleted(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(public_message: &str, detail: impl ToString) -> Self {
        AppError::Upstream {
            public_message: public_message.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, extra) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg,
                    None,
                )
            }
            AppError::Upstream {
                public_message,
                detail,
            } => {
                tracing::error!("Upstream error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    public_message,
                    None,
                )
            }
            AppError::ModelOutput {
                message,
                raw_response,
                violations,
            } => {
                tracing::error!("{message}: {raw_response}");
                let mut extra = json!({ "rawResponse": raw_response });
                if !violations.is_empty() {
                    extra["violations"] = json!(violations);
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MODEL_OUTPUT_ERROR",
                    message,
                    Some(extra),
                )
            }
            AppError::PaymentNotCompleted(status) => (
                StatusCode::BAD_REQUEST,
                "PAYMENT_NOT_COMPLETED",
                "Payment not completed".to_string(),
                Some(json!({ "status": status })),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(Value::Object(fields)) = extra {
            if let Value::Object(map) = &mut body {
                map.extend(fields);
            }
        }

        (status, Json(body)).into_response()
    }
}
