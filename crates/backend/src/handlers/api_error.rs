use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::validation::{FieldError, ValidationError};
use serde::Serialize;
use thiserror::Error;

pub const MSG_INVALID_INPUT: &str = "Invalid input";
pub const MSG_INVALID_BODY: &str = "Invalid request body";
pub const MSG_DUPLICATE_EMAIL: &str = "This email is already on the waitlist";
pub const MSG_COUNT_FAILED: &str = "Failed to fetch waitlist count";
pub const MSG_JOIN_FAILED: &str = "Failed to join waitlist";

/// Тело ответа с ошибкой
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Ошибка HTTP-слоя. Только здесь выбирается код ответа.
///
/// `Internal` несёт лишь публичное сообщение: подробности пишутся в лог до
/// построения ошибки и клиенту не отдаются.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Validation(ValidationError),

    #[error("duplicate email")]
    DuplicateEmail,

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Log the full error server-side and hide it behind `public_message`
    pub fn internal(public_message: &'static str, err: &dyn std::error::Error) -> Self {
        tracing::error!(error = %err, "{}", public_message);
        ApiError::Internal(public_message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidBody(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: MSG_INVALID_BODY.to_string(),
                    errors: None,
                },
            ),
            ApiError::Validation(v) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: MSG_INVALID_INPUT.to_string(),
                    errors: Some(v.errors),
                },
            ),
            ApiError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: MSG_DUPLICATE_EMAIL.to_string(),
                    errors: None,
                },
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    message: message.to_string(),
                    errors: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
