use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::services::ai_service::AiError;
use crate::services::booking_flow::BookingError;
use crate::services::cart_service::CartError;

/// Shown to the user whenever the story assistant is unavailable.
pub const AI_FAILURE_MESSAGE: &str =
    "عذراً، حدث خطأ أثناء التواصل مع المساعد الذكي. يرجى المحاولة مرة أخرى.";

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A body, query string or path segment actix could not parse.
    #[error("{message}")]
    Malformed {
        message: &'static str,
        details: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Malformed { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Booking(err) => match err {
                BookingError::UnknownPackage(_)
                | BookingError::UnknownInstructor(_)
                | BookingError::UnknownProfile(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            AppError::Cart(CartError::ItemNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Cart(CartError::Empty) => StatusCode::CONFLICT,
            AppError::Cart(CartError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Ai(AiError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            AppError::Ai(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Ai(AiError::InvalidRequest(msg)) => ErrorBody {
                error: "Invalid request".to_string(),
                details: Some(msg.clone()),
            },
            // Upstream causes are logged, never echoed verbatim
            AppError::Ai(err) => {
                log::error!("Story assistant failure: {}", err);
                ErrorBody {
                    error: AI_FAILURE_MESSAGE.to_string(),
                    details: Some(err.public_details().to_string()),
                }
            }
            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: None,
                }
            }
            other => ErrorBody {
                error: other.to_string(),
                details: other.details(),
            },
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl AppError {
    fn details(&self) -> Option<String> {
        match self {
            AppError::Booking(BookingError::Validation { fields, .. }) => Some(fields.join(", ")),
            AppError::Malformed { details, .. } => Some(details.clone()),
            _ => None,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for AppError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        AppError::Internal(format!("state lock poisoned: {}", err))
    }
}
