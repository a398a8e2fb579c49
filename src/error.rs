use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::entities::EventStatus;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Operation requires event status '{required}' but event is '{actual}'")]
    InvalidStateTransition {
        required: EventStatus,
        actual: EventStatus,
    },

    #[error("Round {round} is outside 1..={total_rounds}")]
    InvalidRound { round: i32, total_rounds: i32 },

    #[error("All 75 numbers have been drawn for this event")]
    ExhaustedNumberSpace,

    #[error("Subcard is not fully marked ({unmarked} cells remaining)")]
    IncompleteCard { unmarked: u64 },

    #[error("A bingo claim already exists for this subcard")]
    DuplicateClaim,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Forbidden")]
    Forbidden,

    // Store failure inside an atomic unit; nothing partial is visible,
    // callers may retry.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::InvalidStateTransition { .. } => {
                log::warn!("State transition rejected: {self}");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "INVALID_STATE_TRANSITION",
                    self.to_string(),
                )
            }
            AppError::InvalidRound { .. } => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_ROUND",
                self.to_string(),
            ),
            AppError::ExhaustedNumberSpace => (
                actix_web::http::StatusCode::CONFLICT,
                "EXHAUSTED_NUMBER_SPACE",
                self.to_string(),
            ),
            AppError::IncompleteCard { .. } => (
                actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
                "INCOMPLETE_CARD",
                self.to_string(),
            ),
            AppError::DuplicateClaim => (
                actix_web::http::StatusCode::CONFLICT,
                "DUPLICATE_CLAIM",
                self.to_string(),
            ),
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    msg.clone(),
                )
            }
            AppError::JwtError(err) => {
                log::warn!("JWT error: {err}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    "Invalid token".to_string(),
                )
            }
            AppError::Forbidden => {
                log::warn!("Forbidden access");
                (
                    actix_web::http::StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "Forbidden".to_string(),
                )
            }
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    msg.clone(),
                )
            }
            AppError::ReqwestError(err) => {
                log::error!("HTTP request error: {err}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    "Upstream request failed".to_string(),
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "TRANSIENT_STORE_ERROR",
                    "Store failure, safe to retry".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_domain_errors_map_to_expected_status_codes() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (
                AppError::InvalidStateTransition {
                    required: EventStatus::Running,
                    actual: EventStatus::Draft,
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::InvalidRound {
                    round: 9,
                    total_rounds: 5,
                },
                StatusCode::BAD_REQUEST,
            ),
            (AppError::ExhaustedNumberSpace, StatusCode::CONFLICT),
            (
                AppError::IncompleteCard { unmarked: 2 },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::DuplicateClaim, StatusCode::CONFLICT),
            (
                AppError::NotFound("event".into()),
                StatusCode::NOT_FOUND,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.error_response().status(), expected);
        }
    }

    #[test]
    fn test_state_transition_message_names_both_states() {
        let err = AppError::InvalidStateTransition {
            required: EventStatus::Generated,
            actual: EventStatus::Running,
        };
        let msg = err.to_string();
        assert!(msg.contains("generated"));
        assert!(msg.contains("running"));
    }
}
