use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use std::sync::OnceLock;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Lets 500 responses carry the underlying error text. Set once at startup,
/// only in development.
pub fn expose_internal_details(enabled: bool) {
    let _ = EXPOSE_DETAILS.set(enabled);
}

fn details_exposed() -> bool {
    EXPOSE_DETAILS.get().copied().unwrap_or(false)
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("We are currently closed. Please order during business hours.")]
    Closed,

    #[error("Menu item {0} is not available")]
    ItemUnavailable(String),

    #[error("Payment error: {0}")]
    PaymentError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Closed => "STORE_CLOSED",
            AppError::ItemUnavailable(_) => "ITEM_UNAVAILABLE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::PaymentError(_) => "PAYMENT_ERROR",
            AppError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::Closed | AppError::ItemUnavailable(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::AuthError(_) | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                msg.clone()
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                msg.clone()
            }
            AppError::InvalidToken => {
                log::warn!("Rejected session token");
                "Not authorized, token failed".to_string()
            }
            AppError::Forbidden => {
                log::warn!("Forbidden access");
                "Access denied".to_string()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::Closed | AppError::ItemUnavailable(_) => self.to_string(),
            _ => {
                log::error!("{self}");
                if details_exposed() {
                    self.to_string()
                } else {
                    "Internal server error".to_string()
                }
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message
            }
        }))
    }
}
