use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{response::ApiResponse, store::StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("User ID not found")]
    UserNotFound,

    #[error("Product ID not found")]
    ProductNotFound(i32),

    #[error("Brand ID not found")]
    BrandNotFound,

    /// A lookup by id found nothing; the message names the resource.
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(i32),

    #[error("Request timed out")]
    Timeout,

    #[error("Storage error")]
    Store(#[from] StoreError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error. Missing resources answer 404 and rejected
    /// input 400; the message strings stay as older clients expect them,
    /// only the status code differs from the historical blanket 500.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UserNotFound
            | AppError::ProductNotFound(_)
            | AppError::BrandNotFound
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientStock(_)
            | AppError::Timeout
            | AppError::Store(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            AppError::UserNotFound
            | AppError::ProductNotFound(_)
            | AppError::BrandNotFound
            | AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "invalid_request",
            AppError::InsufficientStock(_) => "insufficient_stock",
            AppError::Timeout | AppError::Store(_) | AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::InsufficientStock(_) => "Internal Server Error".to_string(),
            AppError::Timeout | AppError::Store(_) | AppError::Internal(_) => {
                tracing::error!(error = ?self, "request failed");
                "Internal Server Error".to_string()
            }
            _ => self.to_string(),
        };

        ApiResponse::failure(status, message, self.reason()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
