use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error details attached to every non-2xx envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    pub reason: String,
    pub error_user_title: String,
    pub error_user_msg: String,
}

impl ErrorBody {
    /// Generic error carrying only the reason phrase of `status`.
    pub fn for_status(status: StatusCode, reason: impl Into<String>) -> Self {
        let text = status.canonical_reason().unwrap_or("Unknown").to_string();
        Self {
            message: text.clone(),
            reason: reason.into(),
            error_user_title: text.clone(),
            error_user_msg: text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = "SUCCESS".to_string();
        }
        Self {
            status: StatusCode::OK.as_u16(),
            message,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn failure(status: StatusCode, message: impl Into<String>, reason: &str) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = "FAIL".to_string();
        }
        Self {
            status: status.as_u16(),
            message,
            data: None,
            error: Some(ErrorBody::for_status(status, reason)),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
