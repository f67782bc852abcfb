use std::future::Future;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub mod brand_service;
pub mod order_service;
pub mod product_service;

/// Runs `fut` under the request deadline. On expiry the future is dropped,
/// which discards any unit of work it still holds.
pub(crate) async fn within_deadline<T>(
    state: &AppState,
    fut: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(state.request_timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(
                timeout_ms = state.request_timeout.as_millis() as u64,
                "request deadline exceeded"
            );
            Err(AppError::Timeout)
        }
    }
}
