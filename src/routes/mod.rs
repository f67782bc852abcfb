use axum::{Router, http::StatusCode, routing::get};

use crate::{response::ApiResponse, state::AppState};

pub mod brands;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;

/// Assemble every route and bind the shared state. Middleware layers are
/// added by the binary.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/brand", brands::routes())
        .route("/brand/", brands::routes())
        .route("/product", products::routes())
        .route("/product/", products::routes())
        .route("/product/brand", products::by_brand_routes())
        .route("/product/brand/", products::by_brand_routes())
        .route("/order", orders::routes())
        .route("/order/", orders::routes())
        .merge(doc::scalar_docs())
        .fallback(page_not_found)
        .with_state(state)
}

pub async fn page_not_found() -> ApiResponse<serde_json::Value> {
    ApiResponse::failure(StatusCode::NOT_FOUND, "404 page not found", "")
}

pub async fn method_not_allowed() -> ApiResponse<serde_json::Value> {
    ApiResponse::failure(StatusCode::METHOD_NOT_ALLOWED, "Method not Allowed", "")
}
