use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{MethodRouter, get},
};

use crate::{
    dto::products::{CreateProductRequest, ProductList},
    error::AppResult,
    models::Product,
    response::ApiResponse,
    routes::{
        page_not_found,
        params::{IdQuery, id_param, json_body},
    },
    services::product_service,
    state::AppState,
};

pub fn routes() -> MethodRouter<AppState> {
    get(get_product).post(create_product).fallback(page_not_found)
}

pub fn by_brand_routes() -> MethodRouter<AppState> {
    get(products_by_brand).fallback(page_not_found)
}

#[utoipa::path(
    post,
    path = "/product",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Malformed request"),
        (status = 404, description = "Brand not found"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let payload = json_body(payload)?;
    let resp = product_service::create_product(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/product",
    params(IdQuery),
    responses(
        (status = 200, description = "Product", body = ApiResponse<Product>),
        (status = 400, description = "Missing or non-numeric id"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let id = id_param(query)?;
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/product/brand",
    params(IdQuery),
    responses(
        (status = 200, description = "Products of a brand", body = ApiResponse<ProductList>),
        (status = 400, description = "Missing or non-numeric id"),
        (status = 404, description = "Brand not found"),
    ),
    tag = "Products"
)]
pub async fn products_by_brand(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let id = id_param(query)?;
    let resp = product_service::products_by_brand(&state, id).await?;
    Ok(Json(resp))
}
