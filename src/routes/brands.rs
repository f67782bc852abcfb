use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{MethodRouter, get},
};

use crate::{
    dto::brands::CreateBrandRequest,
    error::AppResult,
    models::Brand,
    response::ApiResponse,
    routes::{
        method_not_allowed,
        params::{IdQuery, id_param, json_body},
    },
    services::brand_service,
    state::AppState,
};

pub fn routes() -> MethodRouter<AppState> {
    get(get_brand).post(create_brand).fallback(method_not_allowed)
}

#[utoipa::path(
    post,
    path = "/brand",
    request_body = CreateBrandRequest,
    responses(
        (status = 200, description = "Brand created", body = ApiResponse<Brand>),
        (status = 400, description = "Malformed request"),
    ),
    tag = "Brands"
)]
pub async fn create_brand(
    State(state): State<AppState>,
    payload: Result<Json<CreateBrandRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let payload = json_body(payload)?;
    let resp = brand_service::create_brand(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/brand",
    params(IdQuery),
    responses(
        (status = 200, description = "Brand", body = ApiResponse<Brand>),
        (status = 400, description = "Missing or non-numeric id"),
        (status = 404, description = "Brand not found"),
    ),
    tag = "Brands"
)]
pub async fn get_brand(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let id = id_param(query)?;
    let resp = brand_service::get_brand(&state, id).await?;
    Ok(Json(resp))
}
