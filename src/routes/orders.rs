use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::HeaderMap,
    routing::{MethodRouter, get},
};

use crate::{
    dto::orders::{CreateOrderRequest, OrderWithDetail},
    error::{AppError, AppResult},
    response::ApiResponse,
    routes::{
        page_not_found,
        params::{IdQuery, id_param, json_body},
    },
    services::order_service,
    state::AppState,
};

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

pub fn routes() -> MethodRouter<AppState> {
    get(get_order).post(create_order).fallback(page_not_found)
}

#[utoipa::path(
    post,
    path = "/order",
    request_body = CreateOrderRequest,
    params(
        ("Idempotency-Key" = Option<String>, Header, description = "Repeat-safe submission token, unique per user")
    ),
    responses(
        (status = 200, description = "Order created", body = ApiResponse<OrderWithDetail>),
        (status = 400, description = "Malformed request"),
        (status = 404, description = "User or product not found"),
        (status = 500, description = "Insufficient stock or storage failure"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<OrderWithDetail>>> {
    let payload = json_body(payload)?;
    let key = idempotency_key(&headers)?;
    let resp = order_service::create_order(&state, payload, key).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/order",
    params(IdQuery),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<OrderWithDetail>),
        (status = 400, description = "Missing or non-numeric id"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<OrderWithDetail>>> {
    let id = id_param(query)?;
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

fn idempotency_key(headers: &HeaderMap) -> AppResult<Option<String>> {
    let Some(value) = headers.get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };
    let key = value
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid Idempotency-Key header".into()))?
        .trim();
    Ok((!key.is_empty()).then(|| key.to_string()))
}
