use std::collections::HashSet;

use chrono::Utc;
use validator::Validate;

use crate::{
    dto::orders::{CreateOrderRequest, OrderWithDetail},
    error::{AppError, AppResult},
    models::{Order, OrderLine},
    response::ApiResponse,
    services::within_deadline,
    state::AppState,
    store::{StoreError, UnitOfWork},
};

/// A requested line after its product has been resolved.
#[derive(Debug)]
struct PricedLine {
    product_id: i32,
    qty: i32,
    sub_total: i64,
}

/// Places an order: validates the user and every product, then decrements
/// stock and writes the header and lines in one unit of work.
///
/// Either the whole order commits or nothing is written. With an
/// idempotency key, a repeated submission returns the order committed by the
/// first one.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
    idempotency_key: Option<String>,
) -> AppResult<ApiResponse<OrderWithDetail>> {
    payload
        .validate()
        .map_err(|_| AppError::BadRequest("Invalid json structure".into()))?;
    ensure_distinct_products(&payload)?;

    let order = within_deadline(
        state,
        place_order(state, &payload, idempotency_key.as_deref()),
    )
    .await?;

    Ok(ApiResponse::success("order created successfully", order))
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<ApiResponse<OrderWithDetail>> {
    let order = within_deadline(state, async {
        let order = state
            .orders
            .get_order(id)
            .await?
            .ok_or(AppError::NotFound("Error fetching the transaction"))?;
        attach_detail(state, order).await
    })
    .await?;

    Ok(ApiResponse::success("Success", order))
}

async fn place_order(
    state: &AppState,
    payload: &CreateOrderRequest,
    idempotency_key: Option<&str>,
) -> AppResult<OrderWithDetail> {
    if let Some(key) = idempotency_key {
        if let Some(existing) = state
            .orders
            .find_by_idempotency_key(payload.user_id, key)
            .await?
        {
            tracing::info!(order_id = existing.id, "replaying order for idempotency key");
            return attach_detail(state, existing).await;
        }
    }

    state
        .users
        .get_user(payload.user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let mut lines = Vec::with_capacity(payload.detail.len());
    let mut grand_total: i64 = 0;
    for line in &payload.detail {
        let product = state
            .catalog
            .get_product(line.product_id)
            .await?
            .ok_or(AppError::ProductNotFound(line.product_id))?;
        let sub_total = product
            .price
            .checked_mul(i64::from(line.qty))
            .ok_or_else(|| AppError::BadRequest("Invalid json structure".into()))?;
        grand_total = grand_total
            .checked_add(sub_total)
            .ok_or_else(|| AppError::BadRequest("Invalid json structure".into()))?;
        lines.push(PricedLine {
            product_id: product.id,
            qty: line.qty,
            sub_total,
        });
    }

    let mut uow = state.orders.begin().await?;
    let written = write_order(
        &mut *uow,
        payload.user_id,
        &lines,
        grand_total,
        idempotency_key,
    )
    .await;

    match written {
        Ok(order) => {
            uow.commit().await?;
            tracing::info!(
                order_id = order.order.id,
                user_id = order.order.user_id,
                grand_total = order.order.grand_total,
                lines = order.detail.len(),
                "order committed"
            );
            Ok(order)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::warn!(error = %rollback_err, "order rollback failed");
            }
            match (err, idempotency_key) {
                // Lost a race against an identical submission; hand back the winner.
                (AppError::Store(StoreError::Conflict), Some(key)) => {
                    let existing = state
                        .orders
                        .find_by_idempotency_key(payload.user_id, key)
                        .await?
                        .ok_or(AppError::Store(StoreError::Conflict))?;
                    attach_detail(state, existing).await
                }
                (err, _) => Err(err),
            }
        }
    }
}

async fn write_order(
    uow: &mut dyn UnitOfWork,
    user_id: i32,
    lines: &[PricedLine],
    grand_total: i64,
    idempotency_key: Option<&str>,
) -> AppResult<OrderWithDetail> {
    let mut order = uow
        .insert_order(user_id, Utc::now(), idempotency_key)
        .await?;

    let mut detail = Vec::with_capacity(lines.len());
    for line in lines {
        if !uow.decrement_stock(line.product_id, line.qty).await? {
            tracing::warn!(
                product_id = line.product_id,
                qty = line.qty,
                "insufficient stock"
            );
            return Err(AppError::InsufficientStock(line.product_id));
        }

        let line = OrderLine {
            transaction_id: order.id,
            product_id: line.product_id,
            qty: line.qty,
            sub_total: line.sub_total,
        };
        uow.insert_line(&line).await?;
        detail.push(line);
    }

    uow.set_grand_total(order.id, grand_total).await?;
    order.grand_total = grand_total;

    Ok(OrderWithDetail { order, detail })
}

async fn attach_detail(state: &AppState, order: Order) -> AppResult<OrderWithDetail> {
    let detail = state.orders.get_order_lines(order.id).await?;
    Ok(OrderWithDetail { order, detail })
}

fn ensure_distinct_products(payload: &CreateOrderRequest) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(payload.detail.len());
    if payload.detail.iter().all(|line| seen.insert(line.product_id)) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Duplicate product ID in detail".into()))
    }
}
