use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Order, OrderLine};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub user_id: i32,
    #[serde(default)]
    #[validate(length(min = 1), nested)]
    pub detail: Vec<OrderLineRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineRequest {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub qty: i32,
}

/// An order header together with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderWithDetail {
    #[serde(flatten)]
    pub order: Order,
    pub detail: Vec<OrderLine>,
}
