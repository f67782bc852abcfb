use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub brand_id: i32,
    pub name: String,
    /// Quantity on hand. Only order creation decrements it.
    pub qty: i32,
    pub price: i64,
}

/// Order header as stored in `transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub date: DateTime<Utc>,
    pub grand_total: i64,
}

/// One line of an order as stored in `transaction_detail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub transaction_id: i32,
    pub product_id: i32,
    pub qty: i32,
    pub sub_total: i64,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub brand_id: i32,
    pub name: String,
    pub qty: i32,
    pub price: i64,
}
