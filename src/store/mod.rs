//! Storage capabilities used by the services.
//!
//! Every backend implements [`UserStore`], [`CatalogStore`] and [`OrderStore`].
//! Writes that must land together go through a [`UnitOfWork`] obtained from
//! [`OrderStore::begin`]; nothing written through it is visible to other
//! readers until [`UnitOfWork::commit`] returns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Brand, NewProduct, NewUser, Order, OrderLine, Product, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflicting row already exists")]
    Conflict,

    #[error("database error")]
    Db(#[from] sea_orm::DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: i32) -> StoreResult<Option<User>>;

    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_brand(&self, id: i32) -> StoreResult<Option<Brand>>;

    async fn create_brand(&self, name: String) -> StoreResult<Brand>;

    async fn get_product(&self, id: i32) -> StoreResult<Option<Product>>;

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product>;

    /// Products of a brand, ordered by id.
    async fn products_by_brand(&self, brand_id: i32) -> StoreResult<Vec<Product>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_order(&self, id: i32) -> StoreResult<Option<Order>>;

    async fn get_order_lines(&self, order_id: i32) -> StoreResult<Vec<OrderLine>>;

    async fn find_by_idempotency_key(&self, user_id: i32, key: &str)
    -> StoreResult<Option<Order>>;

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
}

/// One atomic batch of writes.
///
/// Dropping a unit of work without committing discards everything written
/// through it.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Inserts an order header with a zero grand total.
    ///
    /// Fails with [`StoreError::Conflict`] when the user already has an order
    /// under `idempotency_key`.
    async fn insert_order(
        &mut self,
        user_id: i32,
        date: DateTime<Utc>,
        idempotency_key: Option<&str>,
    ) -> StoreResult<Order>;

    /// Decrements stock only when at least `qty` is on hand, as a single
    /// store operation. Returns `false` when nothing was decremented.
    async fn decrement_stock(&mut self, product_id: i32, qty: i32) -> StoreResult<bool>;

    async fn insert_line(&mut self, line: &OrderLine) -> StoreResult<()>;

    async fn set_grand_total(&mut self, order_id: i32, grand_total: i64) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
