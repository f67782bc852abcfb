use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    models::{Brand, NewProduct, NewUser, Order, OrderLine, Product, User},
    store::{CatalogStore, OrderStore, StoreError, StoreResult, UnitOfWork, UserStore},
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    brands: BTreeMap<i32, Brand>,
    products: BTreeMap<i32, Product>,
    orders: BTreeMap<i32, Order>,
    lines: Vec<OrderLine>,
    idempotency_keys: HashMap<(i32, String), i32>,
    last_user_id: i32,
    last_brand_id: i32,
    last_product_id: i32,
    last_order_id: i32,
}

/// In-process backend for tests and local runs.
///
/// A unit of work holds the table lock until it finishes, so readers never
/// see an order that has not been committed.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;
        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            name: user.name,
            email: user.email,
            address: user.address,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get_brand(&self, id: i32) -> StoreResult<Option<Brand>> {
        Ok(self.tables.lock().await.brands.get(&id).cloned())
    }

    async fn create_brand(&self, name: String) -> StoreResult<Brand> {
        let mut tables = self.tables.lock().await;
        tables.last_brand_id += 1;
        let brand = Brand {
            id: tables.last_brand_id,
            name,
        };
        tables.brands.insert(brand.id, brand.clone());
        Ok(brand)
    }

    async fn get_product(&self, id: i32) -> StoreResult<Option<Product>> {
        Ok(self.tables.lock().await.products.get(&id).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
        let mut tables = self.tables.lock().await;
        tables.last_product_id += 1;
        let product = Product {
            id: tables.last_product_id,
            brand_id: product.brand_id,
            name: product.name,
            qty: product.qty,
            price: product.price,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn products_by_brand(&self, brand_id: i32) -> StoreResult<Vec<Product>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .products
            .values()
            .filter(|p| p.brand_id == brand_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get_order(&self, id: i32) -> StoreResult<Option<Order>> {
        Ok(self.tables.lock().await.orders.get(&id).cloned())
    }

    async fn get_order_lines(&self, order_id: i32) -> StoreResult<Vec<OrderLine>> {
        let tables = self.tables.lock().await;
        let mut lines: Vec<OrderLine> = tables
            .lines
            .iter()
            .filter(|l| l.transaction_id == order_id)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.product_id);
        Ok(lines)
    }

    async fn find_by_idempotency_key(
        &self,
        user_id: i32,
        key: &str,
    ) -> StoreResult<Option<Order>> {
        let tables = self.tables.lock().await;
        let order = tables
            .idempotency_keys
            .get(&(user_id, key.to_owned()))
            .and_then(|id| tables.orders.get(id))
            .cloned();
        Ok(order)
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let guard = self.tables.clone().lock_owned().await;
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            undo: Vec::new(),
        }))
    }
}

/// Inverse of one write made through a [`MemoryUnitOfWork`].
#[derive(Debug)]
enum Undo {
    Order {
        id: i32,
        idempotency_key: Option<(i32, String)>,
    },
    Stock {
        product_id: i32,
        qty: i32,
    },
    Line,
    GrandTotal {
        order_id: i32,
        previous: i64,
    },
}

/// Writes straight into the locked tables and records how to revert each
/// one. The log is replayed backwards unless the unit of work commits.
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    undo: Vec<Undo>,
}

impl MemoryUnitOfWork {
    fn revert(&mut self) {
        let tables = &mut *self.guard;
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::Order {
                    id,
                    idempotency_key,
                } => {
                    tables.orders.remove(&id);
                    if let Some(key) = idempotency_key {
                        tables.idempotency_keys.remove(&key);
                    }
                }
                Undo::Stock { product_id, qty } => {
                    if let Some(product) = tables.products.get_mut(&product_id) {
                        product.qty += qty;
                    }
                }
                Undo::Line => {
                    tables.lines.pop();
                }
                Undo::GrandTotal { order_id, previous } => {
                    if let Some(order) = tables.orders.get_mut(&order_id) {
                        order.grand_total = previous;
                    }
                }
            }
        }
    }
}

impl Drop for MemoryUnitOfWork {
    fn drop(&mut self) {
        if !self.undo.is_empty() {
            tracing::debug!(steps = self.undo.len(), "discarding uncommitted memory writes");
            self.revert();
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert_order(
        &mut self,
        user_id: i32,
        date: DateTime<Utc>,
        idempotency_key: Option<&str>,
    ) -> StoreResult<Order> {
        let tables = &mut *self.guard;
        let key = idempotency_key.map(|key| (user_id, key.to_owned()));
        if let Some(key) = &key {
            if tables.idempotency_keys.contains_key(key) {
                return Err(StoreError::Conflict);
            }
        }

        // Ids are not reused after a rollback, as with a database sequence.
        tables.last_order_id += 1;
        let order = Order {
            id: tables.last_order_id,
            user_id,
            date,
            grand_total: 0,
        };
        tables.orders.insert(order.id, order.clone());
        if let Some(key) = &key {
            tables.idempotency_keys.insert(key.clone(), order.id);
        }
        self.undo.push(Undo::Order {
            id: order.id,
            idempotency_key: key,
        });
        Ok(order)
    }

    async fn decrement_stock(&mut self, product_id: i32, qty: i32) -> StoreResult<bool> {
        match self.guard.products.get_mut(&product_id) {
            Some(product) if product.qty >= qty => {
                product.qty -= qty;
                self.undo.push(Undo::Stock { product_id, qty });
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_line(&mut self, line: &OrderLine) -> StoreResult<()> {
        let duplicate = self.guard.lines.iter().any(|l| {
            l.transaction_id == line.transaction_id && l.product_id == line.product_id
        });
        if duplicate {
            return Err(StoreError::Conflict);
        }
        self.guard.lines.push(line.clone());
        self.undo.push(Undo::Line);
        Ok(())
    }

    async fn set_grand_total(&mut self, order_id: i32, grand_total: i64) -> StoreResult<()> {
        if let Some(order) = self.guard.orders.get_mut(&order_id) {
            let previous = std::mem::replace(&mut order.grand_total, grand_total);
            self.undo.push(Undo::GrandTotal { order_id, previous });
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let mut this = self;
        this.undo.clear();
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        let mut this = self;
        this.revert();
        Ok(())
    }
}
