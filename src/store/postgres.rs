use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::{
    entity::{
        brands::{ActiveModel as BrandActive, Entity as Brands, Model as BrandModel},
        products::{
            ActiveModel as ProductActive, Column as ProdCol, Entity as Products,
            Model as ProductModel,
        },
        transaction_detail::{
            ActiveModel as LineActive, Column as LineCol, Entity as TransactionDetail,
            Model as LineModel,
        },
        transactions::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Transactions,
            Model as OrderModel,
        },
        users::{ActiveModel as UserActive, Entity as Users, Model as UserModel},
    },
    models::{Brand, NewProduct, NewUser, Order, OrderLine, Product, User},
    store::{CatalogStore, OrderStore, StoreError, StoreResult, UnitOfWork, UserStore},
};

/// Relational backend on PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    orm: DatabaseConnection,
}

impl PgStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.orm
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_user(&self, id: i32) -> StoreResult<Option<User>> {
        let user = Users::find_by_id(id).one(&self.orm).await?;
        Ok(user.map(user_from_entity))
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let user = UserActive {
            id: NotSet,
            name: Set(user.name),
            email: Set(user.email),
            address: Set(user.address),
        }
        .insert(&self.orm)
        .await?;
        Ok(user_from_entity(user))
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn get_brand(&self, id: i32) -> StoreResult<Option<Brand>> {
        let brand = Brands::find_by_id(id).one(&self.orm).await?;
        Ok(brand.map(brand_from_entity))
    }

    async fn create_brand(&self, name: String) -> StoreResult<Brand> {
        let brand = BrandActive {
            id: NotSet,
            name: Set(name),
        }
        .insert(&self.orm)
        .await?;
        Ok(brand_from_entity(brand))
    }

    async fn get_product(&self, id: i32) -> StoreResult<Option<Product>> {
        let product = Products::find_by_id(id).one(&self.orm).await?;
        Ok(product.map(product_from_entity))
    }

    async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
        let product = ProductActive {
            id: NotSet,
            brand_id: Set(product.brand_id),
            name: Set(product.name),
            qty: Set(product.qty),
            price: Set(product.price),
        }
        .insert(&self.orm)
        .await?;
        Ok(product_from_entity(product))
    }

    async fn products_by_brand(&self, brand_id: i32) -> StoreResult<Vec<Product>> {
        let products = Products::find()
            .filter(ProdCol::BrandId.eq(brand_id))
            .order_by_asc(ProdCol::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(products)
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn get_order(&self, id: i32) -> StoreResult<Option<Order>> {
        let order = Transactions::find_by_id(id).one(&self.orm).await?;
        Ok(order.map(order_from_entity))
    }

    async fn get_order_lines(&self, order_id: i32) -> StoreResult<Vec<OrderLine>> {
        // Primary key order is (transaction_id, product_id); insertion order is
        // not recoverable from the table, so lines come back by product id.
        let lines = TransactionDetail::find()
            .filter(LineCol::TransactionId.eq(order_id))
            .order_by_asc(LineCol::ProductId)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(line_from_entity)
            .collect();
        Ok(lines)
    }

    async fn find_by_idempotency_key(
        &self,
        user_id: i32,
        key: &str,
    ) -> StoreResult<Option<Order>> {
        let order = Transactions::find()
            .filter(OrderCol::UserId.eq(user_id))
            .filter(OrderCol::IdempotencyKey.eq(key))
            .one(&self.orm)
            .await?;
        Ok(order.map(order_from_entity))
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let txn = self.orm.begin().await?;
        Ok(Box::new(PgUnitOfWork { txn }))
    }
}

/// A unit of work backed by one database transaction. Dropping it without a
/// commit rolls the transaction back.
pub struct PgUnitOfWork {
    txn: DatabaseTransaction,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert_order(
        &mut self,
        user_id: i32,
        date: DateTime<Utc>,
        idempotency_key: Option<&str>,
    ) -> StoreResult<Order> {
        let order = OrderActive {
            id: NotSet,
            user_id: Set(user_id),
            date: Set(date.into()),
            grand_total: Set(0),
            idempotency_key: Set(idempotency_key.map(str::to_owned)),
        }
        .insert(&self.txn)
        .await
        .map_err(conflict_or_db)?;
        Ok(order_from_entity(order))
    }

    async fn decrement_stock(&mut self, product_id: i32, qty: i32) -> StoreResult<bool> {
        let result = Products::update_many()
            .col_expr(ProdCol::Qty, Expr::col(ProdCol::Qty).sub(qty))
            .filter(ProdCol::Id.eq(product_id))
            .filter(ProdCol::Qty.gte(qty))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn insert_line(&mut self, line: &OrderLine) -> StoreResult<()> {
        let active = LineActive {
            transaction_id: Set(line.transaction_id),
            product_id: Set(line.product_id),
            qty: Set(line.qty),
            sub_total: Set(line.sub_total),
        };
        TransactionDetail::insert(active)
            .exec_without_returning(&self.txn)
            .await?;
        Ok(())
    }

    async fn set_grand_total(&mut self, order_id: i32, grand_total: i64) -> StoreResult<()> {
        Transactions::update_many()
            .col_expr(OrderCol::GrandTotal, Expr::value(grand_total))
            .filter(OrderCol::Id.eq(order_id))
            .exec(&self.txn)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.txn.rollback().await?;
        Ok(())
    }
}

fn conflict_or_db(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Conflict,
        _ => StoreError::Db(err),
    }
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        address: model.address,
    }
}

fn brand_from_entity(model: BrandModel) -> Brand {
    Brand {
        id: model.id,
        name: model.name,
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        brand_id: model.brand_id,
        name: model.name,
        qty: model.qty,
        price: model.price,
    }
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        date: model.date.with_timezone(&Utc),
        grand_total: model.grand_total,
    }
}

fn line_from_entity(model: LineModel) -> OrderLine {
    OrderLine {
        transaction_id: model.transaction_id,
        product_id: model.product_id,
        qty: model.qty,
        sub_total: model.sub_total,
    }
}
