#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use catalog_order_service::{
    models::{NewProduct, NewUser, Product, User},
    routes::create_app,
    state::AppState,
    store::{CatalogStore, MemoryStore, UserStore},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Memory-backed fixture: one user and three products of one brand.
pub struct Fixture {
    pub store: MemoryStore,
    pub app: Router,
    pub user: User,
    pub products: Vec<Product>,
}

impl Fixture {
    pub async fn new(stock: [i32; 3]) -> anyhow::Result<Self> {
        let store = MemoryStore::new();
        let (user, products) = seed(&store, stock).await?;
        let app = create_app(AppState::with_store(store.clone(), TIMEOUT));
        Ok(Self {
            store,
            app,
            user,
            products,
        })
    }

    pub async fn stock(&self, product_id: i32) -> anyhow::Result<i32> {
        let product = self
            .store
            .get_product(product_id)
            .await?
            .expect("product exists");
        Ok(product.qty)
    }
}

pub async fn seed(store: &MemoryStore, stock: [i32; 3]) -> anyhow::Result<(User, Vec<Product>)> {
    let user = store
        .create_user(NewUser {
            name: "Ferris".into(),
            email: "ferris@example.com".into(),
            address: "1 Crab Lane".into(),
        })
        .await?;
    let brand = store.create_brand("Rustacean Wear".into()).await?;

    let mut products = Vec::new();
    for (i, qty) in stock.into_iter().enumerate() {
        let product = store
            .create_product(NewProduct {
                brand_id: brand.id,
                name: format!("Item {}", i + 1),
                qty,
                price: 1000 * (i as i64 + 1),
            })
            .await?;
        products.push(product);
    }
    Ok((user, products))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let json = serde_json::from_slice(&bytes)?;
    Ok((status, json))
}

pub async fn get(app: &Router, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::GET, uri, None, &[]).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::POST, uri, Some(body), &[]).await
}
