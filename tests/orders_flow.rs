mod common;

use axum::http::{Method, StatusCode};
use common::{Fixture, get, post, send};
use serde_json::json;

fn three_line_order(user_id: i32, product_ids: &[i32]) -> serde_json::Value {
    json!({
        "user_id": user_id,
        "detail": product_ids
            .iter()
            .map(|id| json!({ "product_id": id, "qty": 1 }))
            .collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn order_decrements_stock_and_persists_lines() -> anyhow::Result<()> {
    let fx = Fixture::new([5, 5, 5]).await?;
    let ids: Vec<i32> = fx.products.iter().map(|p| p.id).collect();

    let (status, body) = post(&fx.app, "/order", three_line_order(fx.user.id, &ids)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "order created successfully");
    assert!(body.get("error").is_none());

    let data = &body["data"];
    assert_eq!(data["user_id"], fx.user.id);
    assert_eq!(data["grand_total"], 1000 + 2000 + 3000);
    let detail = data["detail"].as_array().expect("detail");
    assert_eq!(detail.len(), 3);
    for (line, product) in detail.iter().zip(&fx.products) {
        assert_eq!(line["product_id"], product.id);
        assert_eq!(line["qty"], 1);
        assert_eq!(line["sub_total"], product.price);
        assert_eq!(line["transaction_id"], data["id"]);
    }

    for product in &fx.products {
        assert_eq!(fx.stock(product.id).await?, 4);
    }

    let order_id = data["id"].as_i64().expect("order id");
    let (status, fetched) = get(&fx.app, &format!("/order?id={order_id}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["message"], "Success");
    assert_eq!(fetched["data"]["grand_total"], 6000);
    assert_eq!(fetched["data"]["detail"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn repeated_reads_return_identical_orders() -> anyhow::Result<()> {
    let fx = Fixture::new([3, 3, 3]).await?;
    let ids: Vec<i32> = fx.products.iter().map(|p| p.id).collect();
    let (_, created) = post(&fx.app, "/order", three_line_order(fx.user.id, &ids)).await?;
    let uri = format!("/order?id={}", created["data"]["id"]);

    let (_, first) = get(&fx.app, &uri).await?;
    let (_, second) = get(&fx.app, &uri).await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn insufficient_stock_leaves_no_trace() -> anyhow::Result<()> {
    let fx = Fixture::new([0, 5, 5]).await?;
    let ids: Vec<i32> = fx.products.iter().map(|p| p.id).collect();

    let (status, body) = post(&fx.app, "/order", three_line_order(fx.user.id, &ids)).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    assert_eq!(body["message"], "Internal Server Error");
    assert_eq!(body["data"], serde_json::Value::Null);
    assert_eq!(body["error"]["reason"], "insufficient_stock");
    assert_eq!(body["error"]["message"], "Internal Server Error");

    assert_eq!(fx.stock(ids[0]).await?, 0);
    assert_eq!(fx.stock(ids[1]).await?, 5);
    assert_eq!(fx.stock(ids[2]).await?, 5);

    let (status, body) = get(&fx.app, "/order?id=1").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Error fetching the transaction");
    Ok(())
}

#[tokio::test]
async fn stock_failure_on_a_later_line_rolls_back_earlier_lines() -> anyhow::Result<()> {
    let fx = Fixture::new([5, 5, 1]).await?;
    let body = json!({
        "user_id": fx.user.id,
        "detail": [
            { "product_id": fx.products[0].id, "qty": 2 },
            { "product_id": fx.products[1].id, "qty": 2 },
            { "product_id": fx.products[2].id, "qty": 2 },
        ],
    });

    let (status, _) = post(&fx.app, "/order", body).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(fx.stock(fx.products[0].id).await?, 5);
    assert_eq!(fx.stock(fx.products[1].id).await?, 5);
    assert_eq!(fx.stock(fx.products[2].id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_reported_before_products() -> anyhow::Result<()> {
    let fx = Fixture::new([1, 1, 1]).await?;

    let (status, body) = post(&fx.app, "/order", three_line_order(999, &[12345, 67890])).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User ID not found");
    assert_eq!(body["error"]["reason"], "not_found");
    assert_eq!(body["error"]["error_user_title"], "Not Found");

    for product in &fx.products {
        assert_eq!(fx.stock(product.id).await?, 1);
    }
    Ok(())
}

#[tokio::test]
async fn unknown_product_aborts_before_any_write() -> anyhow::Result<()> {
    let fx = Fixture::new([2, 2, 2]).await?;
    let ids = [fx.products[0].id, 4242, fx.products[2].id];

    let (status, body) = post(&fx.app, "/order", three_line_order(fx.user.id, &ids)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product ID not found");
    assert_eq!(fx.stock(fx.products[0].id).await?, 2);

    let (status, _) = get(&fx.app, "/order?id=1").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_orders_are_rejected() -> anyhow::Result<()> {
    let fx = Fixture::new([2, 2, 2]).await?;
    let pid = fx.products[0].id;

    let cases = [
        (json!({ "user_id": fx.user.id, "detail": [] }), "Invalid json structure"),
        (json!({ "user_id": fx.user.id }), "Invalid json structure"),
        (json!({ "user_id": 0, "detail": [{ "product_id": pid, "qty": 1 }] }), "Invalid json structure"),
        (json!({ "user_id": fx.user.id, "detail": [{ "product_id": pid, "qty": 0 }] }), "Invalid json structure"),
        (json!({ "user_id": fx.user.id, "detail": [{ "product_id": pid }] }), "Invalid json structure"),
        (json!({ "user_id": "one", "detail": [] }), "Error processing request"),
        (
            json!({ "user_id": fx.user.id, "detail": [
                { "product_id": pid, "qty": 1 },
                { "product_id": pid, "qty": 1 },
            ] }),
            "Duplicate product ID in detail",
        ),
    ];

    for (body, message) in cases {
        let (status, resp) = post(&fx.app, "/order", body.clone()).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(resp["message"], message, "body: {body}");
        assert_eq!(resp["error"]["message"], "Bad Request");
    }
    assert_eq!(fx.stock(pid).await?, 2);
    Ok(())
}

#[tokio::test]
async fn get_order_checks_the_id_parameter() -> anyhow::Result<()> {
    let fx = Fixture::new([1, 1, 1]).await?;

    let (status, body) = get(&fx.app, "/order").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Parameter ID not found");

    let (status, body) = get(&fx.app, "/order?id=a").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Parameter ID is not numeric");

    let (status, body) = get(&fx.app, "/order?id=77").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Error fetching the transaction");
    assert_eq!(
        body["error"],
        json!({
            "message": "Not Found",
            "reason": "not_found",
            "error_user_title": "Not Found",
            "error_user_msg": "Not Found",
        })
    );
    Ok(())
}

#[tokio::test]
async fn idempotency_key_replays_the_first_order() -> anyhow::Result<()> {
    let fx = Fixture::new([5, 5, 5]).await?;
    let order = json!({
        "user_id": fx.user.id,
        "detail": [{ "product_id": fx.products[0].id, "qty": 2 }],
    });
    let headers = [("Idempotency-Key", "checkout-1")];

    let (status, first) = send(&fx.app, Method::POST, "/order", Some(order.clone()), &headers).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, second) = send(&fx.app, Method::POST, "/order", Some(order.clone()), &headers).await?;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(second["data"]["grand_total"], 2000);
    assert_eq!(fx.stock(fx.products[0].id).await?, 3);

    // Without the key the same body is a new order.
    let (_, third) = post(&fx.app, "/order", order).await?;
    assert_ne!(third["data"]["id"], first["data"]["id"]);
    assert_eq!(fx.stock(fx.products[0].id).await?, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_never_oversell() -> anyhow::Result<()> {
    let fx = Fixture::new([5, 0, 0]).await?;
    let product_id = fx.products[0].id;
    let user_id = fx.user.id;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let app = fx.app.clone();
        handles.push(tokio::spawn(async move {
            let body = json!({ "user_id": user_id, "detail": [{ "product_id": product_id, "qty": 1 }] });
            post(&app, "/order", body).await.map(|(status, _)| status)
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        if handle.await?? == StatusCode::OK {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 5);
    assert_eq!(fx.stock(product_id).await?, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_submissions_with_one_key_share_an_order() -> anyhow::Result<()> {
    let fx = Fixture::new([50, 0, 0]).await?;
    let product_id = fx.products[0].id;
    let user_id = fx.user.id;

    for round in 0..10 {
        let key = format!("race-{round}");
        let mut handles = Vec::new();
        for _ in 0..8 {
            let app = fx.app.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                let body = json!({ "user_id": user_id, "detail": [{ "product_id": product_id, "qty": 1 }] });
                send(&app, Method::POST, "/order", Some(body), &[("Idempotency-Key", key.as_str())]).await
            }));
        }

        let mut order_ids = Vec::new();
        for handle in handles {
            let (status, body) = handle.await??;
            assert_eq!(status, StatusCode::OK, "round {round}: {body}");
            order_ids.push(body["data"]["id"].clone());
        }
        order_ids.dedup();
        assert_eq!(order_ids.len(), 1, "round {round} created several orders");
        assert_eq!(fx.stock(product_id).await?, 50 - (round + 1));
    }
    Ok(())
}
