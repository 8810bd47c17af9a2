mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Local};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

use common::{order_payload, TestApp};
use seblak_api::entities::queue_counter;

#[tokio::test]
async fn create_order_assigns_first_dine_in_queue_number() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Order created with queue number DIA-001"
    );

    let order = &body["data"];
    assert_eq!(order["queueNumber"], "DIA-001");
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["diningOption"], "DINE_IN");
    assert_eq!(order["paymentMethod"], "CASH");
    // Client omitted the total, so it is recomputed from the cart.
    assert_eq!(order["totalPrice"], 25_000);
    assert_eq!(order["items"].as_array().unwrap().len(), 1);
    assert_eq!(order["items"][0]["toppings"], json!(["Bakso", "Ceker"]));
    assert_eq!(order["drinks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn queue_numbers_are_contiguous_and_per_channel() {
    let app = TestApp::new().await;

    for expected in ["DIA-001", "DIA-002", "DIA-003"] {
        let (status, body) = app
            .request_json(
                Method::POST,
                "/api/orders",
                Some(order_payload("Budi", "Dine-in", "CASH")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["queueNumber"], expected);
    }

    // The takeaway sequence is independent of dine-in.
    for expected in ["TAK-001", "TAK-002"] {
        let (status, body) = app
            .request_json(
                Method::POST,
                "/api/orders",
                Some(order_payload("Sari", "Takeaway", "TRANSFER")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["queueNumber"], expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_submissions_get_distinct_queue_numbers() {
    let app = std::sync::Arc::new(TestApp::new().await);

    let mut handles = Vec::new();
    for i in 0..12 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let (status, body) = app
                .request_json(
                    Method::POST,
                    "/api/orders",
                    Some(order_payload(&format!("Pelanggan {}", i), "Dine-in", "CASH")),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
            body["data"]["queueNumber"]
                .as_str()
                .expect("queue number is a string")
                .to_string()
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.expect("submission task panicked"));
    }
    numbers.sort();

    // No duplicates, no gaps, regardless of interleaving.
    let expected: Vec<String> = (1..=12).map(|n| format!("DIA-{:03}", n)).collect();
    assert_eq!(numbers, expected);
}

#[tokio::test]
async fn health_endpoint_reports_database_status() {
    let app = TestApp::new().await;

    let (status, body) = app.request_json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["checks"]["database"], "healthy");
}

#[tokio::test]
async fn queue_counter_resets_on_a_new_day() {
    let app = TestApp::new().await;

    let (_, body) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;
    assert_eq!(body["data"]["queueNumber"], "DIA-001");

    // Backdate the counter row as if the last order was yesterday.
    let counter = queue_counter::Entity::find_by_id("default")
        .one(&*app.state.db)
        .await
        .expect("query counter")
        .expect("counter row exists after first order");
    let yesterday = (Local::now().date_naive() - Duration::days(1)).to_string();
    let mut active: queue_counter::ActiveModel = counter.into();
    active.date = Set(yesterday);
    active.dine_in = Set(57);
    active.takeaway = Set(12);
    active.update(&*app.state.db).await.expect("backdate counter");

    // First allocation of the "new day" starts over from 1 on both channels.
    let (_, body) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;
    assert_eq!(body["data"]["queueNumber"], "DIA-001");

    let (_, body) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Sari", "Takeaway", "CASH")),
        )
        .await;
    assert_eq!(body["data"]["queueNumber"], "TAK-001");
}

#[tokio::test]
async fn rejects_order_with_empty_cart() {
    let app = TestApp::new().await;

    let payload = json!({
        "customerName": "Budi",
        "diningOption": "Dine-in",
        "paymentMethod": "CASH",
        "bowls": [],
        "drinks": []
    });
    let (status, body) = app
        .request_json(Method::POST, "/api/orders", Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Validation error: Order must have at least one item"
    );
}

#[tokio::test]
async fn rejects_unknown_dining_option_and_payment_method() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "delivery", "CASH")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Invalid dining option: delivery"),
        "{body}"
    );

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "qris")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Invalid payment method: qris"),
        "{body}"
    );
}

#[tokio::test]
async fn rejects_blank_customer_name() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("", "Dine-in", "CASH")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn closed_store_blocks_new_orders() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request_json(Method::PATCH, "/api/settings", Some(json!({"isOpen": false})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Store is currently closed and not accepting new orders"
    );

    // Reopen and the same order goes through.
    app.request_json(Method::PATCH, "/api/settings", Some(json!({"isOpen": true})))
        .await;
    let (status, _) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn client_supplied_total_wins_over_cart_total() {
    let app = TestApp::new().await;

    let mut payload = order_payload("Budi", "Dine-in", "CASH");
    payload["totalPrice"] = json!(99_000);

    let (_, body) = app
        .request_json(Method::POST, "/api/orders", Some(payload))
        .await;
    assert_eq!(body["data"]["totalPrice"], 99_000);
}

#[tokio::test]
async fn get_order_returns_detail_or_404() {
    let app = TestApp::new().await;

    let (_, created) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request_json(Method::GET, &format!("/api/orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["queueNumber"], "DIA-001");
    assert_eq!(body["data"]["customerName"], "Budi");

    let (status, body) = app
        .request_json(
            Method::GET,
            &format!("/api/orders/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found: Order not found");
}

#[tokio::test]
async fn list_orders_filters_by_status() {
    let app = TestApp::new().await;

    let (_, first) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;
    app.request_json(
        Method::POST,
        "/api/orders",
        Some(order_payload("Sari", "Takeaway", "CASH")),
    )
    .await;

    let first_id = first["data"]["id"].as_str().unwrap().to_string();
    app.request_json(
        Method::PATCH,
        &format!("/api/orders/{first_id}/status"),
        Some(json!({"status": "PREPARING"})),
    )
    .await;

    let (status, body) = app
        .request_json(Method::GET, "/api/orders?status=PREPARING", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["queueNumber"], "DIA-001");

    let (status, body) = app
        .request_json(Method::GET, "/api/orders?status=FRIED", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"].as_str().unwrap().contains("Invalid status"),
        "{body}"
    );
}

#[tokio::test]
async fn list_orders_is_newest_first() {
    let app = TestApp::new().await;

    for name in ["Budi", "Sari", "Dewi"] {
        app.request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload(name, "Dine-in", "CASH")),
        )
        .await;
    }

    let (_, body) = app.request_json(Method::GET, "/api/orders", None).await;
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0]["customerName"], "Dewi");
    assert_eq!(orders[2]["customerName"], "Budi");
}
