mod common;

use std::time::Duration;

use axum::http::{header, Method, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;

use common::{order_payload, TestApp};
use seblak_api::events::StreamMessage;

/// Reads SSE frames off the response body until `needle` shows up or the
/// timeout hits. The stream itself never ends, so this never reads to EOF.
async fn read_until(body: &mut axum::body::Body, needle: &str) -> String {
    let mut text = String::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);

    while !text.contains(needle) {
        let frame = tokio::time::timeout_at(deadline, body.frame())
            .await
            .expect("frame before timeout")
            .expect("stream still open")
            .expect("frame read");
        if let Ok(data) = frame.into_data() {
            text.push_str(std::str::from_utf8(&data).expect("utf-8 frame"));
        }
    }
    text
}

#[tokio::test]
async fn stream_greets_then_snapshots_active_orders() {
    let app = TestApp::new().await;

    // Two active orders that must appear in the snapshot.
    for (name, dining) in [("Budi", "Dine-in"), ("Sari", "Takeaway")] {
        let (status, _) = app
            .request_json(
                Method::POST,
                "/api/orders",
                Some(order_payload(name, dining, "CASH")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let response = app.request(Method::GET, "/api/orders/stream", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/event-stream"), "{content_type}");

    let mut body = response.into_body();
    let text = read_until(&mut body, "initial_orders").await;

    // Greeting frame first, snapshot second, both as `data:` lines.
    let connected_at = text.find("SSE connection established").expect("greeting frame");
    let snapshot_at = text.find("initial_orders").expect("snapshot frame");
    assert!(connected_at < snapshot_at, "{text}");
    assert!(text.contains("data:"), "{text}");

    // The snapshot lists active orders newest first.
    let tak = text.find("TAK-001").expect("takeaway order in snapshot");
    let dia = text.find("DIA-001").expect("dine-in order in snapshot");
    assert!(tak < dia, "newest order should come first: {text}");
}

#[tokio::test]
async fn completed_orders_stay_out_of_the_snapshot() {
    let app = TestApp::new().await;

    let (_, created) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    for next in ["PREPARING", "READY", "COMPLETED"] {
        app.request_json(
            Method::PATCH,
            &format!("/api/orders/{id}/status"),
            Some(serde_json::json!({"status": next})),
        )
        .await;
    }
    app.request_json(
        Method::POST,
        "/api/orders",
        Some(order_payload("Sari", "Dine-in", "CASH")),
    )
    .await;

    let response = app.request(Method::GET, "/api/orders/stream", None).await;
    let mut body = response.into_body();
    let text = read_until(&mut body, "initial_orders").await;

    let snapshot = &text[text.find("initial_orders").unwrap()..];
    assert!(snapshot.contains("DIA-002"), "{snapshot}");
    assert!(!snapshot.contains("DIA-001"), "{snapshot}");
}

#[tokio::test]
async fn mutations_fan_out_to_subscribers() {
    let app = TestApp::new().await;
    let mut rx = app.state.broadcaster.subscribe();

    let (_, created) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("broadcast before timeout")
        .expect("channel open");
    match message {
        StreamMessage::NewOrder { order } => {
            assert_eq!(order.queue_number, "DIA-001");
            assert_eq!(order.status, "PENDING");
        }
        other => panic!("expected new_order frame, got {other:?}"),
    }

    app.request_json(
        Method::PATCH,
        &format!("/api/orders/{id}/status"),
        Some(serde_json::json!({"status": "PREPARING"})),
    )
    .await;

    let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("broadcast before timeout")
        .expect("channel open");
    match message {
        StreamMessage::OrderUpdate { order } => {
            assert_eq!(order.queue_number, "DIA-001");
            assert_eq!(order.status, "PREPARING");
        }
        other => panic!("expected order_update frame, got {other:?}"),
    }
}

#[tokio::test]
async fn update_frames_carry_only_the_delta() {
    let app = TestApp::new().await;
    let mut rx = app.state.broadcaster.subscribe();

    let (_, created) = app
        .request_json(
            Method::POST,
            "/api/orders",
            Some(order_payload("Budi", "Dine-in", "CASH")),
        )
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    app.request_json(
        Method::PATCH,
        &format!("/api/orders/{id}/void"),
        Some(serde_json::json!({})),
    )
    .await;

    // Skip the new_order frame, then inspect the void's wire shape.
    let _ = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("broadcast before timeout")
        .expect("channel open");
    let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("broadcast before timeout")
        .expect("channel open");

    let frame: Value = serde_json::to_value(&message).expect("serialize frame");
    assert_eq!(frame["type"], "order_update");
    assert_eq!(frame["order"]["queueNumber"], "DIA-001");
    assert_eq!(frame["order"]["status"], "CANCELLED");
    assert!(frame["order"].get("customerName").is_none());
}
