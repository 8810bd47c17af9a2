use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use seblak_api::{
    config::AppConfig,
    db::{self, DbConfig},
    events::{self, EventSender, OrderBroadcaster},
    services::AppServices,
    AppState,
};

/// Test harness backed by an in-memory SQLite database. Each instance gets
/// its own database, so tests never see each other's rows.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 18_080,
        environment: "test".into(),
        log_level: "info".into(),
        log_json: false,
        auto_migrate: true,
        event_channel_capacity: 64,
        heartbeat_secs: 30,
        session_ttl_secs: 3_600,
        admin_username: "admin".into(),
        admin_password: "tehimas123".into(),
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let cfg = test_config();

        // In-memory SQLite exists per connection; a single pooled
        // connection keeps every query on the same database.
        let db_config = DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        let db_arc = Arc::new(pool);

        let broadcaster = Arc::new(OrderBroadcaster::new(cfg.event_channel_capacity));
        let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx, broadcaster.clone()));

        let services = AppServices::new(
            db_arc.clone(),
            Arc::new(event_sender.clone()),
            cfg.session_ttl(),
        );
        services
            .auth
            .ensure_default_admin(&cfg.admin_username, &cfg.admin_password)
            .await
            .expect("failed to seed admin account");

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            broadcaster,
            services,
        };
        let router = seblak_api::app_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails")
    }

    /// Like `request` but with a `Cookie` header attached.
    #[allow(dead_code)]
    pub async fn request_with_cookie(
        &self,
        method: Method,
        uri: &str,
        cookie: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails")
    }

    /// Sends a request and parses the JSON body.
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, read_json(response).await)
    }
}

/// Standard one-bowl-one-drink order. Total works out to 25_000 when the
/// client total is omitted (15_000 bowl + 2 * 5_000 drink).
#[allow(dead_code)]
pub fn order_payload(customer: &str, dining_option: &str, payment_method: &str) -> Value {
    serde_json::json!({
        "customerName": customer,
        "diningOption": dining_option,
        "paymentMethod": payment_method,
        "bowls": [
            {
                "levelPedas": "Level 3",
                "kuah": "Banyak",
                "rasa": "Original",
                "telur": "Telur Utuh",
                "sayur": "Sawi",
                "toppings": ["Bakso", "Ceker"],
                "price": 15_000
            }
        ],
        "drinks": [
            { "name": "Es Teh", "quantity": 2, "price": 5_000 }
        ]
    })
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}
