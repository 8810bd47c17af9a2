use std::{net::SocketAddr, sync::Arc};

use tokio::{signal, sync::mpsc};
use tracing::{error, info};

use seblak_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);

    // Init DB
    let db_pool = api::db::establish_connection(&cfg.database_url).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }
    let db_arc = Arc::new(db_pool);

    // Init events: mpsc from the services, broadcast fan-out to SSE clients
    let broadcaster = Arc::new(api::events::OrderBroadcaster::new(
        cfg.event_channel_capacity,
    ));
    let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
    let event_sender = api::events::EventSender::new(event_tx);
    tokio::spawn(api::events::process_events(event_rx, broadcaster.clone()));

    // Aggregate app services used by HTTP handlers
    let services = api::services::AppServices::new(
        db_arc.clone(),
        Arc::new(event_sender.clone()),
        cfg.session_ttl(),
    );

    // Seed the back-office account so the dashboard is reachable on first boot
    services
        .auth
        .ensure_default_admin(&cfg.admin_username, &cfg.admin_password)
        .await?;

    let host = cfg.host.clone();
    let port = cfg.port;

    let app_state = api::AppState {
        db: db_arc,
        config: cfg,
        event_sender,
        broadcaster,
        services,
    };

    let app = api::app_router(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("seblak-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
