//! Live dashboard stream: one SSE connection per dashboard client.
//!
//! On connect the client receives a `connected` frame and an
//! `initial_orders` snapshot, then live `new_order` / `order_update`
//! frames as they happen, with `: heartbeat` comments every 30 seconds
//! to keep intermediaries from dropping idle connections. Dropping the
//! response body drops the broadcast receiver, so disconnected clients
//! unsubscribe themselves.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::events::StreamMessage;
use crate::AppState;

/// Subscribe to the live order stream
#[utoipa::path(
    get,
    path = "/api/orders/stream",
    responses((status = 200, description = "Server-sent event stream", content_type = "text/event-stream")),
    tag = "orders"
)]
pub async fn order_stream(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, ServiceError> {
    // Snapshot before subscribing would lose events committed in between;
    // subscribe first, then snapshot, and let the client merge duplicates.
    let rx = state.broadcaster.subscribe();
    let snapshot = state.services.orders.active_orders().await?;

    info!(
        subscribers = state.broadcaster.subscriber_count(),
        active_orders = snapshot.len(),
        "Dashboard client connected"
    );

    let greeting = stream::iter(vec![
        to_sse_event(StreamMessage::Connected {
            message: "SSE connection established".to_string(),
        }),
        to_sse_event(StreamMessage::InitialOrders { orders: snapshot }),
    ]);

    let live = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(message) => return Some((to_sse_event(message), rx)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Slow consumer: skip ahead rather than stall the hub.
                    warn!(skipped, "Dashboard subscriber lagged, skipping ahead");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    let heartbeat = Duration::from_secs(state.config.heartbeat_secs);
    Ok(Sse::new(greeting.chain(live))
        .keep_alive(KeepAlive::new().interval(heartbeat).text("heartbeat")))
}

fn to_sse_event(message: StreamMessage) -> Result<SseEvent, Infallible> {
    match serde_json::to_string(&message) {
        Ok(payload) => Ok(SseEvent::default().data(payload)),
        Err(e) => {
            warn!(error = %e, "Failed to serialize stream frame");
            Ok(SseEvent::default().data("{}"))
        }
    }
}
