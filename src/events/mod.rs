use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

pub mod broadcaster;

pub use broadcaster::{OrderBroadcaster, StreamMessage};

use crate::services::orders::OrderResponse;

/// Minimal status-change payload pushed to dashboard subscribers.
/// The dashboard already holds the full order from the initial snapshot
/// or a `new_order` frame, so updates only carry what changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDelta {
    pub id: Uuid,
    pub queue_number: String,
    pub status: String,
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A new order was accepted, full payload included.
    OrderCreated(OrderResponse),
    /// An order changed status (including void and cancel).
    OrderUpdated(OrderDelta),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Forwards domain events to the live-dashboard broadcaster.
///
/// All mutations funnel through the single mpsc channel, so subscribers
/// observe events in the order the handlers committed them.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, broadcaster: Arc<OrderBroadcaster>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::OrderCreated(order) => {
                info!(order_id = %order.id, queue_number = %order.queue_number, "Order created");
                broadcaster.publish(StreamMessage::NewOrder { order });
            }
            Event::OrderUpdated(delta) => {
                info!(order_id = %delta.id, status = %delta.status, "Order updated");
                broadcaster.publish(StreamMessage::OrderUpdate { order: delta });
            }
        }
    }

    warn!("Event channel closed, stopping event processing loop");
}
