//! Fan-out of order events to connected dashboard streams.
//!
//! Single-process only: every SSE subscriber holds a receiver on one
//! `tokio::sync::broadcast` channel. Running multiple replicas would
//! require an external pub/sub bus in front of this.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use super::OrderDelta;
use crate::services::orders::OrderResponse;

/// Wire frames sent over the dashboard SSE stream, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// First frame on every new connection.
    Connected { message: String },
    /// Snapshot of all active orders, sent right after `connected`.
    InitialOrders { orders: Vec<OrderResponse> },
    NewOrder { order: OrderResponse },
    OrderUpdate { order: OrderDelta },
}

/// Broadcast hub for dashboard subscribers.
///
/// Slow subscribers lag rather than block publishers; a lagged receiver
/// skips ahead and keeps streaming, which is acceptable for a dashboard
/// that gets a full snapshot on reconnect.
#[derive(Debug)]
pub struct OrderBroadcaster {
    tx: broadcast::Sender<StreamMessage>,
}

impl OrderBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StreamMessage> {
        self.tx.subscribe()
    }

    /// Publishes to all current subscribers. A send error only means
    /// nobody is connected, which is not a failure.
    pub fn publish(&self, message: StreamMessage) {
        match self.tx.send(message) {
            Ok(n) => debug!(subscribers = n, "Broadcast stream message"),
            Err(_) => debug!("No dashboard subscribers connected, message dropped"),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_all_subscribers() {
        let hub = OrderBroadcaster::new(16);
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        hub.publish(StreamMessage::Connected {
            message: "hi".into(),
        });

        for rx in [&mut a, &mut b] {
            match rx.recv().await.unwrap() {
                StreamMessage::Connected { message } => assert_eq!(message, "hi"),
                other => panic!("unexpected frame: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_noop() {
        let hub = OrderBroadcaster::new(16);
        assert_eq!(hub.subscriber_count(), 0);
        hub.publish(StreamMessage::Connected {
            message: "nobody home".into(),
        });
    }

    #[test]
    fn frames_serialize_with_type_tag() {
        let json = serde_json::to_value(StreamMessage::Connected {
            message: "ok".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "connected");
        assert_eq!(json["message"], "ok");
    }
}
