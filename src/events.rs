//! In-process store notifications
//!
//! [`StoreEvents`] wraps a `tokio::sync::broadcast` channel so listing views
//! and loggers can react to mutations without the store knowing about them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::EquipmentRecord;

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 256;

/// Mutation that reached the storage medium
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    RecordSaved {
        record: Box<EquipmentRecord>,
        total: usize,
        at: DateTime<Utc>,
    },
    RecordDeleted {
        barcode: String,
        total: usize,
        at: DateTime<Utc>,
    },
    StoreCleared {
        at: DateTime<Utc>,
    },
}

/// Fan-out notification bus
pub struct StoreEvents {
    sender: broadcast::Sender<StoreEvent>,
}

impl StoreEvents {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers lose the oldest events and observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to all current subscribers; dropped when nobody listens.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for StoreEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_receives_the_event() {
        let bus = StoreEvents::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(StoreEvent::StoreCleared { at: Utc::now() });

        assert!(matches!(rx1.recv().await.unwrap(), StoreEvent::StoreCleared { .. }));
        assert!(matches!(rx2.recv().await.unwrap(), StoreEvent::StoreCleared { .. }));
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = StoreEvents::new(0);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(StoreEvent::RecordDeleted {
            barcode: "EQ1".into(),
            total: 0,
            at: Utc::now(),
        });
    }

    #[test]
    fn saved_event_serializes_with_a_type_tag() {
        let event = StoreEvent::RecordSaved {
            record: Box::new(EquipmentRecord::new("EQ1")),
            total: 1,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "record_saved");
        assert_eq!(json["record"]["barcode"], "EQ1");
    }
}
