use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Facts broadcast to live viewers after the producing transaction commits.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    NumberDrawn {
        event_id: Uuid,
        round: i16,
        number: i16,
        draw_order: i32,
        drawn_at: DateTime<Utc>,
    },
    BingoClaimed {
        event_id: Uuid,
        subcard_id: Uuid,
        claimed_by: Option<Uuid>,
        validated_at: DateTime<Utc>,
    },
}

/// At-most-once, best-effort fan-out. Callers publish only after commit;
/// delivery failure never affects the state change that produced the fact.
#[derive(Clone)]
pub struct NotificationPublisher {
    sender: broadcast::Sender<Notification>,
}

impl NotificationPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Fire-and-forget. A send with no live subscribers is normal.
    pub fn publish(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            log::debug!("Notification dropped: no subscribers");
        }
    }

    /// Subscription point for live transports (SSE/websocket gateways).
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_does_not_panic() {
        let publisher = NotificationPublisher::new(8);
        publisher.publish(Notification::NumberDrawn {
            event_id: Uuid::new_v4(),
            round: 1,
            number: 42,
            draw_order: 1,
            drawn_at: Utc::now(),
        });
    }

    #[test]
    fn test_subscriber_receives_published_fact() {
        let publisher = NotificationPublisher::new(8);
        let mut rx = publisher.subscribe();

        let event_id = Uuid::new_v4();
        publisher.publish(Notification::NumberDrawn {
            event_id,
            round: 2,
            number: 7,
            draw_order: 3,
            drawn_at: Utc::now(),
        });

        match rx.try_recv().unwrap() {
            Notification::NumberDrawn { event_id: id, number, draw_order, .. } => {
                assert_eq!(id, event_id);
                assert_eq!(number, 7);
                assert_eq!(draw_order, 3);
            }
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    #[test]
    fn test_notification_serializes_with_type_tag() {
        let n = Notification::BingoClaimed {
            event_id: Uuid::nil(),
            subcard_id: Uuid::nil(),
            claimed_by: None,
            validated_at: Utc::now(),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "bingo_claimed");
    }
}
