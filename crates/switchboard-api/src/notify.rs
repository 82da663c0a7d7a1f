//! In-process publish hook for conversation events.
//!
//! Handlers emit after a successful write; whatever fans events out to
//! clients subscribes to the broadcast channel. Nothing here blocks or fails
//! the request that produced the event.

use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;

pub const EVENT_MESSAGE_NEW: &str = "message:new";
pub const EVENT_THREAD_NEW: &str = "thread:new";

pub trait Notifier: Send + Sync {
    fn emit(&self, channel: &str, payload: Value);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub channel: String,
    pub payload: Value,
}

/// Channel name events for an agent are published on.
pub fn agent_channel(agent_id: &str) -> String {
    format!("agent:{}", agent_id)
}

pub fn conversation_event(new_thread: bool, thread_id: &str, message_ids: &[&str]) -> Value {
    json!({
        "event": if new_thread { EVENT_THREAD_NEW } else { EVENT_MESSAGE_NEW },
        "threadId": thread_id,
        "messageIds": message_ids,
    })
}

#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn emit(&self, channel: &str, payload: Value) {
        let notification = Notification {
            channel: channel.to_string(),
            payload,
        };
        match self.sender.send(notification) {
            Ok(receivers) => tracing::debug!(channel, receivers, "notification published"),
            // No subscribers right now
            Err(_) => tracing::trace!(channel, "notification dropped"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn emit(&self, _channel: &str, _payload: Value) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let notifier = BroadcastNotifier::new(8);
        let mut rx = notifier.subscribe();

        notifier.emit(
            &agent_channel("a1"),
            conversation_event(true, "t1", &["m1", "m2"]),
        );

        let received = rx.recv().await.unwrap();
        assert_eq!(received.channel, "agent:a1");
        assert_eq!(received.payload["event"], "thread:new");
        assert_eq!(received.payload["threadId"], "t1");
        assert_eq!(received.payload["messageIds"][1], "m2");
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let notifier = BroadcastNotifier::new(1);
        notifier.emit("agent:a1", conversation_event(false, "t1", &[]));
        NoopNotifier.emit("agent:a1", Value::Null);
    }

    #[test]
    fn test_existing_thread_emits_message_event() {
        let payload = conversation_event(false, "t9", &["m1"]);
        assert_eq!(payload["event"], "message:new");
    }
}
