//! Fan-out of push events from the socket service to interested sessions.
//!
//! The transport itself lives outside this crate; it hands each raw
//! `(event, json)` frame to [`RealtimeHub::publish_raw`].

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::{debug, warn};

use crate::error::RealtimeError;
use crate::models::IncomingMessage;

pub const MESSAGE_RECEIVED: &str = "message_received";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealtimeEvent {
    MessageReceived(IncomingMessage),
}

impl RealtimeEvent {
    pub fn decode(event: &str, payload: &str) -> Result<Self, RealtimeError> {
        match event {
            MESSAGE_RECEIVED => serde_json::from_str(payload)
                .map(RealtimeEvent::MessageReceived)
                .map_err(|source| RealtimeError::MalformedPayload {
                    event: event.to_string(),
                    source,
                }),
            other => Err(RealtimeError::UnknownEvent(other.to_string())),
        }
    }
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    senders: HashMap<u64, Sender<RealtimeEvent>>,
}

fn lock(inner: &Mutex<Subscribers>) -> MutexGuard<'_, Subscribers> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone, Default)]
pub struct RealtimeHub {
    inner: Arc<Mutex<Subscribers>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener. Dropping the handle unsubscribes it.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut subscribers = lock(&self.inner);
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.senders.insert(id, tx);
        debug!("realtime subscriber {id} registered");
        Subscription {
            id,
            rx,
            hub: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).senders.len()
    }

    /// Delivers `event` to every live subscriber and returns how many got it.
    pub fn publish(&self, event: RealtimeEvent) -> usize {
        let mut subscribers = lock(&self.inner);
        subscribers
            .senders
            .retain(|id, tx| match tx.send(event.clone()) {
                Ok(()) => true,
                Err(_) => {
                    warn!("realtime subscriber {id} hung up without unsubscribing");
                    false
                }
            });
        subscribers.senders.len()
    }

    pub fn publish_raw(&self, event: &str, payload: &str) -> Result<usize, RealtimeError> {
        let decoded = RealtimeEvent::decode(event, payload)?;
        Ok(self.publish(decoded))
    }
}

pub struct Subscription {
    id: u64,
    rx: Receiver<RealtimeEvent>,
    hub: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn try_recv(&self) -> Option<RealtimeEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            lock(&inner).senders.remove(&self.id);
            debug!("realtime subscriber {} unsubscribed", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const PAYLOAD: &str =
        r#"{"conversation":"c1","content":"here","createdAt":"2024-05-01T12:00:05Z","sender":"u2"}"#;

    #[test]
    fn decodes_message_received() {
        let event = RealtimeEvent::decode(MESSAGE_RECEIVED, PAYLOAD).expect("decode");
        let RealtimeEvent::MessageReceived(message) = event;
        assert_eq!(message.conversation, "c1");
        assert_eq!(message.content, "here");
        assert_eq!(message.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 5).unwrap());
    }

    #[test]
    fn rejects_unknown_and_malformed_events() {
        assert!(matches!(
            RealtimeEvent::decode("typing", "{}"),
            Err(RealtimeError::UnknownEvent(name)) if name == "typing"
        ));
        assert!(matches!(
            RealtimeEvent::decode(MESSAGE_RECEIVED, r#"{"conversation":"c1"}"#),
            Err(RealtimeError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn subscribers_receive_until_dropped() {
        let hub = RealtimeHub::new();
        let first = hub.subscribe();
        let second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        assert_eq!(hub.publish_raw(MESSAGE_RECEIVED, PAYLOAD).unwrap(), 2);
        assert!(first.try_recv().is_some());
        assert!(second.try_recv().is_some());
        assert!(first.try_recv().is_none());

        drop(second);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(hub.publish_raw(MESSAGE_RECEIVED, PAYLOAD).unwrap(), 1);
        assert!(first.try_recv().is_some());
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let hub = RealtimeHub::new();
        let sub = hub.subscribe();
        drop(hub);
        assert!(sub.try_recv().is_none());
        drop(sub);
    }
}
