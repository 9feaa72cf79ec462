use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use anyhow::Result;
use log::info;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::ParticipantNotFoundError;
use crate::models::{Conversation, UserSummary};
use crate::realtime::{RealtimeEvent, RealtimeHub, Subscription};
use crate::store::{
    filter_by_participant_name, resolve_other_participant, BookingStore, ConversationListStore,
    DiscoveryStore, FeedStore,
};

mod messages;
mod spawners;
mod state;
mod tasks;

use messages::Delivery;

pub use messages::{AppMessage, MessageSender};
pub use state::SyncStatus;

/// Owns the client-side stores of one signed-in user and keeps them in step
/// with the API.
///
/// Requests run on worker threads and report back over a channel; nothing is
/// applied until [`SyncSession::process_messages`] runs on the owning thread.
pub struct SyncSession {
    api: ApiClient,
    self_user_id: String,
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
    conversations: ConversationListStore,
    feed: FeedStore,
    discovery: DiscoveryStore,
    bookings: BookingStore,
    status: SyncStatus,
    subscription: Option<Subscription>,
    disposed: bool,
}

impl SyncSession {
    pub fn new(api: ApiClient, self_user_id: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            self_user_id: self_user_id.into(),
            tx,
            rx,
            conversations: ConversationListStore::default(),
            feed: FeedStore::default(),
            discovery: DiscoveryStore::default(),
            bookings: BookingStore::default(),
            status: SyncStatus::default(),
            subscription: None,
            disposed: false,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let api = ApiClient::with_timeout(config.api_url.clone(), config.http_timeout())?;
        Ok(Self::new(api, config.user_id.clone()))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn self_user_id(&self) -> &str {
        &self.self_user_id
    }

    /// Sender for results produced outside the built-in tasks. They are
    /// applied to the stores but do not count toward [`SyncSession::wait_for_idle`].
    pub fn sender(&self) -> MessageSender {
        MessageSender::new(self.tx.clone())
    }

    pub fn conversations(&self) -> &ConversationListStore {
        &self.conversations
    }

    pub fn feed(&self) -> &FeedStore {
        &self.feed
    }

    pub fn discovery(&self) -> &DiscoveryStore {
        &self.discovery
    }

    pub fn bookings(&self) -> &BookingStore {
        &self.bookings
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Starts receiving pushed events from `hub`, replacing any earlier subscription.
    pub fn attach_realtime(&mut self, hub: &RealtimeHub) {
        if self.disposed {
            return;
        }
        self.subscription = Some(hub.subscribe());
    }

    pub fn detach_realtime(&mut self) {
        self.subscription = None;
    }

    pub fn process_messages(&mut self) -> usize {
        messages::process_messages(self)
    }

    /// Applies a pushed event directly, bypassing the subscription.
    pub fn handle_realtime_event(&mut self, event: RealtimeEvent) {
        messages::handle_realtime_event(self, event);
    }

    /// Blocks until every spawned request has reported back or `timeout`
    /// passes. Returns whether the session went idle.
    pub fn wait_for_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.status.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(delivery) => messages::handle_delivery(self, delivery),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false;
                }
            }
        }
        self.process_messages();
        true
    }

    /// Tears the session down: unsubscribes from pushed events and freezes
    /// every store, so results still in flight are dropped.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        info!("disposing sync session for {}", self.self_user_id);
        self.disposed = true;
        self.subscription = None;
        self.conversations.dispose();
        self.feed.dispose();
        self.discovery.dispose();
        self.bookings.dispose();
    }

    pub fn other_participant<'a>(
        &self,
        conversation: &'a Conversation,
    ) -> Result<&'a UserSummary, ParticipantNotFoundError> {
        resolve_other_participant(conversation, &self.self_user_id)
    }

    pub fn search_conversations(
        &self,
        query: &str,
    ) -> Result<Vec<&Conversation>, ParticipantNotFoundError> {
        filter_by_participant_name(self.conversations.conversations(), query, &self.self_user_id)
    }

    pub fn unread_total(&self) -> u64 {
        self.conversations.total_unread_for(&self.self_user_id)
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
