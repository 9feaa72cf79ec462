use std::sync::mpsc::{SendError, Sender};

use log::{debug, error, info};

use crate::models::{
    Booking, Comment, Conversation, DiscoveredUser, FollowResponse, LikeResponse, Post,
};
use crate::realtime::RealtimeEvent;

use super::SyncSession;

/// Results reported back by background tasks.
///
/// A failed request never touches a store; only the matching error flag is set.
pub enum AppMessage {
    ConversationsLoaded(Result<Vec<Conversation>, anyhow::Error>),
    FeedPageLoaded {
        page: u32,
        result: Result<Vec<Post>, anyhow::Error>,
    },
    LikeToggled {
        post_id: String,
        result: Result<LikeResponse, anyhow::Error>,
    },
    PostDeleted {
        post_id: String,
        result: Result<(), anyhow::Error>,
    },
    PostShared {
        post_id: String,
        result: Result<(), anyhow::Error>,
    },
    CommentCreated {
        post_id: String,
        result: Result<Comment, anyhow::Error>,
    },
    BookingsLoaded(Result<Vec<Booking>, anyhow::Error>),
    UsersLoaded(Result<Vec<DiscoveredUser>, anyhow::Error>),
    FollowToggled {
        user_id: String,
        result: Result<FollowResponse, anyhow::Error>,
    },
}

/// A message on the session channel, tagged with who produced it.
pub(super) enum Delivery {
    /// Result of a request the session spawned and is counting.
    Task(AppMessage),
    /// Result handed in by the embedding application.
    External(AppMessage),
}

impl Delivery {
    fn into_message(self) -> AppMessage {
        match self {
            Delivery::Task(message) | Delivery::External(message) => message,
        }
    }
}

/// Hands results produced outside the session's own tasks to the session.
///
/// They are applied like any task result but never settle a request the
/// session is still waiting on.
#[derive(Clone)]
pub struct MessageSender {
    tx: Sender<Delivery>,
}

impl MessageSender {
    pub(super) fn new(tx: Sender<Delivery>) -> Self {
        Self { tx }
    }

    pub fn send(&self, message: AppMessage) -> Result<(), SendError<AppMessage>> {
        self.tx
            .send(Delivery::External(message))
            .map_err(|SendError(delivery)| SendError(delivery.into_message()))
    }
}

/// Drains finished requests and pushed events, applying each to its store.
/// Returns how many were handled.
pub(super) fn process_messages(session: &mut SyncSession) -> usize {
    let mut handled = 0;
    while let Ok(delivery) = session.rx.try_recv() {
        handle_delivery(session, delivery);
        handled += 1;
    }
    let events: Vec<RealtimeEvent> = match &session.subscription {
        Some(subscription) => std::iter::from_fn(|| subscription.try_recv()).collect(),
        None => Vec::new(),
    };
    for event in events {
        handle_realtime_event(session, event);
        handled += 1;
    }
    handled
}

pub(super) fn handle_realtime_event(session: &mut SyncSession, event: RealtimeEvent) {
    match event {
        RealtimeEvent::MessageReceived(message) => {
            if !session.conversations.apply_incoming_message(&message) {
                debug!("realtime message for {} not applied", message.conversation);
            }
        }
    }
}

pub(super) fn handle_delivery(session: &mut SyncSession, delivery: Delivery) {
    match delivery {
        Delivery::Task(message) => {
            settle_request(session, &message);
            apply_message(session, message);
        }
        Delivery::External(message) => apply_message(session, message),
    }
}

/// Clears the in-flight bookkeeping for one spawned request.
fn settle_request(session: &mut SyncSession, message: &AppMessage) {
    let status = &mut session.status;
    status.finish();
    match message {
        AppMessage::ConversationsLoaded(_) => status.conversations_loading = false,
        AppMessage::FeedPageLoaded { .. } => status.finish_feed(),
        AppMessage::LikeToggled { post_id, .. } => {
            status.likes_in_flight.remove(post_id);
        }
        AppMessage::BookingsLoaded(_) => status.bookings_loading = false,
        AppMessage::UsersLoaded(_) => status.users_loading = false,
        AppMessage::FollowToggled { user_id, .. } => {
            status.follows_in_flight.remove(user_id);
        }
        AppMessage::PostDeleted { .. }
        | AppMessage::PostShared { .. }
        | AppMessage::CommentCreated { .. } => {}
    }
}

fn apply_message(session: &mut SyncSession, message: AppMessage) {
    let self_user_id = session.self_user_id.clone();
    match message {
        AppMessage::ConversationsLoaded(result) => match result {
            Ok(conversations) => {
                info!("loaded {} conversations", conversations.len());
                session.conversations.load_all(conversations);
                session.status.conversations_error = None;
            }
            Err(err) => {
                error!("Failed to load conversations: {}", err);
                session.status.conversations_error = Some(err.to_string());
            }
        },
        AppMessage::FeedPageLoaded { page, result } => match result {
            Ok(posts) => {
                info!("loaded feed page {} ({} posts)", page, posts.len());
                session.feed.load_page(page, posts);
                session.status.feed_error = None;
            }
            Err(err) => {
                error!("Failed to load feed page {}: {}", page, err);
                session.status.feed_error = Some(err.to_string());
            }
        },
        AppMessage::LikeToggled { post_id, result } => match result {
            Ok(response) => {
                session.feed.toggle_like(
                    &post_id,
                    response.liked,
                    response.like_count,
                    &self_user_id,
                );
            }
            Err(err) => {
                error!("Failed to toggle like on post {}: {}", post_id, err);
                session.status.mutation_error = Some(err.to_string());
            }
        },
        AppMessage::PostDeleted { post_id, result } => match result {
            Ok(()) => session.feed.delete_post(&post_id),
            Err(err) => {
                error!("Failed to delete post {}: {}", post_id, err);
                session.status.mutation_error = Some(err.to_string());
            }
        },
        AppMessage::PostShared { post_id, result } => match result {
            Ok(()) => session.feed.record_share(&post_id),
            Err(err) => {
                error!("Failed to share post {}: {}", post_id, err);
                session.status.mutation_error = Some(err.to_string());
            }
        },
        AppMessage::CommentCreated { post_id, result } => match result {
            Ok(comment) => session.feed.append_comment(&post_id, &comment),
            Err(err) => {
                error!("Failed to comment on post {}: {}", post_id, err);
                session.status.mutation_error = Some(err.to_string());
            }
        },
        AppMessage::BookingsLoaded(result) => match result {
            Ok(bookings) => {
                session.bookings.load_all(bookings);
                session.status.bookings_error = None;
            }
            Err(err) => {
                error!("Failed to load bookings: {}", err);
                session.status.bookings_error = Some(err.to_string());
            }
        },
        AppMessage::UsersLoaded(result) => match result {
            Ok(users) => {
                session.discovery.load_all(users);
                session.status.users_error = None;
            }
            Err(err) => {
                error!("Failed to load users: {}", err);
                session.status.users_error = Some(err.to_string());
            }
        },
        AppMessage::FollowToggled { user_id, result } => match result {
            Ok(response) => {
                session
                    .discovery
                    .apply_follow(&user_id, response.following, response.follower_count);
            }
            Err(err) => {
                error!("Failed to toggle follow on user {}: {}", user_id, err);
                session.status.mutation_error = Some(err.to_string());
            }
        },
    }
}
