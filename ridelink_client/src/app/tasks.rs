use std::sync::mpsc::Sender;
use std::thread;

use log::error;

use crate::api::ApiClient;
use crate::models::CreateCommentInput;

use super::messages::{AppMessage, Delivery};

fn send(tx: &Sender<Delivery>, message: AppMessage, name: &str) {
    // The session may have been dropped while the request was running.
    if tx.send(Delivery::Task(message)).is_err() {
        error!("failed to send {name} message");
    }
}

pub(super) fn load_conversations(client: ApiClient, tx: Sender<Delivery>) {
    thread::spawn(move || {
        let result = client.list_conversations();
        send(&tx, AppMessage::ConversationsLoaded(result), "ConversationsLoaded");
    });
}

pub(super) fn load_feed_page(client: ApiClient, tx: Sender<Delivery>, page: u32) {
    thread::spawn(move || {
        let result = client.get_feed(page);
        send(&tx, AppMessage::FeedPageLoaded { page, result }, "FeedPageLoaded");
    });
}

pub(super) fn toggle_like(client: ApiClient, tx: Sender<Delivery>, post_id: String) {
    thread::spawn(move || {
        let result = client.toggle_like(&post_id);
        send(&tx, AppMessage::LikeToggled { post_id, result }, "LikeToggled");
    });
}

pub(super) fn delete_post(client: ApiClient, tx: Sender<Delivery>, post_id: String) {
    thread::spawn(move || {
        let result = client.delete_post(&post_id);
        send(&tx, AppMessage::PostDeleted { post_id, result }, "PostDeleted");
    });
}

pub(super) fn share_post(client: ApiClient, tx: Sender<Delivery>, post_id: String) {
    thread::spawn(move || {
        let result = client.share_post(&post_id);
        send(&tx, AppMessage::PostShared { post_id, result }, "PostShared");
    });
}

pub(super) fn create_comment(
    client: ApiClient,
    tx: Sender<Delivery>,
    post_id: String,
    payload: CreateCommentInput,
) {
    thread::spawn(move || {
        let result = client.create_comment(&post_id, &payload);
        send(&tx, AppMessage::CommentCreated { post_id, result }, "CommentCreated");
    });
}

pub(super) fn load_bookings(client: ApiClient, tx: Sender<Delivery>) {
    thread::spawn(move || {
        let result = client.list_bookings();
        send(&tx, AppMessage::BookingsLoaded(result), "BookingsLoaded");
    });
}

pub(super) fn load_users(client: ApiClient, tx: Sender<Delivery>, search: Option<String>) {
    thread::spawn(move || {
        let result = client.list_users(search.as_deref());
        send(&tx, AppMessage::UsersLoaded(result), "UsersLoaded");
    });
}

pub(super) fn toggle_follow(client: ApiClient, tx: Sender<Delivery>, user_id: String) {
    thread::spawn(move || {
        let result = client.toggle_follow(&user_id);
        send(&tx, AppMessage::FollowToggled { user_id, result }, "FollowToggled");
    });
}
