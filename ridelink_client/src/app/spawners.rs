use log::debug;

use super::tasks;
use super::SyncSession;
use crate::models::CreateCommentInput;

impl SyncSession {
    fn can_spawn(&self, what: &str) -> bool {
        if self.disposed {
            debug!("not starting {what}: session disposed");
        }
        !self.disposed
    }

    pub fn spawn_load_conversations(&mut self) {
        if !self.can_spawn("conversation load") || self.status.conversations_loading {
            return;
        }
        self.status.conversations_loading = true;
        self.status.conversations_error = None;
        self.status.begin();
        tasks::load_conversations(self.api.clone(), self.tx.clone());
    }

    /// Reloads page 1, replacing the feed when it lands. Always issued, even
    /// while a later page is still loading.
    pub fn spawn_refresh_feed(&mut self) {
        if !self.can_spawn("feed refresh") {
            return;
        }
        self.spawn_feed_page(1);
    }

    pub fn spawn_load_next_feed_page(&mut self) {
        if !self.can_spawn("feed pagination") || self.status.feed_loading {
            return;
        }
        let page = self.feed.next_page().max(1);
        self.spawn_feed_page(page);
    }

    fn spawn_feed_page(&mut self, page: u32) {
        self.status.begin_feed();
        self.status.feed_error = None;
        self.status.begin();
        tasks::load_feed_page(self.api.clone(), self.tx.clone(), page);
    }

    pub fn spawn_toggle_like(&mut self, post_id: &str) {
        if !self.can_spawn("like toggle") {
            return;
        }
        if !self.status.likes_in_flight.insert(post_id.to_string()) {
            debug!("like toggle already pending for post {post_id}");
            return;
        }
        self.status.mutation_error = None;
        self.status.begin();
        tasks::toggle_like(self.api.clone(), self.tx.clone(), post_id.to_string());
    }

    pub fn spawn_delete_post(&mut self, post_id: &str) {
        if !self.can_spawn("post delete") {
            return;
        }
        self.status.mutation_error = None;
        self.status.begin();
        tasks::delete_post(self.api.clone(), self.tx.clone(), post_id.to_string());
    }

    pub fn spawn_share_post(&mut self, post_id: &str) {
        if !self.can_spawn("post share") {
            return;
        }
        self.status.mutation_error = None;
        self.status.begin();
        tasks::share_post(self.api.clone(), self.tx.clone(), post_id.to_string());
    }

    pub fn spawn_create_comment(&mut self, post_id: &str, body: &str) {
        if !self.can_spawn("comment") {
            return;
        }
        let content = body.trim().to_string();
        if content.is_empty() {
            self.status.mutation_error = Some("Comment cannot be empty".into());
            return;
        }
        self.status.mutation_error = None;
        self.status.begin();
        tasks::create_comment(
            self.api.clone(),
            self.tx.clone(),
            post_id.to_string(),
            CreateCommentInput { content },
        );
    }

    pub fn spawn_load_bookings(&mut self) {
        if !self.can_spawn("booking load") || self.status.bookings_loading {
            return;
        }
        self.status.bookings_loading = true;
        self.status.bookings_error = None;
        self.status.begin();
        tasks::load_bookings(self.api.clone(), self.tx.clone());
    }

    pub fn spawn_load_users(&mut self, search: Option<&str>) {
        if !self.can_spawn("user discovery") || self.status.users_loading {
            return;
        }
        self.status.users_loading = true;
        self.status.users_error = None;
        self.status.begin();
        tasks::load_users(self.api.clone(), self.tx.clone(), search.map(str::to_string));
    }

    pub fn spawn_toggle_follow(&mut self, user_id: &str) {
        if !self.can_spawn("follow toggle") {
            return;
        }
        if !self.status.follows_in_flight.insert(user_id.to_string()) {
            debug!("follow toggle already pending for user {user_id}");
            return;
        }
        self.status.mutation_error = None;
        self.status.begin();
        tasks::toggle_follow(self.api.clone(), self.tx.clone(), user_id.to_string());
    }
}
