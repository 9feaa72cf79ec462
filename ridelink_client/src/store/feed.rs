use log::debug;

use crate::models::{Comment, Post};

/// Posts shown in the social feed, in page order.
///
/// Every mutation takes its values from a server response; a missing post id
/// is tolerated silently since a refresh may have replaced the list.
#[derive(Debug, Default)]
pub struct FeedStore {
    posts: Vec<Post>,
    page: u32,
    disposed: bool,
}

impl FeedStore {
    pub fn new(initial: Vec<Post>) -> Self {
        let page = if initial.is_empty() { 0 } else { 1 };
        Self {
            posts: initial,
            page,
            disposed: false,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    /// Last page number loaded, 0 before the first load.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Page 1 replaces the feed, later pages append. Ids are not deduplicated.
    ///
    /// The cursor only moves forward on append, so a late lower page never
    /// makes the next request repeat a page already shown.
    pub fn load_page(&mut self, page: u32, posts: Vec<Post>) {
        if self.disposed {
            debug!("dropping feed page {page} for disposed store");
            return;
        }
        if page <= 1 {
            self.posts = posts;
            self.page = 1;
        } else {
            self.posts.extend(posts);
            self.page = self.page.max(page);
        }
    }

    /// Reconciles like state with the server's answer.
    pub fn toggle_like(
        &mut self,
        post_id: &str,
        server_liked: bool,
        server_like_count: u64,
        self_user_id: &str,
    ) {
        let Some(post) = self.post_mut(post_id) else {
            return;
        };
        let present = post.likes.iter().any(|id| id == self_user_id);
        if server_liked && !present {
            post.likes.push(self_user_id.to_string());
        } else if !server_liked && present {
            post.likes.retain(|id| id != self_user_id);
        }
        post.like_count = server_like_count;
    }

    pub fn delete_post(&mut self, post_id: &str) {
        if self.disposed {
            return;
        }
        let before = self.posts.len();
        self.posts.retain(|p| p.id != post_id);
        if self.posts.len() == before {
            debug!("delete for post {post_id} not in feed");
        }
    }

    /// Counts a share. The shared copy shows up on the next refresh.
    pub fn record_share(&mut self, post_id: &str) {
        if let Some(post) = self.post_mut(post_id) {
            post.shares += 1;
        }
    }

    pub fn append_comment(&mut self, post_id: &str, comment: &Comment) {
        if let Some(post) = self.post_mut(post_id) {
            post.comment_count += 1;
            post.comment_ids.push(comment.id.clone());
        }
    }

    fn post_mut(&mut self, post_id: &str) -> Option<&mut Post> {
        if self.disposed {
            debug!("dropping mutation of post {post_id} on disposed store");
            return None;
        }
        let found = self.posts.iter_mut().find(|p| p.id == post_id);
        if found.is_none() {
            debug!("post {post_id} not in feed");
        }
        found
    }
}

pub fn is_liked_by(post: &Post, user_id: &str) -> bool {
    post.likes.iter().any(|id| id == user_id)
}
