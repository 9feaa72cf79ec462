use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;

use crate::models::{
    Booking, BookingsResponse, Comment, CommentResponse, Conversation, ConversationsResponse,
    CreateCommentInput, DiscoveredUser, FeedResponse, FollowResponse, LikeResponse, Post,
    UsersResponse,
};

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(15))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let url = self.url("/chat/conversations")?;
        let response = self.client.get(url).send()?.error_for_status()?;
        let wrapper: ConversationsResponse = response.json()?;
        Ok(wrapper.conversations)
    }

    pub fn get_feed(&self, page: u32) -> Result<Vec<Post>> {
        let mut url = self.url("/social/feed")?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        let response = self.client.get(url).send()?.error_for_status()?;
        let wrapper: FeedResponse = response.json()?;
        Ok(wrapper.posts)
    }

    /// Toggles the signed-in user's like; the response carries the new state.
    pub fn toggle_like(&self, post_id: &str) -> Result<LikeResponse> {
        let url = self.url(&format!("/social/posts/{post_id}/like"))?;
        let response = self.client.post(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    pub fn delete_post(&self, post_id: &str) -> Result<()> {
        let url = self.url(&format!("/social/posts/{post_id}"))?;
        self.client.delete(url).send()?.error_for_status()?;
        Ok(())
    }

    pub fn share_post(&self, post_id: &str) -> Result<()> {
        let url = self.url(&format!("/social/posts/{post_id}/share"))?;
        self.client.post(url).send()?.error_for_status()?;
        Ok(())
    }

    pub fn create_comment(&self, post_id: &str, input: &CreateCommentInput) -> Result<Comment> {
        let url = self.url(&format!("/social/posts/{post_id}/comments"))?;
        let response = self
            .client
            .post(url)
            .json(input)
            .send()?
            .error_for_status()?;
        let wrapper: CommentResponse = response.json()?;
        Ok(wrapper.comment)
    }

    pub fn list_bookings(&self) -> Result<Vec<Booking>> {
        let url = self.url("/bookings")?;
        let response = self.client.get(url).send()?.error_for_status()?;
        let wrapper: BookingsResponse = response.json()?;
        Ok(wrapper.bookings)
    }

    pub fn list_users(&self, search: Option<&str>) -> Result<Vec<DiscoveredUser>> {
        let mut url = self.url("/social/users")?;
        if let Some(query) = search.map(str::trim).filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("search", query);
        }
        let response = self.client.get(url).send()?.error_for_status()?;
        let wrapper: UsersResponse = response.json()?;
        Ok(wrapper.users)
    }

    pub fn toggle_follow(&self, user_id: &str) -> Result<FollowResponse> {
        let url = self.url(&format!("/social/users/{user_id}/follow"))?;
        let response = self.client.post(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    fn url(&self, path: &str) -> Result<Url> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).with_context(|| format!("invalid request URL {joined}"))
    }
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(
            sanitize_base_url("localhost:3000/api/".into()).unwrap(),
            "http://localhost:3000/api"
        );
        assert_eq!(
            sanitize_base_url("https://rides.example.com".into()).unwrap(),
            "https://rides.example.com"
        );
    }

    #[test]
    fn request_urls_keep_base_path() {
        let client = ApiClient::new("http://localhost:3000/api/").expect("client");
        let url = client.url("/chat/conversations").expect("url");
        assert_eq!(url.as_str(), "http://localhost:3000/api/chat/conversations");
        let url = client.url("social/posts/p1/like").expect("url");
        assert_eq!(url.as_str(), "http://localhost:3000/api/social/posts/p1/like");
    }
}
