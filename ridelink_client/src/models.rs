use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Server payloads are camelCase JSON. Fields not listed here are ignored on decode.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "avatar")]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub participants: Vec<UserSummary>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unread_count: HashMap<String, u32>,
}

/// Payload of a `message_received` push event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingMessage {
    pub conversation: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author: UserSummary,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub shared_post: Option<Box<Post>>,
    pub created_at: DateTime<Utc>,
    /// Ids of comments created from this client since the post was fetched.
    #[serde(default)]
    pub comment_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: Option<UserSummary>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub pickup: String,
    pub dropoff: String,
    pub departure_time: DateTime<Utc>,
    #[serde(default = "default_seats")]
    pub seats: u32,
    pub status: BookingStatus,
    #[serde(default)]
    pub driver: Option<UserSummary>,
}

fn default_seats() -> u32 {
    1
}

/// A user as returned by the discovery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredUser {
    #[serde(flatten)]
    pub user: UserSummary,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub follower_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationsResponse {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct CreateCommentInput {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingsResponse {
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<DiscoveredUser>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub following: bool,
    pub follower_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_decodes_with_unknown_fields_and_defaults() {
        let raw = r#"{
            "id": "p1",
            "author": {"id": "u2", "name": "Ana", "avatar": "/img/ana.png"},
            "content": "hello",
            "likeCount": 3,
            "createdAt": "2024-05-01T10:00:00Z",
            "__v": 0,
            "visibility": "public"
        }"#;
        let post: Post = serde_json::from_str(raw).expect("decode post");
        assert_eq!(post.author.profile_picture.as_deref(), Some("/img/ana.png"));
        assert_eq!(post.like_count, 3);
        assert!(post.likes.is_empty());
        assert!(post.comment_ids.is_empty());
        assert!(post.shared_post.is_none());
    }

    #[test]
    fn conversation_decodes_nullable_fields() {
        let raw = r#"{
            "id": "c1",
            "participants": [{"id": "u1", "name": "Me"}, {"id": "u2", "name": "Ana"}],
            "lastMessage": null,
            "lastMessageTime": null,
            "unreadCount": {"u1": 2}
        }"#;
        let conversation: Conversation = serde_json::from_str(raw).expect("decode conversation");
        assert!(conversation.last_message.is_none());
        assert!(conversation.last_message_time.is_none());
        assert_eq!(conversation.unread_count.get("u1"), Some(&2));
    }

    #[test]
    fn discovered_user_flattens_summary() {
        let raw = r#"{"id": "u9", "name": "Bo", "isFollowing": true, "followerCount": 12}"#;
        let user: DiscoveredUser = serde_json::from_str(raw).expect("decode user");
        assert_eq!(user.user.id, "u9");
        assert!(user.is_following);
        assert_eq!(user.follower_count, 12);
    }
}
