use log::debug;

use crate::error::ParticipantNotFoundError;
use crate::models::{Conversation, IncomingMessage, UserSummary};

/// Conversation summaries kept most-recent-first as messages arrive.
#[derive(Debug, Default)]
pub struct ConversationListStore {
    conversations: Vec<Conversation>,
    disposed: bool,
}

impl ConversationListStore {
    pub fn new(initial: Vec<Conversation>) -> Self {
        Self {
            conversations: initial,
            disposed: false,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == conversation_id)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Marks the store as torn down. Later mutations are ignored.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Replaces the list with a fresh fetch, keeping the server's order.
    pub fn load_all(&mut self, conversations: Vec<Conversation>) {
        if self.disposed {
            debug!("dropping conversation load for disposed store");
            return;
        }
        self.conversations = conversations;
    }

    /// Applies a pushed message to its conversation and re-sorts by recency.
    ///
    /// Messages for conversations not in the list are ignored. Returns whether
    /// a conversation was updated.
    pub fn apply_incoming_message(&mut self, message: &IncomingMessage) -> bool {
        if self.disposed {
            debug!(
                "dropping message for conversation {} on disposed store",
                message.conversation
            );
            return false;
        }
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == message.conversation)
        else {
            debug!("message for unknown conversation {}", message.conversation);
            return false;
        };
        conversation.last_message = Some(message.content.clone());
        conversation.last_message_time = Some(message.created_at);
        // Stable; conversations without any message sink to the bottom.
        self.conversations
            .sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        true
    }

    /// Sum of unread messages across every conversation for `user_id`.
    pub fn total_unread_for(&self, user_id: &str) -> u64 {
        self.conversations
            .iter()
            .map(|c| u64::from(unread_count_for(c, user_id)))
            .sum()
    }
}

/// Returns the participant that is not `self_user_id`.
pub fn resolve_other_participant<'a>(
    conversation: &'a Conversation,
    self_user_id: &str,
) -> Result<&'a UserSummary, ParticipantNotFoundError> {
    conversation
        .participants
        .iter()
        .find(|p| p.id != self_user_id)
        .ok_or_else(|| ParticipantNotFoundError {
            conversation_id: conversation.id.clone(),
            self_user_id: self_user_id.to_string(),
        })
}

pub fn unread_count_for(conversation: &Conversation, user_id: &str) -> u32 {
    conversation.unread_count.get(user_id).copied().unwrap_or(0)
}

/// Case-insensitive substring search on the other participant's name.
///
/// A blank query returns every conversation without resolving participants.
pub fn filter_by_participant_name<'a>(
    conversations: &'a [Conversation],
    query: &str,
    self_user_id: &str,
) -> Result<Vec<&'a Conversation>, ParticipantNotFoundError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(conversations.iter().collect());
    }
    let mut matches = Vec::new();
    for conversation in conversations {
        let other = resolve_other_participant(conversation, self_user_id)?;
        if other.name.to_lowercase().contains(&needle) {
            matches.push(conversation);
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn user(id: &str, name: &str) -> UserSummary {
        UserSummary {
            id: id.into(),
            name: name.into(),
            profile_picture: None,
        }
    }

    fn conversation(id: &str, other: UserSummary, time: Option<DateTime<Utc>>) -> Conversation {
        Conversation {
            id: id.into(),
            participants: vec![user("me", "Me"), other],
            last_message: None,
            last_message_time: time,
            unread_count: HashMap::new(),
        }
    }

    fn message(conversation: &str, content: &str, at: DateTime<Utc>) -> IncomingMessage {
        IncomingMessage {
            conversation: conversation.into(),
            content: content.into(),
            created_at: at,
        }
    }

    fn ids(store: &ConversationListStore) -> Vec<&str> {
        store.conversations().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn load_all_keeps_server_order() {
        let mut store = ConversationListStore::default();
        store.load_all(vec![
            conversation("old", user("a", "A"), Some(t0() - Duration::hours(1))),
            conversation("new", user("b", "B"), Some(t0())),
        ]);
        assert_eq!(ids(&store), vec!["old", "new"]);
    }

    #[test]
    fn incoming_message_moves_conversation_to_top() {
        let mut store = ConversationListStore::new(vec![
            conversation("c1", user("a", "A"), Some(t0())),
            conversation("c2", user("b", "B"), Some(t0() - Duration::seconds(10))),
        ]);
        let at = t0() + Duration::seconds(5);
        assert!(store.apply_incoming_message(&message("c2", "on my way", at)));

        assert_eq!(ids(&store), vec!["c2", "c1"]);
        let top = &store.conversations()[0];
        assert_eq!(top.last_message.as_deref(), Some("on my way"));
        assert_eq!(top.last_message_time, Some(at));
        assert_eq!(store.conversations()[1].last_message_time, Some(t0()));
    }

    #[test]
    fn incoming_message_leaves_unread_counts_alone() {
        let mut c1 = conversation("c1", user("a", "A"), Some(t0()));
        c1.unread_count.insert("me".into(), 3);
        let mut store = ConversationListStore::new(vec![c1]);
        store.apply_incoming_message(&message("c1", "hi", t0() + Duration::minutes(1)));
        assert_eq!(unread_count_for(&store.conversations()[0], "me"), 3);
    }

    #[test]
    fn unknown_conversation_is_not_synthesized() {
        let mut store = ConversationListStore::new(vec![conversation("c1", user("a", "A"), Some(t0()))]);
        let before = store.conversations().to_vec();
        assert!(!store.apply_incoming_message(&message("ghost", "boo", t0())));
        assert_eq!(store.conversations(), before.as_slice());
    }

    #[test]
    fn redelivery_is_idempotent() {
        let mut store = ConversationListStore::new(vec![
            conversation("c1", user("a", "A"), Some(t0())),
            conversation("c2", user("b", "B"), Some(t0())),
            conversation("c3", user("c", "C"), None),
        ]);
        let msg = message("c3", "same", t0());
        store.apply_incoming_message(&msg);
        let once = store.conversations().to_vec();
        store.apply_incoming_message(&msg);
        assert_eq!(store.conversations(), once.as_slice());
    }

    #[test]
    fn sort_is_stable_and_descending() {
        let mut store = ConversationListStore::new(vec![
            conversation("quiet", user("q", "Q"), None),
            conversation("a", user("a", "A"), Some(t0())),
            conversation("b", user("b", "B"), Some(t0())),
            conversation("z", user("z", "Z"), Some(t0() - Duration::hours(2))),
        ]);
        store.apply_incoming_message(&message("z", "ping", t0() - Duration::hours(1)));
        assert_eq!(ids(&store), vec!["a", "b", "z", "quiet"]);
        let times: Vec<_> = store
            .conversations()
            .iter()
            .map(|c| c.last_message_time)
            .collect();
        assert!(times.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn disposed_store_ignores_mutations() {
        let mut store = ConversationListStore::new(vec![conversation("c1", user("a", "A"), Some(t0()))]);
        store.dispose();
        assert!(!store.apply_incoming_message(&message("c1", "late", t0() + Duration::hours(1))));
        store.load_all(Vec::new());
        assert_eq!(ids(&store), vec!["c1"]);
        assert!(store.conversations()[0].last_message.is_none());
    }

    #[test]
    fn other_participant_ignores_array_order() {
        let mut c = conversation("c1", user("u2", "Ana"), None);
        assert_eq!(resolve_other_participant(&c, "me").unwrap().id, "u2");
        c.participants.reverse();
        assert_eq!(resolve_other_participant(&c, "me").unwrap().id, "u2");
    }

    #[test]
    fn other_participant_missing_is_an_error() {
        let c = conversation("c1", user("me", "Me again"), None);
        let err = resolve_other_participant(&c, "me").unwrap_err();
        assert_eq!(err.conversation_id, "c1");
        assert_eq!(err.self_user_id, "me");
    }

    #[test]
    fn unread_count_defaults_to_zero() {
        let mut c = conversation("c1", user("a", "A"), None);
        assert_eq!(unread_count_for(&c, "me"), 0);
        c.unread_count.insert("me".into(), 4);
        c.unread_count.insert("a".into(), 1);
        assert_eq!(unread_count_for(&c, "me"), 4);

        let store = ConversationListStore::new(vec![c, conversation("c2", user("b", "B"), None)]);
        assert_eq!(store.total_unread_for("me"), 4);
        assert_eq!(store.total_unread_for("nobody"), 0);
    }

    #[test]
    fn filter_by_name() {
        let list = vec![
            conversation("c1", user("u1", "Ana"), None),
            conversation("c2", user("u2", "Bruno"), None),
            conversation("c3", user("u3", "Mariana"), None),
        ];

        let all = filter_by_participant_name(&list, "", "me").unwrap();
        assert_eq!(all.len(), 3);

        let found: Vec<_> = filter_by_participant_name(&list, "ana", "me")
            .unwrap()
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(found, vec!["c1", "c3"]);

        let found = filter_by_participant_name(&list, "BRU", "me").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "c2");
    }

    #[test]
    fn filter_propagates_integrity_fault() {
        let mut broken = conversation("bad", user("me", "Me"), None);
        broken.participants[1].id = "me".into();
        let list = vec![conversation("c1", user("u1", "Ana"), None), broken];
        assert!(filter_by_participant_name(&list, "x", "me").is_err());
        assert_eq!(filter_by_participant_name(&list, "", "me").unwrap().len(), 2);
    }
}
