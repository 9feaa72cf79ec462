use thiserror::Error;

/// A conversation has no participant other than the signed-in user.
///
/// This means the two-party invariant was broken upstream; callers should
/// surface it as a data-integrity fault rather than an empty state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conversation {conversation_id} has no participant other than {self_user_id}")]
pub struct ParticipantNotFoundError {
    pub conversation_id: String,
    pub self_user_id: String,
}

#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("unsupported realtime event: {0}")]
    UnknownEvent(String),
    #[error("malformed {event} payload")]
    MalformedPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}
