//! In-memory projections of server state, reconciled from fetch results,
//! mutation responses and pushed events.

mod bookings;
mod conversations;
mod discovery;
mod feed;

pub use bookings::BookingStore;
pub use conversations::{
    filter_by_participant_name, resolve_other_participant, unread_count_for, ConversationListStore,
};
pub use discovery::DiscoveryStore;
pub use feed::{is_liked_by, FeedStore};
