use std::collections::HashSet;

/// Loading and error flags for the requests a session has in flight.
///
/// Only results of requests the session spawned itself move these flags;
/// results pushed in through [`super::MessageSender`] are applied to the
/// stores but leave the bookkeeping alone.
#[derive(Debug, Default)]
pub struct SyncStatus {
    pub conversations_loading: bool,
    pub conversations_error: Option<String>,
    /// True while any feed page request is outstanding.
    pub feed_loading: bool,
    pub feed_error: Option<String>,
    pub bookings_loading: bool,
    pub bookings_error: Option<String>,
    pub users_loading: bool,
    pub users_error: Option<String>,
    /// Posts with a like toggle awaiting the server.
    pub likes_in_flight: HashSet<String>,
    /// Users with a follow toggle awaiting the server.
    pub follows_in_flight: HashSet<String>,
    /// Last failed post or follow mutation, if any.
    pub mutation_error: Option<String>,
    pending: usize,
    feed_requests: usize,
}

impl SyncStatus {
    pub(super) fn begin(&mut self) {
        self.pending += 1;
    }

    pub(super) fn finish(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    pub(super) fn begin_feed(&mut self) {
        self.feed_requests += 1;
        self.feed_loading = true;
    }

    pub(super) fn finish_feed(&mut self) {
        self.feed_requests = self.feed_requests.saturating_sub(1);
        self.feed_loading = self.feed_requests > 0;
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn feed_requests(&self) -> usize {
        self.feed_requests
    }

    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }
}
