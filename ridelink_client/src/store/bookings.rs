use chrono::{DateTime, Utc};
use log::debug;

use crate::models::Booking;

#[derive(Debug, Default)]
pub struct BookingStore {
    bookings: Vec<Booking>,
    disposed: bool,
}

impl BookingStore {
    pub fn new(initial: Vec<Booking>) -> Self {
        Self {
            bookings: initial,
            disposed: false,
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn load_all(&mut self, bookings: Vec<Booking>) {
        if self.disposed {
            debug!("dropping booking load for disposed store");
            return;
        }
        self.bookings = bookings;
    }

    /// Pending or confirmed rides departing at or after `now`, soonest first.
    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<&Booking> {
        let mut upcoming: Vec<&Booking> = self
            .bookings
            .iter()
            .filter(|b| b.status.is_active() && b.departure_time >= now)
            .collect();
        upcoming.sort_by_key(|b| b.departure_time);
        upcoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::{Duration, TimeZone};

    fn booking(id: &str, departure: DateTime<Utc>, status: BookingStatus) -> Booking {
        Booking {
            id: id.into(),
            pickup: "Station".into(),
            dropoff: "Airport".into(),
            departure_time: departure,
            seats: 1,
            status,
            driver: None,
        }
    }

    #[test]
    fn upcoming_filters_and_orders() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let store = BookingStore::new(vec![
            booking("later", now + Duration::hours(5), BookingStatus::Confirmed),
            booking("past", now - Duration::hours(1), BookingStatus::Confirmed),
            booking("cancelled", now + Duration::hours(1), BookingStatus::Cancelled),
            booking("soon", now + Duration::minutes(30), BookingStatus::Pending),
            booking("now", now, BookingStatus::Confirmed),
        ]);
        let ids: Vec<_> = store.upcoming(now).iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["now", "soon", "later"]);
    }

    #[test]
    fn disposed_store_keeps_last_bookings() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut store = BookingStore::new(vec![booking("b1", now, BookingStatus::Pending)]);
        store.dispose();
        store.load_all(Vec::new());
        assert_eq!(store.bookings().len(), 1);
    }
}
