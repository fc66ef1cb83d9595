use dashmap::DashMap;

use crate::model::{Booking, BookingId, GuestId};

use super::EngineError;

/// Booking storage plus id/room/guest indexes. Pure bookkeeping: the
/// no-overlap invariant belongs to the conflict scan in `mutations`, not
/// here.
#[derive(Default)]
pub struct BookingStore {
    bookings: DashMap<BookingId, Booking>,
    by_room: DashMap<String, Vec<BookingId>>,
    by_guest: DashMap<GuestId, Vec<BookingId>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(booking: &Booking) -> Result<(), EngineError> {
        if booking.room.is_empty() {
            return Err(EngineError::InvalidBooking("booking must reference a room"));
        }
        if booking.stay.check_in >= booking.stay.check_out {
            return Err(EngineError::InvalidBooking("check-out must be after check-in"));
        }
        Ok(())
    }

    pub fn insert(&self, booking: Booking) -> Result<(), EngineError> {
        Self::validate(&booking)?;
        self.by_room
            .entry(booking.room.clone())
            .or_default()
            .push(booking.id);
        self.by_guest
            .entry(booking.guest_id)
            .or_default()
            .push(booking.id);
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    /// Replace a booking, re-pointing the room/guest indexes when those
    /// references changed.
    pub fn update(&self, booking: Booking) -> Result<(), EngineError> {
        Self::validate(&booking)?;
        let old = self
            .get(booking.id)
            .ok_or(EngineError::BookingNotFound(booking.id))?;
        if old.room != booking.room {
            if let Some(mut ids) = self.by_room.get_mut(&old.room) {
                ids.retain(|i| *i != booking.id);
            }
            self.by_room
                .entry(booking.room.clone())
                .or_default()
                .push(booking.id);
        }
        if old.guest_id != booking.guest_id {
            if let Some(mut ids) = self.by_guest.get_mut(&old.guest_id) {
                ids.retain(|i| *i != booking.id);
            }
            self.by_guest
                .entry(booking.guest_id)
                .or_default()
                .push(booking.id);
        }
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    pub fn remove(&self, id: BookingId) -> Option<Booking> {
        let (_, booking) = self.bookings.remove(&id)?;
        if let Some(mut ids) = self.by_room.get_mut(&booking.room) {
            ids.retain(|i| *i != id);
        }
        if let Some(mut ids) = self.by_guest.get_mut(&booking.guest_id) {
            ids.retain(|i| *i != id);
        }
        Some(booking)
    }

    pub fn get(&self, id: BookingId) -> Option<Booking> {
        self.bookings.get(&id).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn all(&self) -> Vec<Booking> {
        self.bookings.iter().map(|e| e.value().clone()).collect()
    }

    pub fn active(&self) -> Vec<Booking> {
        self.bookings
            .iter()
            .filter(|e| e.value().is_active())
            .map(|e| e.value().clone())
            .collect()
    }

    pub fn by_room(&self, number: &str) -> Vec<Booking> {
        let ids = self
            .by_room
            .get(number)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        ids.into_iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn active_by_room(&self, number: &str) -> Vec<Booking> {
        self.by_room(number)
            .into_iter()
            .filter(|b| b.is_active())
            .collect()
    }

    pub fn by_guest(&self, guest: GuestId) -> Vec<Booking> {
        let ids = self
            .by_guest
            .get(&guest)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        ids.into_iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn has_active_for_room(&self, number: &str) -> bool {
        self.by_room(number).iter().any(|b| b.is_active())
    }
}
