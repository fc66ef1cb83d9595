use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{info, warn};
use ulid::Ulid;

use crate::limits::MAX_NAME_LEN;
use crate::model::{
    Booking, BookingId, BookingState, Contact, Employee, EmployeeId, Guest, GuestId, Room,
    RoomKind,
};
use crate::observability;

use super::conflict::{check_no_conflict, validate_room_fields, validate_stay};
use super::{Engine, EngineError};

impl Engine {
    // ── Room registry ────────────────────────────────────────

    pub async fn register_room(
        &self,
        number: &str,
        kind: RoomKind,
        price: f64,
        capacity: u32,
    ) -> Result<(), EngineError> {
        validate_room_fields(number, price, capacity)?;
        if self.rooms.contains_key(number) {
            return Err(EngineError::DuplicateRoom(number.to_string()));
        }
        let room = Room {
            number: number.to_string(),
            kind,
            price,
            capacity,
            occupied: false,
        };
        self.storage.insert_room(&room).await?;
        self.rooms
            .insert(room.number.clone(), Arc::new(RwLock::new(room)));
        info!(room = number, "room registered");
        Ok(())
    }

    /// Update a room's descriptive fields. The occupied flag is not
    /// touchable here; it only moves with the booking lifecycle.
    pub async fn update_room(
        &self,
        number: &str,
        kind: RoomKind,
        price: f64,
        capacity: u32,
    ) -> Result<(), EngineError> {
        validate_room_fields(number, price, capacity)?;
        let room = self.room(number)?;
        let mut guard = room.write().await;
        let mut updated = guard.clone();
        updated.kind = kind;
        updated.price = price;
        updated.capacity = capacity;
        self.storage.update_room(&updated).await?;
        *guard = updated;
        Ok(())
    }

    pub async fn remove_room(&self, number: &str) -> Result<(), EngineError> {
        if !self.rooms.contains_key(number) {
            return Err(EngineError::RoomNotFound(number.to_string()));
        }
        if self.store.has_active_for_room(number) {
            return Err(EngineError::RoomInUse(number.to_string()));
        }
        self.storage.delete_room(number).await?;
        self.rooms.remove(number);
        info!(room = number, "room removed");
        Ok(())
    }

    // ── Guests ───────────────────────────────────────────────

    /// Register a guest, or return the existing one when the identity
    /// document is already on file.
    pub async fn register_guest(
        &self,
        contact: Contact,
        passport: &str,
    ) -> Result<GuestId, EngineError> {
        if contact.first_name.is_empty() || contact.last_name.is_empty() {
            return Err(EngineError::InvalidGuest("name is required"));
        }
        if contact.phone.is_empty() {
            return Err(EngineError::InvalidGuest("phone is required"));
        }
        if passport.is_empty() {
            return Err(EngineError::InvalidGuest("passport data is required"));
        }
        if contact.first_name.len() > MAX_NAME_LEN || contact.last_name.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("name too long"));
        }
        if let Some(existing) = self
            .guests
            .iter()
            .find(|e| e.value().passport == passport)
        {
            return Ok(existing.value().id);
        }
        let guest = Guest {
            id: Ulid::new(),
            contact,
            passport: passport.to_string(),
        };
        self.storage.insert_guest(&guest).await?;
        let id = guest.id;
        self.guests.insert(id, guest);
        info!(guest = %id, "guest registered");
        Ok(id)
    }

    pub async fn update_guest(
        &self,
        id: GuestId,
        contact: Contact,
        passport: &str,
    ) -> Result<(), EngineError> {
        if contact.first_name.is_empty() || contact.last_name.is_empty() {
            return Err(EngineError::InvalidGuest("name is required"));
        }
        if contact.phone.is_empty() {
            return Err(EngineError::InvalidGuest("phone is required"));
        }
        if passport.is_empty() {
            return Err(EngineError::InvalidGuest("passport data is required"));
        }
        if !self.guests.contains_key(&id) {
            return Err(EngineError::GuestNotFound(id));
        }
        let updated = Guest {
            id,
            contact,
            passport: passport.to_string(),
        };
        self.storage.update_guest(&updated).await?;
        self.guests.insert(id, updated);
        Ok(())
    }

    // ── Employees ────────────────────────────────────────────

    pub async fn add_employee(
        &self,
        contact: Contact,
        position: &str,
        email: &str,
        hired_on: NaiveDate,
    ) -> Result<EmployeeId, EngineError> {
        if contact.first_name.is_empty() || contact.last_name.is_empty() {
            return Err(EngineError::InvalidEmployee("name is required"));
        }
        if contact.phone.is_empty() {
            return Err(EngineError::InvalidEmployee("phone is required"));
        }
        if position.is_empty() {
            return Err(EngineError::InvalidEmployee("position is required"));
        }
        if !email.contains('@') {
            return Err(EngineError::InvalidEmployee("malformed email"));
        }
        let employee = Employee {
            id: Ulid::new(),
            contact,
            position: position.to_string(),
            email: email.to_string(),
            hired_on,
        };
        self.storage.insert_employee(&employee).await?;
        let id = employee.id;
        self.employees.insert(id, employee);
        Ok(id)
    }

    pub async fn remove_employee(&self, id: EmployeeId) -> Result<(), EngineError> {
        if !self.employees.contains_key(&id) {
            return Err(EngineError::EmployeeNotFound(id));
        }
        self.storage.delete_employee(id).await?;
        self.employees.remove(&id);
        Ok(())
    }

    // ── Booking lifecycle ────────────────────────────────────

    /// Create an active booking, reserving the room. Either the booking
    /// exists and the room is flagged occupied, or neither happened.
    pub async fn create_booking(
        &self,
        guest_id: GuestId,
        room_number: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<BookingId, EngineError> {
        let stay = validate_stay(check_in, check_out, &self.config)?;
        if !self.guests.contains_key(&guest_id) {
            return Err(EngineError::GuestNotFound(guest_id));
        }
        let room = self.room(room_number)?;
        let mut guard = room.write().await;

        let existing = self.store.by_room(room_number);
        if let Err(e) = check_no_conflict(&existing, &stay, None) {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(e);
        }

        let booking = Booking {
            id: Ulid::new(),
            guest_id,
            room: room_number.to_string(),
            stay,
            state: BookingState::Active,
        };

        self.storage.insert_booking(&booking).await?;
        let mut reserved = guard.clone();
        reserved.occupied = true;
        if let Err(e) = self.storage.update_room(&reserved).await {
            // Undo the booking row so storage and memory agree before the
            // error surfaces.
            if let Err(undo) = self.storage.delete_booking(booking.id).await {
                warn!(booking = %booking.id, error = %undo, "failed to undo booking row");
            }
            return Err(e.into());
        }

        let id = booking.id;
        self.store.insert(booking)?;
        if !guard.occupied {
            metrics::gauge!(observability::ROOMS_OCCUPIED).increment(1.0);
        }
        *guard = reserved;
        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
        info!(booking = %id, room = room_number, %check_in, %check_out, "booking created");
        Ok(id)
    }

    /// Re-validate and apply new dates, and optionally a new room or guest.
    /// The booking's own id is excluded from the conflict scan so it can be
    /// extended or shifted in place.
    pub async fn modify_booking(
        &self,
        id: BookingId,
        new_check_in: NaiveDate,
        new_check_out: NaiveDate,
        new_room: Option<&str>,
        new_guest: Option<GuestId>,
    ) -> Result<(), EngineError> {
        let current = self.store.get(id).ok_or(EngineError::BookingNotFound(id))?;
        if !current.is_active() {
            return Err(EngineError::InvalidState(id));
        }
        let stay = validate_stay(new_check_in, new_check_out, &self.config)?;
        let guest_id = new_guest.unwrap_or(current.guest_id);
        if !self.guests.contains_key(&guest_id) {
            return Err(EngineError::GuestNotFound(guest_id));
        }
        let target = new_room.unwrap_or(&current.room).to_string();

        let updated = Booking {
            id,
            guest_id,
            room: target.clone(),
            stay,
            state: BookingState::Active,
        };

        if target == current.room {
            let room = self.room(&target)?;
            let _guard = room.write().await;

            let existing = self.store.by_room(&target);
            if let Err(e) = check_no_conflict(&existing, &stay, Some(id)) {
                metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
                return Err(e);
            }
            self.storage.update_booking(&updated).await?;
            self.store.update(updated)?;
            info!(booking = %id, "booking modified");
            return Ok(());
        }

        let old_arc = self.room(&current.room)?;
        let new_arc = self.room(&target)?;
        // Lock both rooms in sorted key order so concurrent swaps cannot
        // deadlock.
        let (mut old_guard, mut new_guard) = if current.room < target {
            let o = old_arc.write().await;
            let n = new_arc.write().await;
            (o, n)
        } else {
            let n = new_arc.write().await;
            let o = old_arc.write().await;
            (o, n)
        };

        let existing = self.store.by_room(&target);
        if let Err(e) = check_no_conflict(&existing, &stay, Some(id)) {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(e);
        }

        self.storage.update_booking(&updated).await?;

        // Release the old room, then reserve the new one; roll the release
        // back if the reservation cannot be persisted.
        let mut released = old_guard.clone();
        released.occupied = false;
        let mut reserved = new_guard.clone();
        reserved.occupied = true;

        if let Err(e) = self.storage.update_room(&released).await {
            if let Err(undo) = self.storage.update_booking(&current).await {
                warn!(booking = %id, error = %undo, "failed to undo booking row");
            }
            return Err(e.into());
        }
        if let Err(e) = self.storage.update_room(&reserved).await {
            if let Err(undo) = self.storage.update_room(&old_guard).await {
                warn!(room = old_guard.number.as_str(), error = %undo, "failed to undo room release");
            }
            if let Err(undo) = self.storage.update_booking(&current).await {
                warn!(booking = %id, error = %undo, "failed to undo booking row");
            }
            return Err(e.into());
        }

        self.store.update(updated)?;
        if old_guard.occupied {
            metrics::gauge!(observability::ROOMS_OCCUPIED).decrement(1.0);
        }
        if !new_guard.occupied {
            metrics::gauge!(observability::ROOMS_OCCUPIED).increment(1.0);
        }
        *old_guard = released;
        *new_guard = reserved;
        info!(booking = %id, from = current.room.as_str(), to = target.as_str(), "booking moved");
        Ok(())
    }

    /// Mark the room of an active booking occupied.
    pub async fn check_in_booking(&self, id: BookingId) -> Result<(), EngineError> {
        let booking = self.store.get(id).ok_or(EngineError::BookingNotFound(id))?;
        if !booking.is_active() {
            return Err(EngineError::InvalidState(id));
        }
        let room = self.room(&booking.room)?;
        let mut guard = room.write().await;
        if guard.occupied {
            return Ok(());
        }
        let mut reserved = guard.clone();
        reserved.occupied = true;
        self.storage.update_room(&reserved).await?;
        *guard = reserved;
        metrics::gauge!(observability::ROOMS_OCCUPIED).increment(1.0);
        info!(booking = %id, room = booking.room.as_str(), "guest checked in");
        Ok(())
    }

    pub async fn check_out_booking(&self, id: BookingId) -> Result<(), EngineError> {
        self.close_booking(id, BookingState::CheckedOut).await
    }

    pub async fn cancel_booking(&self, id: BookingId) -> Result<(), EngineError> {
        self.close_booking(id, BookingState::Cancelled).await
    }

    async fn close_booking(&self, id: BookingId, terminal: BookingState) -> Result<(), EngineError> {
        let booking = self.store.get(id).ok_or(EngineError::BookingNotFound(id))?;
        if !booking.is_active() {
            return Err(EngineError::InvalidState(id));
        }
        let room = self.room(&booking.room)?;
        let mut guard = room.write().await;

        let mut closed = booking.clone();
        closed.state = terminal;
        self.storage.update_booking(&closed).await?;

        let mut released = guard.clone();
        released.occupied = false;
        if let Err(e) = self.storage.update_room(&released).await {
            if let Err(undo) = self.storage.update_booking(&booking).await {
                warn!(booking = %id, error = %undo, "failed to undo booking row");
            }
            return Err(e.into());
        }

        self.store.update(closed)?;
        if guard.occupied {
            metrics::gauge!(observability::ROOMS_OCCUPIED).decrement(1.0);
        }
        *guard = released;
        let outcome = match terminal {
            BookingState::Cancelled => "cancelled",
            _ => "checked_out",
        };
        metrics::counter!(observability::BOOKINGS_CLOSED_TOTAL, "outcome" => outcome).increment(1);
        info!(booking = %id, room = booking.room.as_str(), outcome, "booking closed");
        Ok(())
    }

    /// Unconditionally clear a room's occupied flag. Future active bookings
    /// do not hold a room occupied today, so no re-scan happens here.
    pub async fn release(&self, number: &str) -> Result<(), EngineError> {
        let room = self.room(number)?;
        let mut guard = room.write().await;
        if !guard.occupied {
            return Ok(());
        }
        let mut released = guard.clone();
        released.occupied = false;
        self.storage.update_room(&released).await?;
        *guard = released;
        metrics::gauge!(observability::ROOMS_OCCUPIED).decrement(1.0);
        Ok(())
    }

    /// Hard delete by id. Day-to-day flows cancel instead; this removes the
    /// record.
    pub async fn delete_booking(&self, id: BookingId) -> Result<(), EngineError> {
        let booking = self.store.get(id).ok_or(EngineError::BookingNotFound(id))?;
        if booking.is_active() {
            // An active booking holds its room's flag; free it in the same
            // lock scope as the removal.
            let room = self.room(&booking.room)?;
            let mut guard = room.write().await;
            self.storage.delete_booking(id).await?;
            self.store.remove(id);
            if guard.occupied {
                let mut released = guard.clone();
                released.occupied = false;
                if let Err(e) = self.storage.update_room(&released).await {
                    warn!(room = booking.room.as_str(), error = %e, "room flag left stale after delete");
                    return Err(e.into());
                }
                *guard = released;
                metrics::gauge!(observability::ROOMS_OCCUPIED).decrement(1.0);
            }
        } else {
            self.storage.delete_booking(id).await?;
            self.store.remove(id);
        }
        info!(booking = %id, "booking deleted");
        Ok(())
    }
}
