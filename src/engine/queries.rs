use std::time::Instant;

use chrono::NaiveDate;

use crate::limits::MAX_REPORT_WINDOW_DAYS;
use crate::model::{
    Booking, BookingId, CurrentGuestRow, Employee, FinancialSummary, Guest, GuestId, GuestRow,
    OccupancyRow, ReportWindow, Room, StaffRow, Stay,
};
use crate::observability;

use super::availability;
use super::conflict::{check_no_conflict, today};
use super::reports;
use super::{Engine, EngineError, SharedRoom};

impl Engine {
    // ── Rooms ────────────────────────────────────────────────

    pub async fn list_rooms(&self) -> Vec<Room> {
        let shared: Vec<SharedRoom> = self.rooms.iter().map(|e| e.value().clone()).collect();
        let mut rooms = Vec::with_capacity(shared.len());
        for room in shared {
            rooms.push(room.read().await.clone());
        }
        rooms.sort_by(|a, b| a.number.cmp(&b.number));
        rooms
    }

    pub async fn find_room(&self, number: &str) -> Option<Room> {
        let room = self.rooms.get(number).map(|e| e.value().clone())?;
        let guard = room.read().await;
        Some(guard.clone())
    }

    /// Rooms whose cached flag says free right now.
    pub async fn free_rooms(&self) -> Vec<Room> {
        self.list_rooms()
            .await
            .into_iter()
            .filter(|r| !r.occupied)
            .collect()
    }

    /// Rooms that could host the given stay — a conflict scan, not the
    /// cached flag.
    pub async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<Room>, EngineError> {
        if check_in >= check_out {
            return Err(EngineError::InvalidBooking("check-out must be after check-in"));
        }
        let stay = Stay::new(check_in, check_out);
        let mut out = Vec::new();
        for room in self.list_rooms().await {
            let existing = self.store.by_room(&room.number);
            if check_no_conflict(&existing, &stay, None).is_ok() {
                out.push(room);
            }
        }
        Ok(out)
    }

    /// Can the room legally host `[check_in, check_out)`? `exclude` skips a
    /// booking's own id when re-validating an edit.
    pub async fn is_room_available(
        &self,
        number: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude: Option<BookingId>,
    ) -> Result<bool, EngineError> {
        if check_in >= check_out {
            return Err(EngineError::InvalidBooking("check-out must be after check-in"));
        }
        if !self.rooms.contains_key(number) {
            return Err(EngineError::RoomNotFound(number.to_string()));
        }
        let stay = Stay::new(check_in, check_out);
        let existing = self.store.by_room(number);
        Ok(check_no_conflict(&existing, &stay, exclude).is_ok())
    }

    /// Free day-gaps of a room inside `[from, to)`.
    pub async fn free_ranges(
        &self,
        number: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Stay>, EngineError> {
        if from >= to {
            return Err(EngineError::InvalidWindow("empty query range"));
        }
        if (to - from).num_days() > MAX_REPORT_WINDOW_DAYS {
            return Err(EngineError::LimitExceeded("query range too wide"));
        }
        if !self.rooms.contains_key(number) {
            return Err(EngineError::RoomNotFound(number.to_string()));
        }
        let booked: Vec<Stay> = self
            .store
            .active_by_room(number)
            .iter()
            .map(|b| b.stay)
            .collect();
        Ok(availability::free_ranges(from, to, &booked))
    }

    // ── Bookings, guests, employees ──────────────────────────

    pub fn list_bookings(&self) -> Vec<Booking> {
        self.store.all()
    }

    pub fn active_bookings(&self) -> Vec<Booking> {
        self.store.active()
    }

    pub fn find_booking(&self, id: BookingId) -> Option<Booking> {
        self.store.get(id)
    }

    pub fn bookings_for_room(&self, number: &str) -> Vec<Booking> {
        self.store.by_room(number)
    }

    pub fn bookings_for_guest(&self, guest: GuestId) -> Vec<Booking> {
        self.store.by_guest(guest)
    }

    pub fn list_guests(&self) -> Vec<Guest> {
        self.guests.iter().map(|e| e.value().clone()).collect()
    }

    pub fn find_guest(&self, id: GuestId) -> Option<Guest> {
        self.guests.get(&id).map(|e| e.value().clone())
    }

    pub fn list_employees(&self) -> Vec<Employee> {
        self.employees.iter().map(|e| e.value().clone()).collect()
    }

    /// Who is in the house today: active bookings covering the current day.
    pub fn current_guests(&self) -> Vec<CurrentGuestRow> {
        let on = today();
        let mut rows = Vec::new();
        for booking in self.store.active() {
            if !booking.stay.covers(on) {
                continue;
            }
            let Some(guest) = self.find_guest(booking.guest_id) else {
                continue;
            };
            rows.push(CurrentGuestRow {
                guest: guest.contact.full_name(),
                phone: guest.contact.phone.clone(),
                room: booking.room.clone(),
                check_in: booking.stay.check_in,
                check_out: booking.stay.check_out,
            });
        }
        rows.sort_by(|a, b| a.room.cmp(&b.room));
        rows
    }

    // ── Reports ──────────────────────────────────────────────

    fn validate_window(from: NaiveDate, to: NaiveDate) -> Result<ReportWindow, EngineError> {
        if from > to {
            return Err(EngineError::InvalidWindow("window end precedes start"));
        }
        if (to - from).num_days() + 1 > MAX_REPORT_WINDOW_DAYS {
            return Err(EngineError::LimitExceeded("report window too wide"));
        }
        Ok(ReportWindow::new(from, to))
    }

    pub async fn occupancy_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<OccupancyRow>, EngineError> {
        let window = Self::validate_window(from, to)?;
        let start = Instant::now();
        let rooms = self.list_rooms().await;
        let bookings = self.store.all();
        let rows = reports::occupancy(&rooms, &bookings, &window);
        metrics::histogram!(observability::REPORT_DURATION_SECONDS, "report" => "occupancy")
            .record(start.elapsed().as_secs_f64());
        Ok(rows)
    }

    pub async fn financial_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<FinancialSummary, EngineError> {
        let window = Self::validate_window(from, to)?;
        let start = Instant::now();
        let rooms = self.list_rooms().await;
        let bookings = self.store.all();
        let summary = reports::financial(&rooms, &bookings, &window);
        metrics::histogram!(observability::REPORT_DURATION_SECONDS, "report" => "financial")
            .record(start.elapsed().as_secs_f64());
        Ok(summary)
    }

    pub async fn guest_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<GuestRow>, EngineError> {
        let window = Self::validate_window(from, to)?;
        let start = Instant::now();
        let guests = self.list_guests();
        let rooms = self.list_rooms().await;
        let bookings = self.store.all();
        let rows = reports::guest_activity(&guests, &rooms, &bookings, &window);
        metrics::histogram!(observability::REPORT_DURATION_SECONDS, "report" => "guests")
            .record(start.elapsed().as_secs_f64());
        Ok(rows)
    }

    pub fn staff_report(&self) -> Vec<StaffRow> {
        reports::staff(&self.list_employees(), today())
    }
}
