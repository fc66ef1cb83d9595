use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

pub type GuestId = Ulid;
pub type BookingId = Ulid;
pub type EmployeeId = Ulid;

/// Whole-day stay `[check_in, check_out)` — the check-out day is free for
/// same-day turnover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Stay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        debug_assert!(check_in < check_out, "Stay check-in must precede check-out");
        Self { check_in, check_out }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Exclusive check-out: a stay ending on day D never conflicts with one
    /// starting on D.
    pub fn conflicts_with(&self, other: &Stay) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }
}

/// Closed reporting window `[from, to]` — both endpoint days count.
///
/// Reporting deliberately counts the check-out day as occupied, unlike
/// conflict detection. Keep the two conventions apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        debug_assert!(from <= to, "ReportWindow must not be reversed");
        Self { from, to }
    }

    pub fn total_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Closed-day overlap test against `[start, end]`.
    pub fn touches(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.to && self.from <= end
    }

    /// Days shared by the window and `[start, end]`, both ends inclusive.
    pub fn overlap_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let lo = self.from.max(start);
        let hi = self.to.min(end);
        ((hi - lo).num_days() + 1).max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    Standard,
    JuniorSuite,
    Suite,
    Family,
    Business,
}

impl RoomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKind::Standard => "standard",
            RoomKind::JuniorSuite => "junior_suite",
            RoomKind::Suite => "suite",
            RoomKind::Family => "family",
            RoomKind::Business => "business",
        }
    }
}

/// A lodging unit. `occupied` is a cached projection of booking state,
/// written only by the engine — never by reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Three digits: floor (1–5) then door (01–50).
    pub number: String,
    pub kind: RoomKind,
    pub price: f64,
    pub capacity: u32,
    pub occupied: bool,
}

/// Person fields shared by guests and employees — composition, not a base
/// type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub patronymic: Option<String>,
    pub phone: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        match &self.patronymic {
            Some(p) if !p.is_empty() => {
                format!("{} {} {}", self.last_name, self.first_name, p)
            }
            _ => format!("{} {}", self.last_name, self.first_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    pub contact: Contact,
    /// Identity document; registration de-duplicates on it.
    pub passport: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub contact: Contact,
    pub position: String,
    pub email: String,
    pub hired_on: NaiveDate,
}

/// Lifecycle of a booking. Terminal states keep the record; they only stop
/// holding the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingState {
    Active,
    CheckedOut,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub guest_id: GuestId,
    pub room: String,
    pub stay: Stay,
    pub state: BookingState,
}

impl Booking {
    /// Active bookings are the only ones that occupy a room for conflict
    /// detection.
    pub fn is_active(&self) -> bool {
        matches!(self.state, BookingState::Active)
    }
}

// ── Report row types ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyRow {
    pub room: String,
    pub kind: RoomKind,
    pub total_days: i64,
    pub occupied_days: i64,
    pub occupancy_rate: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_revenue: f64,
    pub avg_occupancy_rate: f64,
    pub booking_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestRow {
    pub guest: String,
    pub phone: String,
    pub booking_count: usize,
    pub nights: i64,
    pub last_check_in: Option<NaiveDate>,
    pub amount_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffRow {
    pub employee: String,
    pub position: String,
    pub phone: String,
    pub email: String,
    pub hired_on: NaiveDate,
    pub experience_months: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentGuestRow {
    pub guest: String,
    pub phone: String,
    pub room: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}
