use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::model::{
    Booking, Employee, FinancialSummary, Guest, GuestRow, OccupancyRow, ReportWindow, Room,
    StaffRow,
};

// ── Aggregation over snapshots ───────────────────────────────────
//
// Pure functions: they never touch engine state and never write the
// occupied flag. Day counting here is inclusive of the check-out day,
// unlike the conflict scan.

/// Per-room occupied-day and revenue sums over active bookings.
pub fn occupancy(rooms: &[Room], bookings: &[Booking], window: &ReportWindow) -> Vec<OccupancyRow> {
    let total_days = window.total_days();
    rooms
        .iter()
        .map(|room| {
            let mut occupied_days = 0;
            let mut revenue = 0.0;
            for b in bookings {
                if b.room != room.number || !b.is_active() {
                    continue;
                }
                if !window.touches(b.stay.check_in, b.stay.check_out) {
                    continue;
                }
                let days = window.overlap_days(b.stay.check_in, b.stay.check_out);
                occupied_days += days;
                revenue += days as f64 * room.price;
            }
            let occupancy_rate = if total_days > 0 {
                occupied_days as f64 / total_days as f64 * 100.0
            } else {
                0.0
            };
            OccupancyRow {
                room: room.number.clone(),
                kind: room.kind,
                total_days,
                occupied_days,
                occupancy_rate,
                revenue,
            }
        })
        .collect()
}

/// Hotel-wide revenue and utilization over active bookings touching the
/// window. Revenue uses each room's current price.
pub fn financial(rooms: &[Room], bookings: &[Booking], window: &ReportWindow) -> FinancialSummary {
    let total_days = window.total_days();
    let prices: HashMap<&str, f64> = rooms.iter().map(|r| (r.number.as_str(), r.price)).collect();

    let mut total_revenue = 0.0;
    let mut occupied_days = 0;
    let mut booking_count = 0;
    for b in bookings {
        if !b.is_active() || !window.touches(b.stay.check_in, b.stay.check_out) {
            continue;
        }
        let Some(price) = prices.get(b.room.as_str()) else {
            continue;
        };
        let days = window.overlap_days(b.stay.check_in, b.stay.check_out);
        total_revenue += days as f64 * price;
        occupied_days += days;
        booking_count += 1;
    }

    let possible_days = rooms.len() as i64 * total_days;
    let avg_occupancy_rate = if possible_days > 0 {
        occupied_days as f64 / possible_days as f64 * 100.0
    } else {
        0.0
    };
    FinancialSummary {
        total_revenue,
        avg_occupancy_rate,
        booking_count,
    }
}

/// Per-guest activity. `booking_count` and `last_check_in` look at every
/// booking the guest ever made; nights and spend only accumulate from
/// bookings touching the window. Guests with no bookings are omitted.
pub fn guest_activity(
    guests: &[Guest],
    rooms: &[Room],
    bookings: &[Booking],
    window: &ReportWindow,
) -> Vec<GuestRow> {
    let prices: HashMap<&str, f64> = rooms.iter().map(|r| (r.number.as_str(), r.price)).collect();
    let mut rows = Vec::new();
    for guest in guests {
        let theirs: Vec<&Booking> = bookings.iter().filter(|b| b.guest_id == guest.id).collect();
        if theirs.is_empty() {
            continue;
        }
        let last_check_in = theirs.iter().map(|b| b.stay.check_in).max();
        let mut nights = 0;
        let mut amount_spent = 0.0;
        for b in &theirs {
            if !window.touches(b.stay.check_in, b.stay.check_out) {
                continue;
            }
            let stay_nights = b.stay.nights();
            nights += stay_nights;
            if let Some(price) = prices.get(b.room.as_str()) {
                amount_spent += stay_nights as f64 * price;
            }
        }
        rows.push(GuestRow {
            guest: guest.contact.full_name(),
            phone: guest.contact.phone.clone(),
            booking_count: theirs.len(),
            nights,
            last_check_in,
            amount_spent,
        });
    }
    rows.sort_by(|a, b| a.guest.cmp(&b.guest));
    rows
}

/// Staff directory with whole months of service as of `on`.
pub fn staff(employees: &[Employee], on: NaiveDate) -> Vec<StaffRow> {
    let mut rows: Vec<StaffRow> = employees
        .iter()
        .map(|e| {
            let experience_months = (on.year() - e.hired_on.year()) * 12
                + (on.month() as i32 - e.hired_on.month() as i32);
            StaffRow {
                employee: e.contact.full_name(),
                position: e.position.clone(),
                phone: e.contact.phone.clone(),
                email: e.email.clone(),
                hired_on: e.hired_on,
                experience_months,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.employee.cmp(&b.employee));
    rows
}
