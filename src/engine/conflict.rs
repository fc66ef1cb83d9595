use chrono::{Duration, NaiveDate};

use crate::limits::*;
use crate::model::{Booking, BookingId, Stay};

use super::{EngineConfig, EngineError};

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Validate raw dates and assemble the stay.
pub(crate) fn validate_stay(
    check_in: NaiveDate,
    check_out: NaiveDate,
    config: &EngineConfig,
) -> Result<Stay, EngineError> {
    if check_in >= check_out {
        return Err(EngineError::InvalidBooking("check-out must be after check-in"));
    }
    if (check_out - check_in).num_days() > MAX_STAY_NIGHTS {
        return Err(EngineError::LimitExceeded("stay too long"));
    }
    let earliest = today() - Duration::days(config.max_past_checkin_days);
    if check_in < earliest {
        return Err(EngineError::InvalidBooking("check-in too far in the past"));
    }
    Ok(Stay::new(check_in, check_out))
}

/// Room numbers are three digits: floor 1–5 followed by door 01–50.
pub(crate) fn validate_room_number(number: &str) -> Result<(), EngineError> {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
    if number.len() != 3 || digits.len() != 3 {
        return Err(EngineError::InvalidRoom {
            number: number.to_string(),
            reason: "number must be three digits",
        });
    }
    let floor = digits[0];
    let door = digits[1] * 10 + digits[2];
    if !(MIN_FLOOR..=MAX_FLOOR).contains(&floor) {
        return Err(EngineError::InvalidRoom {
            number: number.to_string(),
            reason: "floor out of range",
        });
    }
    if !(MIN_DOOR..=MAX_DOOR).contains(&door) {
        return Err(EngineError::InvalidRoom {
            number: number.to_string(),
            reason: "door out of range",
        });
    }
    Ok(())
}

pub(crate) fn validate_room_fields(
    number: &str,
    price: f64,
    capacity: u32,
) -> Result<(), EngineError> {
    validate_room_number(number)?;
    if !price.is_finite() || price <= 0.0 {
        return Err(EngineError::InvalidRoom {
            number: number.to_string(),
            reason: "price must be positive",
        });
    }
    if price > MAX_NIGHTLY_PRICE {
        return Err(EngineError::InvalidRoom {
            number: number.to_string(),
            reason: "price above cap",
        });
    }
    if capacity == 0 || capacity > MAX_ROOM_CAPACITY {
        return Err(EngineError::InvalidRoom {
            number: number.to_string(),
            reason: "capacity out of range",
        });
    }
    Ok(())
}

/// Reject the candidate stay if any active booking on the room overlaps it.
/// `exclude` skips a booking's own id when re-validating an edit.
pub(crate) fn check_no_conflict(
    existing: &[Booking],
    stay: &Stay,
    exclude: Option<BookingId>,
) -> Result<(), EngineError> {
    for b in existing {
        if exclude == Some(b.id) || !b.is_active() {
            continue;
        }
        if b.stay.conflicts_with(stay) {
            return Err(EngineError::Unavailable {
                number: b.room.clone(),
                conflicting: b.id,
            });
        }
    }
    Ok(())
}
