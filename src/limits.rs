//! Hard bounds enforced by the engine.

/// Nightly price cap.
pub const MAX_NIGHTLY_PRICE: f64 = 1_000_000.0;

/// Beds per room.
pub const MAX_ROOM_CAPACITY: u32 = 5;

/// Room numbers are floor digit + two door digits.
pub const MIN_FLOOR: u32 = 1;
pub const MAX_FLOOR: u32 = 5;
pub const MIN_DOOR: u32 = 1;
pub const MAX_DOOR: u32 = 50;

/// Name fields (guests, employees).
pub const MAX_NAME_LEN: usize = 128;

/// Longest bookable stay.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Widest report or availability query window, in days.
pub const MAX_REPORT_WINDOW_DAYS: i64 = 3_660;
