use crate::model::{BookingId, EmployeeId, GuestId};
use crate::storage::StorageError;

#[derive(Debug)]
pub enum EngineError {
    InvalidRoom {
        number: String,
        reason: &'static str,
    },
    InvalidBooking(&'static str),
    InvalidGuest(&'static str),
    InvalidEmployee(&'static str),
    InvalidWindow(&'static str),
    DuplicateRoom(String),
    RoomNotFound(String),
    BookingNotFound(BookingId),
    GuestNotFound(GuestId),
    EmployeeNotFound(EmployeeId),
    RoomInUse(String),
    Unavailable {
        number: String,
        conflicting: BookingId,
    },
    InvalidState(BookingId),
    LimitExceeded(&'static str),
    Storage(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidRoom { number, reason } => {
                write!(f, "invalid room {number}: {reason}")
            }
            EngineError::InvalidBooking(reason) => write!(f, "invalid booking: {reason}"),
            EngineError::InvalidGuest(reason) => write!(f, "invalid guest: {reason}"),
            EngineError::InvalidEmployee(reason) => write!(f, "invalid employee: {reason}"),
            EngineError::InvalidWindow(reason) => write!(f, "invalid window: {reason}"),
            EngineError::DuplicateRoom(number) => write!(f, "room already exists: {number}"),
            EngineError::RoomNotFound(number) => write!(f, "room not found: {number}"),
            EngineError::BookingNotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::GuestNotFound(id) => write!(f, "guest not found: {id}"),
            EngineError::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            EngineError::RoomInUse(number) => {
                write!(f, "cannot remove room {number}: active booking references it")
            }
            EngineError::Unavailable { number, conflicting } => {
                write!(f, "room {number} unavailable: conflicts with booking {conflicting}")
            }
            EngineError::InvalidState(id) => {
                write!(f, "booking {id} is not in a state that allows this operation")
            }
            EngineError::LimitExceeded(reason) => write!(f, "limit exceeded: {reason}"),
            EngineError::Storage(e) => write!(f, "storage failure: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<StorageError> for EngineError {
    fn from(e: StorageError) -> Self {
        EngineError::Storage(e.0)
    }
}
