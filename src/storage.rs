use async_trait::async_trait;
use dashmap::DashMap;

use crate::model::{Booking, BookingId, Employee, EmployeeId, Guest, GuestId, Room};

/// Opaque failure from the persistence collaborator. The engine surfaces it
/// without interpreting it.
#[derive(Debug, Clone)]
pub struct StorageError(pub String);

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage error: {}", self.0)
    }
}

impl std::error::Error for StorageError {}

/// Whole-state snapshot used to hydrate an engine at startup.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub rooms: Vec<Room>,
    pub guests: Vec<Guest>,
    pub employees: Vec<Employee>,
    pub bookings: Vec<Booking>,
}

/// Repository-style persistence boundary. The engine owns the invariants;
/// implementations only durably mirror rows.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn load(&self) -> Result<Snapshot, StorageError>;

    async fn insert_room(&self, room: &Room) -> Result<(), StorageError>;
    async fn update_room(&self, room: &Room) -> Result<(), StorageError>;
    async fn delete_room(&self, number: &str) -> Result<(), StorageError>;

    async fn insert_guest(&self, guest: &Guest) -> Result<(), StorageError>;
    async fn update_guest(&self, guest: &Guest) -> Result<(), StorageError>;

    async fn insert_employee(&self, employee: &Employee) -> Result<(), StorageError>;
    async fn delete_employee(&self, id: EmployeeId) -> Result<(), StorageError>;

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StorageError>;
    async fn update_booking(&self, booking: &Booking) -> Result<(), StorageError>;
    async fn delete_booking(&self, id: BookingId) -> Result<(), StorageError>;
}

/// In-memory reference implementation, also the test double.
#[derive(Default)]
pub struct MemoryStorage {
    rooms: DashMap<String, Room>,
    guests: DashMap<GuestId, Guest>,
    employees: DashMap<EmployeeId, Employee>,
    bookings: DashMap<BookingId, Booking>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn booking_rows(&self) -> usize {
        self.bookings.len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self) -> Result<Snapshot, StorageError> {
        Ok(Snapshot {
            rooms: self.rooms.iter().map(|e| e.value().clone()).collect(),
            guests: self.guests.iter().map(|e| e.value().clone()).collect(),
            employees: self.employees.iter().map(|e| e.value().clone()).collect(),
            bookings: self.bookings.iter().map(|e| e.value().clone()).collect(),
        })
    }

    async fn insert_room(&self, room: &Room) -> Result<(), StorageError> {
        self.rooms.insert(room.number.clone(), room.clone());
        Ok(())
    }

    async fn update_room(&self, room: &Room) -> Result<(), StorageError> {
        if !self.rooms.contains_key(&room.number) {
            return Err(StorageError(format!("no room row {}", room.number)));
        }
        self.rooms.insert(room.number.clone(), room.clone());
        Ok(())
    }

    async fn delete_room(&self, number: &str) -> Result<(), StorageError> {
        self.rooms.remove(number);
        Ok(())
    }

    async fn insert_guest(&self, guest: &Guest) -> Result<(), StorageError> {
        self.guests.insert(guest.id, guest.clone());
        Ok(())
    }

    async fn update_guest(&self, guest: &Guest) -> Result<(), StorageError> {
        if !self.guests.contains_key(&guest.id) {
            return Err(StorageError(format!("no guest row {}", guest.id)));
        }
        self.guests.insert(guest.id, guest.clone());
        Ok(())
    }

    async fn insert_employee(&self, employee: &Employee) -> Result<(), StorageError> {
        self.employees.insert(employee.id, employee.clone());
        Ok(())
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<(), StorageError> {
        self.employees.remove(&id);
        Ok(())
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StorageError> {
        self.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update_booking(&self, booking: &Booking) -> Result<(), StorageError> {
        if !self.bookings.contains_key(&booking.id) {
            return Err(StorageError(format!("no booking row {}", booking.id)));
        }
        self.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn delete_booking(&self, id: BookingId) -> Result<(), StorageError> {
        self.bookings.remove(&id);
        Ok(())
    }
}
