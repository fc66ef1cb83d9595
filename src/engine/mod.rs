mod availability;
mod conflict;
mod error;
mod mutations;
mod queries;
mod reports;
mod store;

pub use availability::{free_ranges, merge_spans, subtract_spans};
pub use error::EngineError;
pub use reports::{financial, guest_activity, occupancy, staff};

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::model::{Employee, EmployeeId, Guest, GuestId, Room};
use crate::storage::Storage;

use store::BookingStore;

pub type SharedRoom = Arc<RwLock<Room>>;

/// Business knobs that are policy, not invariants.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How many days before today a check-in may still start. 0 = today
    /// onward.
    pub max_past_checkin_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_past_checkin_days: 0,
        }
    }
}

impl EngineConfig {
    /// Read knobs from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let max_past_checkin_days = std::env::var("INNKEEP_MAX_PAST_CHECKIN_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        Self {
            max_past_checkin_days,
        }
    }
}

pub struct Engine {
    /// Room registry; each room's write lock serializes the writers for
    /// that room number.
    rooms: DashMap<String, SharedRoom>,
    store: BookingStore,
    guests: DashMap<GuestId, Guest>,
    employees: DashMap<EmployeeId, Employee>,
    storage: Arc<dyn Storage>,
    config: EngineConfig,
}

impl Engine {
    /// Empty engine over the given storage handle.
    pub fn new(storage: Arc<dyn Storage>, config: EngineConfig) -> Self {
        Self {
            rooms: DashMap::new(),
            store: BookingStore::new(),
            guests: DashMap::new(),
            employees: DashMap::new(),
            storage,
            config,
        }
    }

    /// Hydrate an engine from everything the storage holds.
    pub async fn open(storage: Arc<dyn Storage>, config: EngineConfig) -> Result<Self, EngineError> {
        let snapshot = storage.load().await?;
        let engine = Self::new(storage, config);
        for room in snapshot.rooms {
            engine
                .rooms
                .insert(room.number.clone(), Arc::new(RwLock::new(room)));
        }
        for guest in snapshot.guests {
            engine.guests.insert(guest.id, guest);
        }
        for employee in snapshot.employees {
            engine.employees.insert(employee.id, employee);
        }
        for booking in snapshot.bookings {
            engine.store.insert(booking)?;
        }
        Ok(engine)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn booking_count(&self) -> usize {
        self.store.len()
    }

    fn room(&self, number: &str) -> Result<SharedRoom, EngineError> {
        self.rooms
            .get(number)
            .map(|e| e.value().clone())
            .ok_or_else(|| EngineError::RoomNotFound(number.to_string()))
    }
}
