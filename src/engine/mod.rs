mod error;
mod idempotency;
mod mutations;
mod queries;
mod report;
mod validate;

pub use error::EngineError;
pub use idempotency::{Begin, CreateReply};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use ulid::Ulid;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::store::{
    BookingStore, IdempotencyStore, MemoryBookingStore, MemoryIdempotencyStore,
    MemoryRoomStore, RoomStore,
};

/// The booking domain engine. Stateless apart from the per-room lock table;
/// all entities live behind the storage contracts.
pub struct Engine {
    pub(super) rooms: Arc<dyn RoomStore>,
    pub(super) bookings: Arc<dyn BookingStore>,
    pub(super) idempotency: Arc<dyn IdempotencyStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    /// Conflict check + insert must be one logical section per room; this
    /// table serializes them. Lock entries are created lazily and never
    /// removed — one small allocation per room ever booked.
    room_locks: DashMap<Ulid, Arc<Mutex<()>>>,
}

impl Engine {
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        bookings: Arc<dyn BookingStore>,
        idempotency: Arc<dyn IdempotencyStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            rooms,
            bookings,
            idempotency,
            clock,
            config,
            room_locks: DashMap::new(),
        }
    }

    /// Engine over the bundled in-memory stores.
    pub fn in_memory(clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Self::new(
            Arc::new(MemoryRoomStore::new()),
            Arc::new(MemoryBookingStore::new()),
            Arc::new(MemoryIdempotencyStore::new()),
            clock,
            config,
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(super) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(super) fn room_lock(&self, room_id: Ulid) -> Arc<Mutex<()>> {
        self.room_locks
            .entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
