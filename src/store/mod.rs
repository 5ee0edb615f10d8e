//! Narrow storage contracts the engine consumes. The engine never reaches
//! into a backend directly; any backend that honors these contracts (and the
//! atomicity requirement on `try_create_lock`) can sit behind it.

mod memory;

pub use memory::{MemoryBookingStore, MemoryIdempotencyStore, MemoryRoomStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ulid::Ulid;

use crate::engine::EngineError;
use crate::model::{
    Booking, BookingFilter, BookingPage, BookingStatus, IdempotencyRecord, Room, RoomFilter,
    TimeRange,
};

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Persist a room. Fails with `DuplicateName` when another room already
    /// holds the name, compared case-insensitively.
    async fn create(&self, room: Room) -> Result<Room, EngineError>;

    async fn get(&self, id: Ulid) -> Result<Option<Room>, EngineError>;

    /// All rooms matching the filter, ordered by name.
    async fn list(&self, filter: &RoomFilter) -> Result<Vec<Room>, EngineError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, booking: Booking) -> Result<Booking, EngineError>;

    async fn get(&self, id: Ulid) -> Result<Option<Booking>, EngineError>;

    /// Some confirmed booking on `room_id` whose window overlaps `window`,
    /// if one exists. Which conflicting booking is returned is unspecified.
    async fn find_overlap(
        &self,
        room_id: Ulid,
        window: &TimeRange,
    ) -> Result<Option<Booking>, EngineError>;

    /// Filtered page ordered by start time descending, plus the total match
    /// count before pagination.
    async fn list(&self, filter: &BookingFilter) -> Result<BookingPage, EngineError>;

    /// All confirmed bookings overlapping `window`.
    async fn confirmed_in_range(&self, window: &TimeRange) -> Result<Vec<Booking>, EngineError>;

    async fn update_status(
        &self,
        id: Ulid,
        status: BookingStatus,
    ) -> Result<Booking, EngineError>;
}

#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<IdempotencyRecord>, EngineError>;

    /// Atomically create a Locked record for `key`. Returns false when the
    /// key already exists. First writer wins; this must be linearizable with
    /// respect to concurrent callers on the same key.
    async fn try_create_lock(&self, key: &str, now: DateTime<Utc>)
        -> Result<bool, EngineError>;

    /// Transition `key` from Locked to Completed, storing the outcome.
    /// No-op when the key is unknown.
    async fn complete(
        &self,
        key: &str,
        code: u16,
        body: String,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError>;

    /// Delete Completed records whose completion is older than `cutoff`.
    /// Returns the number of records removed.
    async fn purge_completed_before(&self, cutoff: DateTime<Utc>)
        -> Result<usize, EngineError>;
}
