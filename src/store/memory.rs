use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ulid::Ulid;

use crate::engine::EngineError;
use crate::limits::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use crate::model::{
    Booking, BookingFilter, BookingPage, BookingStatus, IdempotencyRecord, IdempotencyState,
    Room, RoomFilter, TimeRange,
};

use super::{BookingStore, IdempotencyStore, RoomStore};

#[derive(Default)]
pub struct MemoryRoomStore {
    rooms: DashMap<Ulid, Room>,
    /// Lowercased name → room id. Claiming a name goes through this index
    /// so duplicate detection is atomic.
    names: DashMap<String, Ulid>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn create(&self, room: Room) -> Result<Room, EngineError> {
        match self.names.entry(room.name.to_lowercase()) {
            Entry::Occupied(_) => return Err(EngineError::DuplicateName(room.name)),
            Entry::Vacant(slot) => {
                slot.insert(room.id);
            }
        }
        self.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn get(&self, id: Ulid) -> Result<Option<Room>, EngineError> {
        Ok(self.rooms.get(&id).map(|e| e.value().clone()))
    }

    async fn list(&self, filter: &RoomFilter) -> Result<Vec<Room>, EngineError> {
        let mut rooms: Vec<Room> = self
            .rooms
            .iter()
            .map(|e| e.value().clone())
            .filter(|r| filter.min_capacity.is_none_or(|min| r.capacity >= min))
            .filter(|r| {
                filter
                    .amenity
                    .as_deref()
                    .is_none_or(|a| r.has_amenity(a))
            })
            .collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rooms)
    }
}

#[derive(Default)]
pub struct MemoryBookingStore {
    bookings: DashMap<Ulid, Booking>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn create(&self, booking: Booking) -> Result<Booking, EngineError> {
        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: Ulid) -> Result<Option<Booking>, EngineError> {
        Ok(self.bookings.get(&id).map(|e| e.value().clone()))
    }

    async fn find_overlap(
        &self,
        room_id: Ulid,
        window: &TimeRange,
    ) -> Result<Option<Booking>, EngineError> {
        Ok(self
            .bookings
            .iter()
            .map(|e| e.value().clone())
            .find(|b| b.room_id == room_id && b.is_confirmed() && b.window.overlaps(window)))
    }

    async fn list(&self, filter: &BookingFilter) -> Result<BookingPage, EngineError> {
        let mut matches: Vec<Booking> = self
            .bookings
            .iter()
            .map(|e| e.value().clone())
            .filter(|b| filter.room_id.is_none_or(|rid| b.room_id == rid))
            .filter(|b| filter.from.is_none_or(|from| b.window.end >= from))
            .filter(|b| filter.to.is_none_or(|to| b.window.start <= to))
            .collect();
        matches.sort_by(|a, b| b.window.start.cmp(&a.window.start));

        let total = matches.len();
        let offset = filter.offset.unwrap_or(0);
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_LIST_LIMIT);
        let items = matches
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();
        Ok(BookingPage { items, total })
    }

    async fn confirmed_in_range(
        &self,
        window: &TimeRange,
    ) -> Result<Vec<Booking>, EngineError> {
        Ok(self
            .bookings
            .iter()
            .map(|e| e.value().clone())
            .filter(|b| b.is_confirmed() && b.window.overlaps(window))
            .collect())
    }

    async fn update_status(
        &self,
        id: Ulid,
        status: BookingStatus,
    ) -> Result<Booking, EngineError> {
        match self.bookings.get_mut(&id) {
            Some(mut entry) => {
                entry.status = status;
                Ok(entry.clone())
            }
            None => Err(EngineError::BookingNotFound(id)),
        }
    }
}

#[derive(Default)]
pub struct MemoryIdempotencyStore {
    records: DashMap<String, IdempotencyRecord>,
}

impl MemoryIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdempotencyStore for MemoryIdempotencyStore {
    async fn get(&self, key: &str) -> Result<Option<IdempotencyRecord>, EngineError> {
        Ok(self.records.get(key).map(|e| e.value().clone()))
    }

    async fn try_create_lock(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        // Insert-if-absent through the entry API: exactly one concurrent
        // caller can observe the vacant slot.
        match self.records.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(IdempotencyRecord {
                    key: key.to_string(),
                    state: IdempotencyState::Locked,
                    response_code: None,
                    response_body: None,
                    created_at: now,
                    completed_at: None,
                });
                Ok(true)
            }
        }
    }

    async fn complete(
        &self,
        key: &str,
        code: u16,
        body: String,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        if let Some(mut record) = self.records.get_mut(key) {
            record.state = IdempotencyState::Completed;
            record.response_code = Some(code);
            record.response_body = Some(body);
            record.completed_at = Some(now);
        }
        Ok(())
    }

    async fn purge_completed_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, EngineError> {
        let stale: Vec<String> = self
            .records
            .iter()
            .filter(|e| {
                e.state == IdempotencyState::Completed
                    && e.completed_at.is_some_and(|t| t < cutoff)
            })
            .map(|e| e.key().clone())
            .collect();
        let mut purged = 0;
        for key in stale {
            if self.records.remove(&key).is_some() {
                purged += 1;
            }
        }
        Ok(purged)
    }
}
