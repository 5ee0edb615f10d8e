use ulid::Ulid;

use crate::model::{Booking, BookingFilter, BookingPage, Room, RoomFilter};

use super::{Engine, EngineError};

impl Engine {
    pub async fn list_rooms(&self, filter: &RoomFilter) -> Result<Vec<Room>, EngineError> {
        self.rooms.list(filter).await
    }

    pub async fn get_booking(&self, id: Ulid) -> Result<Option<Booking>, EngineError> {
        self.bookings.get(id).await
    }

    /// Filtered, paginated booking listing, newest start time first.
    pub async fn list_bookings(
        &self,
        filter: &BookingFilter,
    ) -> Result<BookingPage, EngineError> {
        self.bookings.list(filter).await
    }
}
