use tracing::info;
use ulid::Ulid;

use crate::limits::*;
use crate::model::{Booking, BookingRequest, BookingStatus, NewRoom, Room};
use crate::observability;

use super::{validate, Engine, EngineError};

impl Engine {
    pub async fn create_room(&self, new: NewRoom) -> Result<Room, EngineError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidInput("room name is required"));
        }
        if name.len() > MAX_ROOM_NAME_LEN {
            return Err(EngineError::InvalidInput("room name too long"));
        }
        if new.capacity == 0 {
            return Err(EngineError::InvalidInput("room capacity must be positive"));
        }
        if new.amenities.len() > MAX_AMENITIES_PER_ROOM {
            return Err(EngineError::InvalidInput("too many amenities"));
        }

        let room = Room {
            id: Ulid::new(),
            name: name.to_string(),
            capacity: new.capacity,
            floor: new.floor,
            amenities: new.amenities,
        };
        let room = self.rooms.create(room).await?;
        metrics::counter!(observability::ROOMS_CREATED_TOTAL).increment(1);
        info!(room = %room.id, name = %room.name, "room created");
        Ok(room)
    }

    /// Validate → conflict-check → persist. The conflict check and the
    /// insert run under the room's lock so concurrent requests cannot both
    /// observe a free window.
    pub async fn create_booking(&self, req: &BookingRequest) -> Result<Booking, EngineError> {
        let fields = validate::require_fields(req).map_err(count_validation_failure)?;

        let room = self
            .rooms
            .get(fields.room_id)
            .await?
            .ok_or(EngineError::RoomNotFound(fields.room_id))?;

        let window = validate::parse_window(fields.start_time, fields.end_time)
            .map_err(count_validation_failure)?;

        let lock = self.room_lock(room.id);
        let _guard = lock.lock().await;

        if let Some(existing) = self.bookings.find_overlap(room.id, &window).await? {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(EngineError::Conflict(existing.id));
        }

        let booking = Booking {
            id: Ulid::new(),
            room_id: room.id,
            title: fields.title.to_string(),
            organizer_email: fields.organizer_email.to_string(),
            window,
            status: BookingStatus::Confirmed,
        };
        let booking = self.bookings.create(booking).await?;
        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
        info!(
            booking = %booking.id,
            room = %booking.room_id,
            start = %booking.window.start,
            end = %booking.window.end,
            "booking confirmed"
        );
        Ok(booking)
    }

    /// Cancelling an already-cancelled booking is a no-op returning the
    /// booking unchanged. Otherwise the transition is allowed only while
    /// `now <= start - cancel_cutoff`.
    pub async fn cancel_booking(&self, id: Ulid) -> Result<Booking, EngineError> {
        let booking = self
            .bookings
            .get(id)
            .await?
            .ok_or(EngineError::BookingNotFound(id))?;

        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        let cutoff = booking.window.start - self.config().cancel_cutoff;
        if self.now() > cutoff {
            return Err(EngineError::TooLateToCancel(id));
        }

        let booking = self
            .bookings
            .update_status(id, BookingStatus::Cancelled)
            .await?;
        metrics::counter!(observability::BOOKINGS_CANCELLED_TOTAL).increment(1);
        info!(booking = %booking.id, room = %booking.room_id, "booking cancelled");
        Ok(booking)
    }
}

fn count_validation_failure(err: EngineError) -> EngineError {
    metrics::counter!(observability::VALIDATION_FAILURES_TOTAL).increment(1);
    err
}
