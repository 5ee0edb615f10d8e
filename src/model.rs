use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open interval `[start, end)` over UTC timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "TimeRange start must be before end");
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersect with `window`, or `None` when the ranges don't overlap.
    pub fn clip(&self, window: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(window.start);
        let end = self.end.min(window.end);
        if start < end {
            Some(TimeRange { start, end })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Ulid,
    /// Unique across rooms, compared case-insensitively.
    pub name: String,
    pub capacity: u32,
    pub floor: i32,
    pub amenities: BTreeSet<String>,
}

impl Room {
    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities
            .iter()
            .any(|a| a.eq_ignore_ascii_case(amenity))
    }
}

/// Input for room creation. The engine assigns the id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRoom {
    pub name: String,
    pub capacity: u32,
    pub floor: i32,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub room_id: Ulid,
    pub title: String,
    pub organizer_email: String,
    pub window: TimeRange,
    pub status: BookingStatus,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// Raw create-booking input as handed over by the transport shell.
/// All fields optional — presence is a validator concern, and timestamps
/// arrive as strings so unparsable input is rejected with a typed error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    pub room_id: Option<Ulid>,
    pub title: Option<String>,
    pub organizer_email: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub min_capacity: Option<u32>,
    /// Case-insensitive amenity membership.
    pub amenity: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub room_id: Option<Ulid>,
    /// Keep bookings ending at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Keep bookings starting at or before this instant.
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One page of bookings plus the total match count before pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPage {
    pub items: Vec<Booking>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdempotencyState {
    Locked,
    Completed,
}

/// One record per client idempotency key. `response_code`/`response_body`
/// are present iff the record is Completed; once completed the record is
/// never revisited, only replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub key: String,
    pub state: IdempotencyState,
    pub response_code: Option<u16>,
    pub response_body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Per-room row of the utilization report. Hours and percent are rounded
/// to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationRow {
    pub room_id: Ulid,
    pub room_name: String,
    pub total_booking_hours: f64,
    pub utilization_percent: f64,
}
