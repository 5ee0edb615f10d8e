//! Domain limits. Everything here is a hard bound enforced by the engine.

/// Minimum booking length in minutes.
pub const MIN_BOOKING_MINUTES: i64 = 15;

/// Maximum booking length in minutes (4 hours).
pub const MAX_BOOKING_MINUTES: i64 = 240;

/// First hour of the business day (inclusive start bound).
pub const BUSINESS_OPEN_HOUR: u32 = 8;

/// Hour the business day closes. A booking may end exactly at this hour
/// but may not start at or after it.
pub const BUSINESS_CLOSE_HOUR: u32 = 20;

/// Highest ISO weekday allowed (1 = Monday .. 5 = Friday).
pub const LAST_BUSINESS_WEEKDAY: u32 = 5;

pub const MAX_ROOM_NAME_LEN: usize = 128;
pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_AMENITIES_PER_ROOM: usize = 32;

/// Listing page size when the caller does not specify one.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Hard cap on the listing page size.
pub const MAX_LIST_LIMIT: usize = 100;

/// Widest allowed utilization report window, in days.
pub const MAX_REPORT_WINDOW_DAYS: i64 = 366;
