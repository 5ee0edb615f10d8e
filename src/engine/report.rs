use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use ulid::Ulid;

use crate::limits::*;
use crate::model::{RoomFilter, TimeRange, UtilizationRow};
use crate::observability;

use super::{Engine, EngineError};

impl Engine {
    /// Per-room utilization over `[from, to)`: booked hours (clipped to the
    /// window) against the total Mon–Fri 08:00–20:00 seconds in the window.
    /// Rooms with no bookings still get a row; a window containing no
    /// business time yields an empty report.
    pub async fn utilization_report(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<UtilizationRow>, EngineError> {
        if to <= from {
            return Ok(Vec::new());
        }
        if (to - from).num_days() > MAX_REPORT_WINDOW_DAYS {
            return Err(EngineError::InvalidInput("report window too wide"));
        }
        let started = std::time::Instant::now();

        let total_business_seconds = business_seconds(from, to);
        if total_business_seconds == 0 {
            return Ok(Vec::new());
        }
        let total_business_hours = total_business_seconds as f64 / 3600.0;

        let window = TimeRange::new(from, to);
        let bookings = self.bookings.confirmed_in_range(&window).await?;

        let mut seconds_by_room: HashMap<Ulid, i64> = HashMap::new();
        for booking in &bookings {
            if let Some(clipped) = booking.window.clip(&window) {
                *seconds_by_room.entry(booking.room_id).or_default() +=
                    clipped.duration().num_seconds();
            }
        }

        let rooms = self.rooms.list(&RoomFilter::default()).await?;
        let rows = rooms
            .into_iter()
            .map(|room| {
                let seconds = seconds_by_room.get(&room.id).copied().unwrap_or(0);
                let hours = seconds as f64 / 3600.0;
                UtilizationRow {
                    room_id: room.id,
                    room_name: room.name,
                    total_booking_hours: round2(hours),
                    utilization_percent: round2(hours / total_business_hours),
                }
            })
            .collect();

        metrics::histogram!(observability::REPORT_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        Ok(rows)
    }
}

/// Seconds of Mon–Fri business time (08:00–20:00) inside `[from, to)`.
/// Walks calendar days; weekends contribute nothing.
pub(super) fn business_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let mut total = 0i64;
    let mut current = from;
    while current < to {
        let day = current.date_naive();
        if current.weekday().number_from_monday() <= LAST_BUSINESS_WEEKDAY {
            let day_open = day
                .and_hms_opt(BUSINESS_OPEN_HOUR, 0, 0)
                .expect("valid wall-clock time")
                .and_utc();
            let day_close = day
                .and_hms_opt(BUSINESS_CLOSE_HOUR, 0, 0)
                .expect("valid wall-clock time")
                .and_utc();
            let eff_start = current.max(day_open);
            let eff_end = to.min(day_close);
            if eff_end > eff_start {
                total += (eff_end - eff_start).num_seconds();
            }
        }
        current = day
            .succ_opt()
            .expect("date overflow")
            .and_hms_opt(0, 0, 0)
            .expect("valid wall-clock time")
            .and_utc();
    }
    total
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
