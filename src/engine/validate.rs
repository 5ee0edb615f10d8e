use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use ulid::Ulid;

use crate::limits::*;
use crate::model::{BookingRequest, TimeRange};

use super::EngineError;

/// Request fields after presence/shape checks, before temporal parsing.
#[derive(Debug)]
pub(super) struct BookingFields<'a> {
    pub room_id: Ulid,
    pub title: &'a str,
    pub organizer_email: &'a str,
    pub start_time: &'a str,
    pub end_time: &'a str,
}

/// Presence and shape checks in fixed order, so the first violated rule is
/// the one reported: roomId → title → organizerEmail → timestamps.
pub(super) fn require_fields(req: &BookingRequest) -> Result<BookingFields<'_>, EngineError> {
    let room_id = req
        .room_id
        .ok_or(EngineError::InvalidInput("roomId is required"))?;

    let title = req.title.as_deref().unwrap_or("");
    if title.trim().is_empty() {
        return Err(EngineError::InvalidInput("booking title is required"));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(EngineError::InvalidInput("booking title too long"));
    }

    let organizer_email = req.organizer_email.as_deref().unwrap_or("");
    if !is_valid_email(organizer_email) {
        return Err(EngineError::InvalidInput("valid organizerEmail is required"));
    }

    let (Some(start_time), Some(end_time)) =
        (req.start_time.as_deref(), req.end_time.as_deref())
    else {
        return Err(EngineError::InvalidInput("startTime and endTime are required"));
    };

    Ok(BookingFields {
        room_id,
        title,
        organizer_email,
        start_time,
        end_time,
    })
}

/// Temporal checks in fixed order: parse → chronology → duration bounds →
/// weekday bounds → business-hour bounds. Returns the validated window.
pub(super) fn parse_window(start: &str, end: &str) -> Result<TimeRange, EngineError> {
    let start = parse_timestamp(start).ok_or(EngineError::InvalidInput(
        "invalid startTime format (ISO 8601 expected)",
    ))?;
    let end = parse_timestamp(end).ok_or(EngineError::InvalidInput(
        "invalid endTime format (ISO 8601 expected)",
    ))?;

    if start >= end {
        return Err(EngineError::InvalidInput(
            "startTime must be strictly before endTime",
        ));
    }

    let minutes = (end - start).num_minutes();
    if minutes < MIN_BOOKING_MINUTES {
        return Err(EngineError::InvalidInput(
            "booking duration must be at least 15 minutes",
        ));
    }
    if minutes > MAX_BOOKING_MINUTES {
        return Err(EngineError::InvalidInput(
            "booking duration cannot exceed 4 hours",
        ));
    }

    if start.weekday().number_from_monday() > LAST_BUSINESS_WEEKDAY
        || end.weekday().number_from_monday() > LAST_BUSINESS_WEEKDAY
    {
        return Err(EngineError::InvalidInput(
            "bookings are allowed only Monday to Friday",
        ));
    }

    let start_ok = start.hour() >= BUSINESS_OPEN_HOUR && start.hour() < BUSINESS_CLOSE_HOUR;
    // An end exactly on the closing hour is allowed; anything past it is not.
    let end_ok = (end.hour() >= BUSINESS_OPEN_HOUR && end.hour() < BUSINESS_CLOSE_HOUR)
        || (end.hour() == BUSINESS_CLOSE_HOUR && end.minute() == 0);
    if !start_ok || !end_ok {
        return Err(EngineError::InvalidInput(
            "bookings allowed only between 08:00 and 20:00",
        ));
    }

    Ok(TimeRange::new(start, end))
}

/// Accept RFC 3339, or an offset-less ISO 8601 timestamp taken as UTC.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// `local@domain.tld` shape: exactly one `@`, a dot-separated domain with
/// non-empty parts, no whitespace.
fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: Option<&str>, email: Option<&str>) -> BookingRequest {
        BookingRequest {
            room_id: Some(Ulid::new()),
            title: title.map(str::to_string),
            organizer_email: email.map(str::to_string),
            start_time: Some("2026-03-02T10:00:00Z".into()),
            end_time: Some("2026-03-02T11:00:00Z".into()),
        }
    }

    fn invalid_input_message(err: EngineError) -> &'static str {
        match err {
            EngineError::InvalidInput(msg) => msg,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn missing_room_id_reported_first() {
        let req = BookingRequest::default();
        let msg = invalid_input_message(require_fields(&req).unwrap_err());
        assert_eq!(msg, "roomId is required");
    }

    #[test]
    fn missing_title_beats_bad_email() {
        // Both title and email invalid: the title error wins per check order.
        let req = request(None, Some("not-an-email"));
        let msg = invalid_input_message(require_fields(&req).unwrap_err());
        assert_eq!(msg, "booking title is required");
    }

    #[test]
    fn blank_title_rejected() {
        let req = request(Some("   "), Some("a@b.co"));
        let msg = invalid_input_message(require_fields(&req).unwrap_err());
        assert_eq!(msg, "booking title is required");
    }

    #[test]
    fn bad_email_beats_missing_timestamps() {
        let mut req = request(Some("Sync"), Some("nope"));
        req.start_time = None;
        let msg = invalid_input_message(require_fields(&req).unwrap_err());
        assert_eq!(msg, "valid organizerEmail is required");
    }

    #[test]
    fn missing_timestamps_rejected() {
        let mut req = request(Some("Sync"), Some("a@b.co"));
        req.end_time = None;
        let msg = invalid_input_message(require_fields(&req).unwrap_err());
        assert_eq!(msg, "startTime and endTime are required");
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.co"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at.example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@domain."));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaced user@example.com"));
    }

    #[test]
    fn unparsable_start_rejected() {
        let msg = invalid_input_message(
            parse_window("tomorrow", "2026-03-02T11:00:00Z").unwrap_err(),
        );
        assert_eq!(msg, "invalid startTime format (ISO 8601 expected)");
    }

    #[test]
    fn unparsable_end_rejected() {
        let msg = invalid_input_message(
            parse_window("2026-03-02T10:00:00Z", "soon").unwrap_err(),
        );
        assert_eq!(msg, "invalid endTime format (ISO 8601 expected)");
    }

    #[test]
    fn offsetless_timestamps_taken_as_utc() {
        let window = parse_window("2026-03-02T10:00:00", "2026-03-02T11:00").unwrap();
        assert_eq!(window.duration(), chrono::Duration::hours(1));
    }

    #[test]
    fn start_must_precede_end() {
        let msg = invalid_input_message(
            parse_window("2026-03-02T11:00:00Z", "2026-03-02T10:00:00Z").unwrap_err(),
        );
        assert_eq!(msg, "startTime must be strictly before endTime");

        let msg = invalid_input_message(
            parse_window("2026-03-02T10:00:00Z", "2026-03-02T10:00:00Z").unwrap_err(),
        );
        assert_eq!(msg, "startTime must be strictly before endTime");
    }

    #[test]
    fn duration_bounds() {
        let msg = invalid_input_message(
            parse_window("2026-03-02T10:00:00Z", "2026-03-02T10:14:00Z").unwrap_err(),
        );
        assert_eq!(msg, "booking duration must be at least 15 minutes");

        // 15 minutes exactly is allowed.
        parse_window("2026-03-02T10:00:00Z", "2026-03-02T10:15:00Z").unwrap();

        // 4 hours exactly is allowed.
        parse_window("2026-03-02T10:00:00Z", "2026-03-02T14:00:00Z").unwrap();

        let msg = invalid_input_message(
            parse_window("2026-03-02T10:00:00Z", "2026-03-02T14:30:00Z").unwrap_err(),
        );
        assert_eq!(msg, "booking duration cannot exceed 4 hours");
    }

    #[test]
    fn weekend_rejected() {
        // 2026-03-07 is a Saturday.
        let msg = invalid_input_message(
            parse_window("2026-03-07T10:00:00Z", "2026-03-07T11:00:00Z").unwrap_err(),
        );
        assert_eq!(msg, "bookings are allowed only Monday to Friday");
    }

    #[test]
    fn business_hour_bounds() {
        // Before opening.
        let msg = invalid_input_message(
            parse_window("2026-03-02T07:00:00Z", "2026-03-02T09:00:00Z").unwrap_err(),
        );
        assert_eq!(msg, "bookings allowed only between 08:00 and 20:00");

        // Opening boundary is a valid start.
        parse_window("2026-03-02T08:00:00Z", "2026-03-02T09:00:00Z").unwrap();

        // Ending exactly at close is allowed.
        parse_window("2026-03-02T16:00:00Z", "2026-03-02T20:00:00Z").unwrap();

        // Running past close is not.
        let msg = invalid_input_message(
            parse_window("2026-03-02T18:00:00Z", "2026-03-02T20:15:00Z").unwrap_err(),
        );
        assert_eq!(msg, "bookings allowed only between 08:00 and 20:00");

        // Starting at the closing hour is not allowed even though ending
        // there is.
        let msg = invalid_input_message(
            parse_window("2026-03-02T20:00:00Z", "2026-03-02T20:30:00Z").unwrap_err(),
        );
        assert_eq!(msg, "bookings allowed only between 08:00 and 20:00");
    }
}
