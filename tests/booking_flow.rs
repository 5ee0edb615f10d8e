use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use slotwise::model::{BookingFilter, BookingRequest, BookingStatus, NewRoom};
use slotwise::{CreateReply, Engine, EngineConfig, EngineError, ManualClock};

/// 2026-03-02 is a Monday.
fn monday(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
}

fn engine() -> (Arc<Engine>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(monday(7, 0)));
    let engine = Arc::new(Engine::in_memory(clock.clone(), EngineConfig::default()));
    (engine, clock)
}

fn request(room_id: ulid::Ulid, start: DateTime<Utc>, end: DateTime<Utc>) -> BookingRequest {
    BookingRequest {
        room_id: Some(room_id),
        title: Some("Quarterly planning".into()),
        organizer_email: Some("organizer@example.com".into()),
        start_time: Some(start.to_rfc3339()),
        end_time: Some(end.to_rfc3339()),
    }
}

#[tokio::test]
async fn end_to_end_booking_flow() {
    let (engine, _) = engine();

    let room = engine
        .create_room(NewRoom {
            name: "Room A".into(),
            capacity: 10,
            floor: 1,
            amenities: Default::default(),
        })
        .await
        .unwrap();

    // Book Monday 10:00–12:00.
    let booking = engine
        .create_booking(&request(room.id, monday(10, 0), monday(12, 0)))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);

    // Overlapping 11:00–13:00 on the same room conflicts.
    let overlap = engine
        .create_booking(&request(room.id, monday(11, 0), monday(13, 0)))
        .await;
    assert!(matches!(overlap, Err(EngineError::Conflict(_))));

    // A request missing its title is invalid input.
    let mut untitled = request(room.id, monday(14, 0), monday(15, 0));
    untitled.title = None;
    let invalid = engine.create_booking(&untitled).await;
    assert!(matches!(invalid, Err(EngineError::InvalidInput(_))));

    // Only the first booking exists.
    let page = engine.list_bookings(&BookingFilter::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, booking.id);
}

#[tokio::test]
async fn retried_create_is_applied_once() {
    let (engine, _) = engine();
    let room = engine
        .create_room(NewRoom {
            name: "Room A".into(),
            capacity: 4,
            floor: 2,
            amenities: Default::default(),
        })
        .await
        .unwrap();

    let req = request(room.id, monday(10, 0), monday(12, 0));

    let first = engine
        .create_booking_with_key("client-retry-1", &req)
        .await
        .unwrap();
    let booking = match first {
        CreateReply::Created(b) => b,
        other => panic!("expected Created, got {other:?}"),
    };

    // The client retries twice; both replays return the original response
    // and nothing new is booked.
    for _ in 0..2 {
        match engine
            .create_booking_with_key("client-retry-1", &req)
            .await
            .unwrap()
        {
            CreateReply::Replayed { code, body } => {
                assert_eq!(code, 200);
                assert_eq!(body, serde_json::to_string(&booking).unwrap());
            }
            other => panic!("expected Replayed, got {other:?}"),
        }
    }

    let page = engine.list_bookings(&BookingFilter::default()).await.unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn cancellation_policy_flow() {
    let (engine, clock) = engine();
    let room = engine
        .create_room(NewRoom {
            name: "Room A".into(),
            capacity: 4,
            floor: 2,
            amenities: Default::default(),
        })
        .await
        .unwrap();

    let booking = engine
        .create_booking(&request(room.id, monday(10, 0), monday(12, 0)))
        .await
        .unwrap();

    // 09:30 is inside the one-hour cutoff.
    clock.set(monday(9, 30));
    let too_late = engine.cancel_booking(booking.id).await;
    assert!(matches!(too_late, Err(EngineError::TooLateToCancel(_))));

    // A later booking can still be cancelled.
    let evening = engine
        .create_booking(&request(room.id, monday(16, 0), monday(17, 0)))
        .await
        .unwrap();
    let cancelled = engine.cancel_booking(evening.id).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn utilization_report_over_one_day() {
    let (engine, _) = engine();
    let room = engine
        .create_room(NewRoom {
            name: "Room A".into(),
            capacity: 10,
            floor: 1,
            amenities: Default::default(),
        })
        .await
        .unwrap();

    engine
        .create_booking(&request(room.id, monday(10, 0), monday(12, 0)))
        .await
        .unwrap();

    let rows = engine
        .utilization_report(monday(0, 0), monday(0, 0) + chrono::Duration::days(1))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_booking_hours, 2.0);
    assert_eq!(rows[0].utilization_percent, 0.17);
}
