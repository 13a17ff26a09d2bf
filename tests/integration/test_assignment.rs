//! End-to-end assignment runs over snapshot fixtures.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use usher::{
    CacheSpace, Config, Coordinator, Interval, Outcome, RecordingWriter, SnapshotSource,
};

fn buildings() -> serde_json::Value {
    serde_json::json!([
        { "id": "tor-111", "name": "Toronto 111 Richmond", "floor_names": ["1", "2"] }
    ])
}

fn resources() -> serde_json::Value {
    serde_json::json!([
        {
            "id": "f1s1", "email": "f1s1@rooms.example", "name": "HQ-1-1",
            "building_id": "tor-111", "floor_name": "1", "floor_section": "1",
            "category": "CONFERENCE_ROOM"
        },
        {
            "id": "f1s2", "email": "f1s2@rooms.example", "name": "HQ-1-2",
            "building_id": "tor-111", "floor_name": "1", "floor_section": "2",
            "category": "CONFERENCE_ROOM"
        },
        {
            "id": "f2s1", "email": "f2s1@rooms.example", "name": "HQ-2-1",
            "building_id": "tor-111", "floor_name": "2", "floor_section": "1",
            "category": "CONFERENCE_ROOM"
        }
    ])
}

fn humans() -> serde_json::Value {
    serde_json::json!([
        { "email": "a@example.com", "response_status": "accepted" },
        { "email": "b@example.com", "response_status": "accepted" }
    ])
}

fn room_attendee(email: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email, "response_status": "accepted", "is_resource": true
    })
}

struct Fixture {
    snapshot_dir: TempDir,
    cache_dir: TempDir,
    writer: Arc<RecordingWriter>,
}

impl Fixture {
    fn new(events: serde_json::Value, freebusy: serde_json::Value) -> Self {
        let snapshot_dir = TempDir::new().unwrap();
        let files = [
            ("buildings.json", buildings()),
            ("resources.json", resources()),
            ("events.json", events),
            ("freebusy.json", freebusy),
        ];
        for (name, value) in files {
            std::fs::write(snapshot_dir.path().join(name), value.to_string()).unwrap();
        }
        Self {
            snapshot_dir,
            cache_dir: TempDir::new().unwrap(),
            writer: Arc::new(RecordingWriter::new()),
        }
    }

    fn coordinator(&self, configure: impl FnOnce(&mut Config)) -> Coordinator {
        let mut config = Config::default();
        config.run.building = "richmond".to_string();
        configure(&mut config);
        let snapshot = Arc::new(SnapshotSource::open(self.snapshot_dir.path()));
        Coordinator::new(
            config,
            snapshot.clone(),
            snapshot.clone(),
            snapshot,
            self.writer.clone(),
            CacheSpace::at(self.cache_dir.path()).unwrap(),
        )
    }
}

fn window() -> Interval {
    Interval::new(
        Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap(),
    )
}

#[tokio::test]
async fn test_nearest_free_room_wins() {
    // event e1 already sits in HQ-1-1, e3 in HQ-2-1; e2 between them has no
    // room, both neighboring rooms are taken over its slot, so it must get
    // the same-floor neighbor HQ-1-2 rather than the far-floor HQ-2-1
    let events = serde_json::json!([
        {
            "id": "e1", "summary": "standup",
            "start": "2026-08-06T09:00:00Z", "end": "2026-08-06T10:00:00Z",
            "attendees": [
                humans()[0], humans()[1], room_attendee("f1s1@rooms.example")
            ]
        },
        {
            "id": "e2", "summary": "design review",
            "start": "2026-08-06T10:00:00Z", "end": "2026-08-06T11:00:00Z",
            "attendees": humans()
        },
        {
            "id": "e3", "summary": "retro",
            "start": "2026-08-06T11:00:00Z", "end": "2026-08-06T12:00:00Z",
            "attendees": [
                humans()[0], humans()[1], room_attendee("f2s1@rooms.example")
            ]
        }
    ]);
    let freebusy = serde_json::json!({
        "calendars": {
            "f1s1@rooms.example": { "busy": [
                { "start": "2026-08-06T09:00:00Z", "end": "2026-08-06T11:00:00Z" }
            ]},
            "f1s2@rooms.example": { "busy": [] },
            "f2s1@rooms.example": { "busy": [
                { "start": "2026-08-06T10:00:00Z", "end": "2026-08-06T12:00:00Z" }
            ]}
        }
    });

    let fixture = Fixture::new(events, freebusy);
    let report = fixture.coordinator(|_| {}).run(window()).await.unwrap();

    assert_eq!(report.entries.len(), 3);
    assert_eq!(
        report.entries[0].outcome,
        Outcome::AlreadyBooked { room: "HQ-1-1".to_string() }
    );
    assert_eq!(
        report.entries[1].outcome,
        Outcome::Booked { room: "HQ-1-2".to_string() }
    );
    assert_eq!(
        report.entries[2].outcome,
        Outcome::AlreadyBooked { room: "HQ-2-1".to_string() }
    );

    let patches = fixture.writer.patched();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].1, "e2");
    let attendees = patches[0].2.attendees.as_ref().unwrap();
    assert!(attendees.iter().any(|a| a.email == "f1s2@rooms.example"));
}

#[tokio::test]
async fn test_fully_booked_building_reports_unassigned() {
    let events = serde_json::json!([
        {
            "id": "e1", "summary": "standup",
            "start": "2026-08-06T09:00:00Z", "end": "2026-08-06T10:00:00Z",
            "attendees": [
                humans()[0], humans()[1], room_attendee("f1s1@rooms.example")
            ]
        },
        {
            "id": "e2", "summary": "design review",
            "start": "2026-08-06T10:00:00Z", "end": "2026-08-06T11:00:00Z",
            "attendees": humans()
        }
    ]);
    let all_day = serde_json::json!([
        { "start": "2026-08-06T00:00:00Z", "end": "2026-08-06T23:00:00Z" }
    ]);
    let freebusy = serde_json::json!({
        "calendars": {
            "f1s1@rooms.example": { "busy": all_day },
            "f1s2@rooms.example": { "busy": all_day },
            "f2s1@rooms.example": { "busy": all_day }
        }
    });

    let fixture = Fixture::new(events, freebusy);
    let report = fixture.coordinator(|_| {}).run(window()).await.unwrap();

    // the unassigned event is reported, the pre-booked one is untouched
    assert_eq!(report.entries[0].outcome,
        Outcome::AlreadyBooked { room: "HQ-1-1".to_string() });
    assert_eq!(report.entries[1].outcome, Outcome::Unassigned);
    assert!(fixture.writer.patched().is_empty());
    assert!(fixture.writer.inserted().is_empty());
}

#[tokio::test]
async fn test_marker_event_books_a_hold() {
    let events = serde_json::json!([
        {
            "id": "e1", "summary": "offsite prep #room",
            "start": "2026-08-06T09:00:00Z", "end": "2026-08-06T10:00:00Z",
            "attendees": []
        }
    ]);
    let freebusy = serde_json::json!({
        "calendars": {
            "f1s1@rooms.example": { "busy": [] },
            "f1s2@rooms.example": { "busy": [] },
            "f2s1@rooms.example": { "busy": [] }
        }
    });

    let fixture = Fixture::new(events, freebusy);
    let report = fixture
        .coordinator(|config| {
            config.preference.floor = Some(1);
            config.preference.section = Some(1);
        })
        .run(window())
        .await
        .unwrap();

    assert_eq!(report.booked(), 1);
    let inserted = fixture.writer.inserted();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].1.summary, "Room for 'offsite prep #addedroom'");

    // the original event's marker is rewritten too
    let patches = fixture.writer.patched();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].2.summary.as_deref(), Some("offsite prep #addedroom"));
}

#[tokio::test]
async fn test_non_qualifying_events_never_reach_the_engine() {
    let events = serde_json::json!([
        {
            "id": "all-day", "summary": "conference",
            "start": "2026-08-06T00:00:00Z", "end": "2026-08-07T00:00:00Z",
            "all_day": true, "attendees": humans()
        },
        {
            "id": "cancelled", "summary": "cancelled sync",
            "start": "2026-08-06T09:00:00Z", "end": "2026-08-06T10:00:00Z",
            "status": "cancelled", "attendees": humans()
        },
        {
            "id": "solo", "summary": "focus time",
            "start": "2026-08-06T10:00:00Z", "end": "2026-08-06T11:00:00Z",
            "attendees": [ { "email": "a@example.com", "response_status": "accepted" } ]
        }
    ]);
    let freebusy = serde_json::json!({
        "calendars": {
            "f1s1@rooms.example": { "busy": [] },
            "f1s2@rooms.example": { "busy": [] },
            "f2s1@rooms.example": { "busy": [] }
        }
    });

    let fixture = Fixture::new(events, freebusy);
    let report = fixture.coordinator(|_| {}).run(window()).await.unwrap();
    assert!(report.entries.is_empty());
}

#[tokio::test]
async fn test_dry_run_plans_without_writing() {
    let events = serde_json::json!([
        {
            "id": "e1", "summary": "design review",
            "start": "2026-08-06T10:00:00Z", "end": "2026-08-06T11:00:00Z",
            "attendees": humans()
        }
    ]);
    let freebusy = serde_json::json!({
        "calendars": {
            "f1s1@rooms.example": { "busy": [] },
            "f1s2@rooms.example": { "busy": [] },
            "f2s1@rooms.example": { "busy": [] }
        }
    });

    let fixture = Fixture::new(events, freebusy);
    let report = fixture
        .coordinator(|config| {
            config.run.dry_run = true;
            config.preference.floor = Some(1);
            config.preference.section = Some(1);
        })
        .run(window())
        .await
        .unwrap();

    assert_eq!(report.booked(), 1);
    assert!(fixture.writer.patched().is_empty());
    assert!(fixture.writer.inserted().is_empty());
}
