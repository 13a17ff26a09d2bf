//! Catalog build, caching and building resolution.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use usher::error::{ResolveError, UsherError};
use usher::{CacheSpace, Config, Coordinator, Interval, RecordingWriter, SnapshotSource};

fn write_snapshot(dir: &TempDir, buildings: serde_json::Value) {
    std::fs::write(dir.path().join("buildings.json"), buildings.to_string()).unwrap();
    std::fs::write(
        dir.path().join("resources.json"),
        serde_json::json!([
            {
                "id": "room-1", "email": "room-1@rooms.example", "name": "Fishbowl",
                "building_id": "tor-111", "floor_name": "1", "floor_section": "1",
                "category": "CONFERENCE_ROOM"
            }
        ])
        .to_string(),
    )
    .unwrap();
    std::fs::write(dir.path().join("events.json"), "[]").unwrap();
    std::fs::write(
        dir.path().join("freebusy.json"),
        serde_json::json!({ "calendars": {} }).to_string(),
    )
    .unwrap();
}

fn window() -> Interval {
    Interval::new(
        Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap(),
    )
}

fn coordinator(snapshot_dir: &TempDir, cache_dir: &TempDir, building: &str) -> Coordinator {
    let mut config = Config::default();
    config.run.building = building.to_string();
    let snapshot = Arc::new(SnapshotSource::open(snapshot_dir.path()));
    Coordinator::new(
        config,
        snapshot.clone(),
        snapshot.clone(),
        snapshot,
        Arc::new(RecordingWriter::new()),
        CacheSpace::at(cache_dir.path()).unwrap(),
    )
}

#[tokio::test]
async fn test_building_resolved_by_fuzzy_name() {
    let snapshot_dir = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    write_snapshot(
        &snapshot_dir,
        serde_json::json!([
            { "id": "tor-111", "name": "Toronto 111 Richmond" },
            { "id": "nyc-76", "name": "New York 76 9th Ave" }
        ]),
    );

    let report = coordinator(&snapshot_dir, &cache_dir, "richmond")
        .run(window())
        .await
        .unwrap();
    // no qualifying events, but resolution and catalog load succeeded
    assert!(report.entries.is_empty());
}

#[tokio::test]
async fn test_similar_buildings_are_ambiguous() {
    let snapshot_dir = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    write_snapshot(
        &snapshot_dir,
        serde_json::json!([
            { "id": "rvr-a", "name": "Riverside Office A" },
            { "id": "rvr-b", "name": "Riverside Office B" }
        ]),
    );

    let err = coordinator(&snapshot_dir, &cache_dir, "riverside office")
        .run(window())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        UsherError::Resolve(ResolveError::Ambiguous { hits: 2 })
    ));
}

#[tokio::test]
async fn test_catalog_served_from_cache_on_second_run() {
    let snapshot_dir = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    write_snapshot(
        &snapshot_dir,
        serde_json::json!([{ "id": "tor-111", "name": "Toronto 111 Richmond" }]),
    );

    coordinator(&snapshot_dir, &cache_dir, "richmond")
        .run(window())
        .await
        .unwrap();

    // remove the snapshot files: a second run must succeed purely from cache
    std::fs::remove_file(snapshot_dir.path().join("buildings.json")).unwrap();
    std::fs::remove_file(snapshot_dir.path().join("resources.json")).unwrap();

    let report = coordinator(&snapshot_dir, &cache_dir, "richmond")
        .run(window())
        .await
        .unwrap();
    assert!(report.entries.is_empty());
}
