//! File round-trip tests for the `.mip` codec: save/load of a full
//! project, envelope validation, and graceful handling of bad files.

use std::fs::File;
use std::io::{Read, Write};
use std::sync::Arc;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use mipkit_board::{NewPoint, PointManager};
use mipkit_core::{AppEvent, EventBus, EventFilter, MeasurementKind, ProjectEvent};
use mipkit_project::{
    export_to_json, is_mip_file, load_project, load_value, project_info, save_project, save_value,
    BoardProject, ImageBlob, ProjectData, ProjectSettings, ProjectStore,
};

fn sample_project() -> ProjectData {
    let bus = Arc::new(EventBus::new());
    let mut manager = PointManager::new(bus);
    let a = manager
        .add_point(120, 340, NewPoint::circle().named("C17"))
        .expect("add");
    manager.add_point(500, 220, NewPoint::rectangle()).expect("add");
    manager.record_measurement(a, MeasurementKind::Reference, 4.7);
    manager.record_measurement(a, MeasurementKind::Test, 4.65);

    let mut project = BoardProject::new("Amplifier main board");
    project.board_model = "AMP-220 rev C".to_string();

    ProjectData {
        project,
        points: manager.snapshot(),
        image: Some(ImageBlob::from_bytes(b"\x89PNGnot really pixels")),
        settings: ProjectSettings::default(),
    }
}

#[test]
fn test_save_and_load_project() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("board.mip");

    let data = sample_project();
    assert!(save_project(&data, &path));
    assert!(path.exists());

    let loaded = load_project(&path).expect("load");
    assert_eq!(loaded.project.name, "Amplifier main board");
    assert_eq!(loaded.points.points.len(), 2);
    assert_eq!(loaded.points.points[0].reference_value, Some(4.7));
    assert_eq!(loaded.points.points[0].name.as_deref(), Some("C17"));
    assert_eq!(loaded.image, data.image);
}

#[test]
fn test_envelope_fields_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("board.mip");
    assert!(save_value(&serde_json::json!({ "k": 1 }), &path));

    // The file is gzip; decompress by hand and inspect the envelope
    let mut json = String::new();
    GzDecoder::new(File::open(&path).expect("open"))
        .read_to_string(&mut json)
        .expect("gunzip");
    let envelope: serde_json::Value = serde_json::from_str(&json).expect("parse");
    assert_eq!(envelope["version"], "1.0");
    assert_eq!(envelope["format"], "mip");
    assert_eq!(envelope["data"]["k"], 1);
}

#[test]
fn test_wrong_format_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("other.mip");

    let payload = br#"{ "version": "1.0", "format": "zip", "data": {} }"#;
    let mut encoder = GzEncoder::new(File::create(&path).expect("create"), Compression::default());
    encoder.write_all(payload).expect("write");
    encoder.finish().expect("finish");

    assert!(load_value(&path).is_none());
    assert!(!is_mip_file(&path));
}

#[test]
fn test_version_mismatch_still_loads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("old.mip");

    let payload = br#"{ "version": "0.9", "format": "mip", "data": { "k": 2 } }"#;
    let mut encoder = GzEncoder::new(File::create(&path).expect("create"), Compression::default());
    encoder.write_all(payload).expect("write");
    encoder.finish().expect("finish");

    let data = load_value(&path).expect("best-effort load");
    assert_eq!(data["k"], 2);
}

#[test]
fn test_missing_and_corrupt_files() {
    let dir = tempfile::tempdir().expect("tempdir");

    assert!(load_value(&dir.path().join("nope.mip")).is_none());
    assert!(!is_mip_file(&dir.path().join("nope.mip")));

    // Not gzip at all
    let garbled = dir.path().join("garbled.mip");
    std::fs::write(&garbled, b"this is not gzip").expect("write");
    assert!(load_value(&garbled).is_none());

    // Gzip of invalid JSON
    let bad_json = dir.path().join("bad.mip");
    let mut encoder =
        GzEncoder::new(File::create(&bad_json).expect("create"), Compression::default());
    encoder.write_all(b"{ not json").expect("write");
    encoder.finish().expect("finish");
    assert!(load_value(&bad_json).is_none());
}

#[test]
fn test_project_info() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("board.mip");
    assert!(save_project(&sample_project(), &path));

    let info = project_info(&path).expect("info");
    assert_eq!(info.name.as_deref(), Some("Amplifier main board"));
    assert_eq!(info.board_model.as_deref(), Some("AMP-220 rev C"));
    assert_eq!(info.point_count, 2);
    assert!(info.has_image);
    assert!(info.file_size > 0);
}

#[test]
fn test_export_to_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("board.mip");
    let dest = dir.path().join("board.json");
    assert!(save_project(&sample_project(), &path));

    assert!(export_to_json(&path, &dest));
    let dump: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&dest).expect("read")).expect("parse");
    assert_eq!(dump["project"]["name"], "Amplifier main board");
}

#[test]
fn test_store_emits_events() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("board.mip");

    let bus = Arc::new(EventBus::new());
    let events = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = events.clone();
    bus.subscribe(EventFilter::All, move |event| {
        sink.lock().expect("lock").push(event);
    });

    let store = ProjectStore::new(bus);
    assert!(store.save(&sample_project(), &path));
    let loaded = store.load(&path).expect("load");
    assert_eq!(loaded.points.points.len(), 2);

    let events = events.lock().expect("lock");
    assert!(matches!(
        events[0],
        AppEvent::Project(ProjectEvent::Saved { .. })
    ));
    assert!(matches!(
        &events[1],
        AppEvent::Project(ProjectEvent::Loaded { point_count: 2, .. })
    ));
}

#[test]
fn test_restore_loaded_snapshot_into_manager() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("board.mip");
    assert!(save_project(&sample_project(), &path));

    let loaded = load_project(&path).expect("load");
    let mut manager = PointManager::new(Arc::new(EventBus::new()));
    assert!(manager.restore(loaded.points));
    assert_eq!(manager.point_count(), 2);

    // New points get ids above everything in the file
    let next = manager.add_point(5, 5, NewPoint::circle()).expect("add");
    assert_eq!(next, 3);
}
