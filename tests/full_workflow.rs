//! End-to-end workflow test through the re-export façade: state machine
//! walk, point marking, measurement, comparison, and a project file
//! round trip, all on one shared bus.

use std::sync::{Arc, Mutex};

use mipkit::{
    AppState, BoardProject, EventBus, EventFilter, MeasurementKind, NewPoint, PointManager,
    ProjectData, ProjectSettings, ProjectStore, StateManager, ToleranceStatus,
};

#[test]
fn test_full_analysis_workflow() {
    let bus = Arc::new(EventBus::new());
    let descriptions = Arc::new(Mutex::new(Vec::new()));
    let sink = descriptions.clone();
    bus.subscribe(EventFilter::All, move |event| {
        sink.lock().expect("lock").push(event.description());
    });

    let mut state = StateManager::new(bus.clone());
    let mut manager = PointManager::new(bus.clone());

    // Walk forward into marking
    assert!(state.change_state(AppState::Edit, false));
    assert!(state.change_state(AppState::Marking, false));

    let c17 = manager
        .add_point(120, 340, NewPoint::circle().named("C17"))
        .expect("add");
    let r5 = manager
        .add_point(500, 220, NewPoint::rectangle().named("R5"))
        .expect("add");

    // Measure both boards, one divergent
    assert!(state.change_state(AppState::Measuring, false));
    manager.record_measurement(c17, MeasurementKind::Reference, 4.7);
    manager.record_measurement(c17, MeasurementKind::Test, 4.65);
    manager.record_measurement(r5, MeasurementKind::Reference, 10.0);
    manager.record_measurement(r5, MeasurementKind::Test, 11.2);

    // Compare
    assert!(state.change_state(AppState::Comparison, false));
    let stats = manager.statistics(5.0);
    assert_eq!(stats.measured, 2);
    assert_eq!(stats.divergent, 1);
    assert_eq!(
        manager.point(r5).expect("present").tolerance_status(5.0),
        ToleranceStatus::Divergent
    );

    // Save, reload into a fresh manager
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("workflow.mip");
    let store = ProjectStore::new(bus.clone());
    let data = ProjectData {
        project: BoardProject::new("Workflow board"),
        points: manager.snapshot(),
        image: None,
        settings: ProjectSettings::default(),
    };
    assert!(store.save(&data, &path));

    let loaded = store.load(&path).expect("load");
    let mut fresh = PointManager::new(bus);
    assert!(fresh.restore(loaded.points));
    assert_eq!(fresh.point_count(), 2);
    assert_eq!(fresh.statistics(5.0).divergent, 1);

    // The shared bus saw the whole story
    let log = descriptions.lock().expect("lock");
    assert!(log.iter().any(|d| d.contains("Initial -> Edit")));
    assert!(log.iter().any(|d| d.contains("#1 added")));
    assert!(log.iter().any(|d| d.contains("Project saved")));
    assert!(log.iter().any(|d| d.contains("2 points")));
}

#[test]
fn test_restart_analysis_shortcut() {
    let bus = Arc::new(EventBus::new());
    let mut state = StateManager::new(bus);

    for target in [
        AppState::Edit,
        AppState::Marking,
        AppState::Measuring,
        AppState::Comparison,
    ] {
        assert!(state.change_state(target, false));
    }

    // Comparison allows jumping straight back to Edit for a new run
    assert!(state.change_state(AppState::Edit, false));
    assert_eq!(state.current_state(), AppState::Edit);
}
