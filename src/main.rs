//! Headless demonstration workflow.
//!
//! Walks the full lifecycle once: create a project, mark points, run the
//! measurement workflow, compute statistics, and round-trip the project
//! through a `.mip` file. Useful as a smoke test and as wiring
//! documentation for GUI hosts.

use std::sync::Arc;

use mipkit::{
    init_logging, AppState, BoardProject, EventBus, EventFilter, MeasurementKind, NewPoint,
    PointManager, ProjectData, ProjectSettings, ProjectStore, StateManager,
};

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!(version = mipkit::VERSION, "MipKit starting");

    let bus = Arc::new(EventBus::new());
    bus.subscribe(EventFilter::All, |event| {
        tracing::info!(category = %event.category(), "{}", event.description());
    });

    let mut state = StateManager::new(bus.clone());
    let mut manager = PointManager::new(bus.clone());

    // Walk into marking mode and place a few points
    state.change_state(AppState::Edit, false);
    state.change_state(AppState::Marking, false);
    manager.set_edit_mode(true);

    let c17 = manager
        .add_point(120, 340, NewPoint::circle().named("C17"))
        .ok_or_else(|| anyhow::anyhow!("failed to add point"))?;
    let r5 = manager
        .add_point(500, 220, NewPoint::rectangle().named("R5"))
        .ok_or_else(|| anyhow::anyhow!("failed to add point"))?;

    // Measure both boards
    manager.set_edit_mode(false);
    state.change_state(AppState::Measuring, false);

    for (id, reference, test) in [(c17, 4.7, 4.65), (r5, 10.0, 11.2)] {
        manager.start_measurement_sequence(MeasurementKind::Reference);
        manager.record_measurement(id, MeasurementKind::Reference, reference);
        manager.record_measurement(id, MeasurementKind::Test, test);
    }

    // Compare
    state.change_state(AppState::Comparison, false);
    let stats = manager.statistics(5.0);
    tracing::info!(
        measured = stats.measured,
        divergent = stats.divergent,
        pass_rate = format!("{:.1}%", stats.pass_rate),
        "Comparison complete"
    );

    // Round-trip the project through a .mip file
    let mut project = BoardProject::new("Demo board");
    project.board_model = "DEMO-1".to_string();
    let data = ProjectData {
        project,
        points: manager.snapshot(),
        image: None,
        settings: ProjectSettings::default(),
    };

    let dir = std::env::temp_dir();
    let path = dir.join("mipkit-demo.mip");
    let store = ProjectStore::new(bus);
    anyhow::ensure!(store.save(&data, &path), "save failed");
    let loaded = store
        .load(&path)
        .ok_or_else(|| anyhow::anyhow!("load failed"))?;
    anyhow::ensure!(loaded.points.points.len() == 2, "unexpected point count");
    tracing::info!(path = %path.display(), "Round trip verified");

    Ok(())
}
