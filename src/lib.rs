//! # MipKit
//!
//! Headless core of a board-analysis tool for electronics technicians:
//! map measurement points on a photographed circuit board, record
//! reference vs. test multimeter readings per point, and flag
//! out-of-tolerance divergences.
//!
//! ## Architecture
//!
//! MipKit is organized as a workspace with multiple crates:
//!
//! 1. **mipkit-core** - Shared data types, event bus, state machine, errors
//! 2. **mipkit-board** - The measurement point entity and its manager
//! 3. **mipkit-project** - Project metadata and the `.mip` file codec
//! 4. **mipkit** - Main binary that integrates all crates
//!
//! The GUI layer is intentionally absent: hosts wire a [`PointManager`]
//! and [`StateManager`] to a shared [`EventBus`] and subscribe to the
//! emitted [`AppEvent`]s.

pub use mipkit_core::{
    AppEvent, AppState, CallbackId, Error, EventBus, EventCategory, EventFilter, MeasurementEvent,
    MeasurementKind, PersistenceError, PointError, PointEvent, ProjectEvent, Result, ShapeKind,
    SnapshotError, StateEvent, StateInfo, StateManager, StateTransition, StatisticsSnapshot,
    SubscriptionId, ValueStats,
};

pub use mipkit_board::{
    ActiveMeasurement, GeometryLimits, ManagerSnapshot, MeasurePoint, NewPoint, PointGeometry,
    PointManager, PointUpdate, ToleranceStatus, BOARD_MAX_COORD,
};

pub use mipkit_project::{
    is_mip_file, load_project, project_info, save_project, BoardProject, ImageBlob, ProjectData,
    ProjectInfo, ProjectSettings, ProjectStore,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Console output with pretty formatting and `RUST_LOG` environment
/// variable support.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
