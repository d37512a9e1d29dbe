//! Event type definitions for the event bus.
//!
//! This module defines all change notifications the core emits, organized
//! by category. Events are cloneable and serializable for logging/replay.
//! The (external) UI layer subscribes to these instead of holding direct
//! references into the managers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{MeasurementKind, ShapeKind, StatisticsSnapshot};
use crate::state::AppState;

/// Root event enum for all application events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Point collection changes
    Point(PointEvent),
    /// Measurement workflow progress
    Measurement(MeasurementEvent),
    /// Application state machine transitions
    State(StateEvent),
    /// Project file operations
    Project(ProjectEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Point(_) => EventCategory::Point,
            AppEvent::Measurement(_) => EventCategory::Measurement,
            AppEvent::State(_) => EventCategory::State,
            AppEvent::Project(_) => EventCategory::Project,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Point(e) => e.description(),
            AppEvent::Measurement(e) => e.description(),
            AppEvent::State(e) => e.description(),
            AppEvent::Project(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Point collection events.
    Point,
    /// Measurement workflow events.
    Measurement,
    /// State machine events.
    State,
    /// Project file events.
    Project,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Point => write!(f, "Point"),
            EventCategory::Measurement => write!(f, "Measurement"),
            EventCategory::State => write!(f, "State"),
            EventCategory::Project => write!(f, "Project"),
        }
    }
}

/// Point collection events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointEvent {
    /// A point was added.
    Added {
        /// Id assigned by the manager.
        id: u32,
        /// Center x in image pixels.
        x: i32,
        /// Center y in image pixels.
        y: i32,
        /// Shape of the new point.
        shape: ShapeKind,
    },
    /// A point was removed.
    Removed {
        /// Id of the removed point.
        id: u32,
    },
    /// A point's fields changed.
    Updated {
        /// Id of the changed point.
        id: u32,
    },
    /// All points were removed.
    Cleared,
    /// Aggregate statistics were recomputed.
    StatisticsChanged {
        /// The freshly computed snapshot.
        stats: StatisticsSnapshot,
    },
}

impl PointEvent {
    fn description(&self) -> String {
        match self {
            PointEvent::Added { id, x, y, shape } => {
                format!("Point #{} added at ({}, {}) as {}", id, x, y, shape)
            }
            PointEvent::Removed { id } => format!("Point #{} removed", id),
            PointEvent::Updated { id } => format!("Point #{} updated", id),
            PointEvent::Cleared => "All points cleared".to_string(),
            PointEvent::StatisticsChanged { stats } => {
                format!(
                    "Statistics: {}/{} measured, {} divergent",
                    stats.measured, stats.total, stats.divergent
                )
            }
        }
    }
}

/// Measurement workflow events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MeasurementEvent {
    /// A measurement was started for a point.
    Started {
        /// Target point id.
        point_id: u32,
        /// Which board is being measured.
        kind: MeasurementKind,
    },
    /// A value was recorded on a point.
    Recorded {
        /// Measured point id.
        point_id: u32,
        /// Which board the value belongs to.
        kind: MeasurementKind,
        /// The recorded value.
        value: f64,
    },
    /// The in-progress measurement finished.
    Completed {
        /// Point id the measurement was running for.
        point_id: u32,
    },
    /// The in-progress measurement hit its timeout.
    TimedOut {
        /// Point id the measurement was running for.
        point_id: u32,
    },
    /// The in-progress measurement was cancelled.
    Cancelled {
        /// Point id the measurement was running for.
        point_id: u32,
    },
}

impl MeasurementEvent {
    fn description(&self) -> String {
        match self {
            MeasurementEvent::Started { point_id, kind } => {
                format!("Measuring point #{} ({})", point_id, kind)
            }
            MeasurementEvent::Recorded {
                point_id,
                kind,
                value,
            } => format!("Point #{} measured: {} = {:.3}", point_id, kind, value),
            MeasurementEvent::Completed { point_id } => {
                format!("Measurement of point #{} completed", point_id)
            }
            MeasurementEvent::TimedOut { point_id } => {
                format!("Measurement of point #{} timed out", point_id)
            }
            MeasurementEvent::Cancelled { point_id } => {
                format!("Measurement of point #{} cancelled", point_id)
            }
        }
    }
}

/// State machine events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StateEvent {
    /// A transition was requested.
    TransitionRequested {
        /// Requested target state.
        target: AppState,
    },
    /// The application state changed.
    Changed {
        /// Previous state.
        old: AppState,
        /// New current state.
        new: AppState,
    },
    /// A requested transition was rejected.
    TransitionBlocked {
        /// The rejected target state.
        target: AppState,
        /// Human-readable rejection reason.
        reason: String,
    },
}

impl StateEvent {
    fn description(&self) -> String {
        match self {
            StateEvent::TransitionRequested { target } => {
                format!("Transition requested: {}", target)
            }
            StateEvent::Changed { old, new } => format!("State: {} -> {}", old, new),
            StateEvent::TransitionBlocked { target, reason } => {
                format!("Transition to {} blocked: {}", target, reason)
            }
        }
    }
}

/// Project file events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProjectEvent {
    /// Project saved to disk.
    Saved {
        /// Path the project was written to.
        path: PathBuf,
    },
    /// Project loaded from disk.
    Loaded {
        /// Path the project was read from.
        path: PathBuf,
        /// Number of points in the loaded project.
        point_count: usize,
    },
}

impl ProjectEvent {
    fn description(&self) -> String {
        match self {
            ProjectEvent::Saved { path } => format!("Project saved: {}", path.display()),
            ProjectEvent::Loaded { path, point_count } => {
                format!(
                    "Project loaded: {} ({} points)",
                    path.display(),
                    point_count
                )
            }
        }
    }
}
