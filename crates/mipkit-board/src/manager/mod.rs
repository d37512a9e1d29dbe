//! Point manager: the aggregate root for the measurement-point collection.
//!
//! This module is split into submodules by concern:
//! - `crud`: add/remove/update/clear operations
//! - `queries`: read-only lookups and spatial searches
//! - `stats`: cached aggregate statistics
//! - `measurement`: the sequential measurement workflow
//! - `snapshot`: serialization snapshot for project files

mod crud;
mod measurement;
mod queries;
mod snapshot;
mod stats;

pub use measurement::ActiveMeasurement;
pub use snapshot::{ManagerSnapshot, SnapshotSettings};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mipkit_core::{AppEvent, EventBus, ShapeKind, StatisticsSnapshot};

use crate::model::{GeometryLimits, PointGeometry};
use crate::point::MeasurePoint;

/// Hard ceiling on the number of points a board can carry.
pub const MAX_POINTS: usize = 1000;

/// Default measurement timeout.
pub const DEFAULT_MEASUREMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default point dimension in pixels.
pub const DEFAULT_POINT_SIZE: u32 = 20;

/// Creation request for a new point
///
/// Geometry defaults from the shape and the manager's default size when not
/// given explicitly.
#[derive(Debug, Clone, Default)]
pub struct NewPoint {
    /// Shape to create; ignored when `geometry` is set.
    pub shape: Option<ShapeKind>,
    /// Explicit geometry overriding the shape default.
    pub geometry: Option<PointGeometry>,
    /// Optional label.
    pub name: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Optional component type.
    pub component_type: Option<String>,
    /// Optional expected nominal value.
    pub expected_value: Option<String>,
}

impl NewPoint {
    /// A default-sized circle.
    pub fn circle() -> Self {
        Self {
            shape: Some(ShapeKind::Circle),
            ..Self::default()
        }
    }

    /// A default-sized rectangle.
    pub fn rectangle() -> Self {
        Self {
            shape: Some(ShapeKind::Rectangle),
            ..Self::default()
        }
    }

    /// A point with explicit geometry.
    pub fn with_geometry(geometry: PointGeometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }

    /// Attach a label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Partial update request for an existing point
///
/// Only the fields that are `Some` are applied. Coordinate and geometry
/// changes go through the same validation as creation.
#[derive(Debug, Clone, Default)]
pub struct PointUpdate {
    /// New center x.
    pub x: Option<i32>,
    /// New center y.
    pub y: Option<i32>,
    /// New geometry (may also change the shape).
    pub geometry: Option<PointGeometry>,
    /// New label.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New component type.
    pub component_type: Option<String>,
    /// New expected nominal value.
    pub expected_value: Option<String>,
}

/// Central manager for the measurement-point collection
///
/// Owns the points, assigns ids, validates every mutation, caches aggregate
/// statistics, and drives the sequential measurement workflow. All changes
/// are announced on the injected event bus; read accessors never emit.
pub struct PointManager {
    pub(crate) bus: Arc<EventBus>,

    /// Point ids in insertion order.
    pub(crate) order: Vec<u32>,
    /// Points keyed by id, always in sync with `order`.
    pub(crate) points: HashMap<u32, MeasurePoint>,

    /// Next id to assign, monotonic; reset only by `clear_points`.
    pub(crate) next_id: u32,
    pub(crate) max_points: usize,

    pub(crate) edit_mode: bool,
    pub(crate) limits: GeometryLimits,
    pub(crate) default_size: u32,

    pub(crate) measurement_timeout: Duration,
    /// The in-progress measurement, if any.
    pub(crate) active: Option<ActiveMeasurement>,

    pub(crate) stats_cache: Option<StatisticsSnapshot>,
    pub(crate) stats_dirty: bool,
}

impl PointManager {
    /// Create an empty manager publishing on the given bus.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            order: Vec::new(),
            points: HashMap::new(),
            next_id: 1,
            max_points: MAX_POINTS,
            edit_mode: false,
            limits: GeometryLimits::default(),
            default_size: DEFAULT_POINT_SIZE,
            measurement_timeout: DEFAULT_MEASUREMENT_TIMEOUT,
            active: None,
            stats_cache: None,
            stats_dirty: true,
        }
    }

    // ---- Configuration ----

    /// Whether edit mode is enabled.
    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Enable or disable edit mode.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
        tracing::debug!(enabled, "Edit mode changed");
    }

    /// The point ceiling.
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Dimension limits applied to new and updated geometry.
    pub fn limits(&self) -> GeometryLimits {
        self.limits
    }

    /// Default dimension for points created without explicit geometry.
    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    /// Set the default dimension for new points.
    pub fn set_default_size(&mut self, size: u32) {
        self.default_size = size;
    }

    // ---- Internal helpers ----

    /// Publish an event, ignoring the no-subscribers case.
    pub(crate) fn emit(&self, event: AppEvent) {
        let _ = self.bus.publish(event);
    }

    /// Invalidate the statistics cache after a mutation.
    pub(crate) fn touch(&mut self) {
        self.stats_dirty = true;
    }
}
