//! # MipKit Board
//!
//! The measurement-point model and its aggregate root.
//!
//! A [`MeasurePoint`] is a single location on the board image: a circle or
//! rectangle with up to two recorded multimeter values (reference board vs.
//! board under test) and the divergence math between them. The
//! [`PointManager`] owns the point collection and drives CRUD, queries,
//! aggregate statistics, and the sequential measurement workflow, emitting
//! change notifications on the injected event bus.

pub mod manager;
pub mod model;
pub mod point;

pub use manager::{
    ActiveMeasurement, ManagerSnapshot, NewPoint, PointManager, PointUpdate, SnapshotSettings,
};
pub use model::{GeometryLimits, PointGeometry, BOARD_MAX_COORD};
pub use point::{MeasurePoint, ToleranceStatus};
