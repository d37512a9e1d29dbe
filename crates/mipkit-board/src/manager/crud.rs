//! Create, update, and delete operations.
//!
//! Mutations validate first and fail soft: a rejected operation logs the
//! reason and returns `None`/`false` without touching the collection.

use mipkit_core::{AppEvent, MeasurementKind, PointEvent, ShapeKind};

use crate::model::{check_coordinates, PointGeometry};
use crate::point::MeasurePoint;

use super::{NewPoint, PointManager, PointUpdate};

impl PointManager {
    /// Add a new point at `(x, y)`.
    ///
    /// Returns the assigned id, or `None` when the ceiling is reached or
    /// the coordinates or geometry are out of range.
    pub fn add_point(&mut self, x: i32, y: i32, request: NewPoint) -> Option<u32> {
        if self.order.len() >= self.max_points {
            tracing::warn!(max = self.max_points, "Point limit reached");
            return None;
        }
        if let Err(e) = check_coordinates(x, y) {
            tracing::warn!(error = %e, "Rejected point coordinates");
            return None;
        }

        let geometry = request.geometry.unwrap_or_else(|| {
            PointGeometry::default_for(request.shape.unwrap_or(ShapeKind::Circle), self.default_size)
        });
        if let Err(e) = self.limits.check(&geometry) {
            tracing::warn!(error = %e, "Rejected point geometry");
            return None;
        }

        let id = self.next_id;
        let mut point = MeasurePoint::new(id, x, y, geometry);
        point.name = request.name;
        point.description = request.description;
        point.component_type = request.component_type;
        point.expected_value = request.expected_value;
        let shape = point.shape();

        self.order.push(id);
        self.points.insert(id, point);
        self.next_id += 1;
        self.touch();

        self.emit(AppEvent::Point(PointEvent::Added { id, x, y, shape }));
        tracing::debug!(id, x, y, "Point added");
        Some(id)
    }

    /// Remove a point by id.
    ///
    /// Cancels the in-progress measurement when it targets this point.
    pub fn remove_point(&mut self, id: u32) -> bool {
        if self.points.remove(&id).is_none() {
            tracing::warn!(id, "Cannot remove unknown point");
            return false;
        }
        self.order.retain(|&p| p != id);

        if self.active.as_ref().is_some_and(|a| a.point_id == id) {
            self.cancel_measurement();
        }

        self.touch();
        self.emit(AppEvent::Point(PointEvent::Removed { id }));
        tracing::debug!(id, "Point removed");
        true
    }

    /// Apply a partial update to a point.
    ///
    /// Coordinate and geometry changes are validated like at creation;
    /// a failed validation rejects the whole update.
    pub fn update_point(&mut self, id: u32, update: PointUpdate) -> bool {
        let Some(point) = self.points.get(&id) else {
            tracing::warn!(id, "Cannot update unknown point");
            return false;
        };

        let x = update.x.unwrap_or(point.x);
        let y = update.y.unwrap_or(point.y);
        if let Err(e) = check_coordinates(x, y) {
            tracing::warn!(id, error = %e, "Rejected point update");
            return false;
        }
        if let Some(geometry) = &update.geometry {
            if let Err(e) = self.limits.check(geometry) {
                tracing::warn!(id, error = %e, "Rejected point update");
                return false;
            }
        }

        // Validation passed; the entry is known to exist.
        if let Some(point) = self.points.get_mut(&id) {
            point.x = x;
            point.y = y;
            if let Some(geometry) = update.geometry {
                point.geometry = geometry;
            }
            if let Some(name) = update.name {
                point.name = Some(name);
            }
            if let Some(description) = update.description {
                point.description = Some(description);
            }
            if let Some(component_type) = update.component_type {
                point.component_type = Some(component_type);
            }
            if let Some(expected_value) = update.expected_value {
                point.expected_value = Some(expected_value);
            }
        }

        self.touch();
        self.emit(AppEvent::Point(PointEvent::Updated { id }));
        tracing::debug!(id, "Point updated");
        true
    }

    /// Record a value directly on a point outside the measurement workflow.
    pub fn set_point_value(&mut self, id: u32, kind: MeasurementKind, value: f64) -> bool {
        let Some(point) = self.points.get_mut(&id) else {
            tracing::warn!(id, "Cannot set value on unknown point");
            return false;
        };
        match kind {
            MeasurementKind::Reference => point.set_reference_value(value),
            MeasurementKind::Test => point.set_test_value(value),
        }
        self.touch();
        self.emit(AppEvent::Point(PointEvent::Updated { id }));
        true
    }

    /// Remove every point, reset the id sequence, and cancel any
    /// in-progress measurement.
    pub fn clear_points(&mut self) {
        if self.active.is_some() {
            self.cancel_measurement();
        }

        self.order.clear();
        self.points.clear();
        self.next_id = 1;
        self.stats_cache = None;
        self.touch();

        self.emit(AppEvent::Point(PointEvent::Cleared));
        tracing::debug!("All points cleared");
    }
}
