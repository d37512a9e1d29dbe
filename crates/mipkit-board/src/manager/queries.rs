//! Read-only lookups and spatial searches.
//!
//! None of these emit events or touch the statistics cache. List accessors
//! return defensive copies in insertion order.

use mipkit_core::ShapeKind;

use crate::point::MeasurePoint;

use super::PointManager;

impl PointManager {
    /// Look up a point by id.
    pub fn point(&self, id: u32) -> Option<&MeasurePoint> {
        self.points.get(&id)
    }

    /// All points, copied, in insertion order.
    pub fn points(&self) -> Vec<MeasurePoint> {
        self.order
            .iter()
            .filter_map(|id| self.points.get(id).cloned())
            .collect()
    }

    /// Ids in insertion order.
    pub fn point_ids(&self) -> Vec<u32> {
        self.order.clone()
    }

    /// Points whose centers fall inside the rectangle spanned by the two
    /// corners, in either corner order.
    pub fn points_in_area(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<MeasurePoint> {
        let (min_x, max_x) = (x1.min(x2), x1.max(x2));
        let (min_y, max_y) = (y1.min(y2), y1.max(y2));
        self.order
            .iter()
            .filter_map(|id| self.points.get(id))
            .filter(|p| p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y)
            .cloned()
            .collect()
    }

    /// Find the point at a click position.
    ///
    /// An exact shape hit wins immediately; otherwise the nearest point
    /// whose center lies within `tolerance` pixels is returned.
    pub fn find_point_at_position(&self, x: i32, y: i32, tolerance: i32) -> Option<&MeasurePoint> {
        let mut closest: Option<&MeasurePoint> = None;
        let mut min_distance = f64::INFINITY;

        for id in &self.order {
            let Some(point) = self.points.get(id) else {
                continue;
            };
            if point.contains_point(x, y) {
                return Some(point);
            }
            let distance = point.distance_to(x, y);
            if distance < min_distance && distance <= f64::from(tolerance) {
                min_distance = distance;
                closest = Some(point);
            }
        }
        closest
    }

    /// Points of a given shape, in insertion order.
    pub fn points_by_shape(&self, shape: ShapeKind) -> Vec<MeasurePoint> {
        self.order
            .iter()
            .filter_map(|id| self.points.get(id))
            .filter(|p| p.shape() == shape)
            .cloned()
            .collect()
    }

    /// Points with both values recorded.
    pub fn measured_points(&self) -> Vec<MeasurePoint> {
        self.order
            .iter()
            .filter_map(|id| self.points.get(id))
            .filter(|p| p.is_measured())
            .cloned()
            .collect()
    }

    /// Points still missing at least one value.
    pub fn unmeasured_points(&self) -> Vec<MeasurePoint> {
        self.order
            .iter()
            .filter_map(|id| self.points.get(id))
            .filter(|p| !p.is_measured())
            .cloned()
            .collect()
    }

    /// Points outside the given tolerance.
    pub fn divergent_points(&self, tolerance: f64) -> Vec<MeasurePoint> {
        self.order
            .iter()
            .filter_map(|id| self.points.get(id))
            .filter(|p| p.is_divergent(tolerance))
            .cloned()
            .collect()
    }

    /// Total number of points.
    pub fn point_count(&self) -> usize {
        self.order.len()
    }

    /// Number of fully measured points.
    pub fn measured_count(&self) -> usize {
        self.points.values().filter(|p| p.is_measured()).count()
    }

    /// Number of points missing at least one value.
    pub fn unmeasured_count(&self) -> usize {
        self.point_count() - self.measured_count()
    }

    /// Number of points outside the given tolerance.
    pub fn divergent_count(&self, tolerance: f64) -> usize {
        self.points
            .values()
            .filter(|p| p.is_divergent(tolerance))
            .count()
    }
}
