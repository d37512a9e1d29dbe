//! Serialization snapshot of the point collection.
//!
//! The snapshot is the `points` payload of a project file. Restore is
//! deliberately not transactional: the collection is cleared first, and a
//! bad snapshot leaves the manager empty rather than half-loaded.

use serde::{Deserialize, Serialize};

use mipkit_core::SnapshotError;

use crate::point::MeasurePoint;

use super::PointManager;

/// Point-collection payload of a project file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerSnapshot {
    /// Points in insertion order.
    pub points: Vec<MeasurePoint>,
    /// Next id the manager would assign.
    pub next_id: u32,
    /// Collection-level settings.
    #[serde(default)]
    pub settings: SnapshotSettings,
}

/// Manager settings carried in a snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SnapshotSettings {
    /// Measurement timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub measurement_timeout: f64,
    /// Point ceiling.
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

fn default_timeout_secs() -> f64 {
    30.0
}

fn default_max_points() -> usize {
    super::MAX_POINTS
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            measurement_timeout: default_timeout_secs(),
            max_points: default_max_points(),
        }
    }
}

impl PointManager {
    /// Capture the collection for saving.
    pub fn snapshot(&self) -> ManagerSnapshot {
        ManagerSnapshot {
            points: self.points(),
            next_id: self.next_id,
            settings: SnapshotSettings {
                measurement_timeout: self.measurement_timeout.as_secs_f64(),
                max_points: self.max_points,
            },
        }
    }

    /// Replace the collection with a snapshot.
    ///
    /// The current collection is cleared first. On a bad snapshot the
    /// error is logged, the manager ends up empty, and `false` is
    /// returned. `next_id` always lands above the highest loaded id.
    pub fn restore(&mut self, snapshot: ManagerSnapshot) -> bool {
        self.clear_points();

        if let Err(e) = self.load_records(&snapshot) {
            tracing::error!(error = %e, "Failed to restore point snapshot");
            self.clear_points();
            return false;
        }
        self.touch();

        tracing::info!(count = self.order.len(), "Point snapshot restored");
        true
    }

    fn load_records(&mut self, snapshot: &ManagerSnapshot) -> Result<(), SnapshotError> {
        // File-derived floats can be infinite or absurdly large; reject
        // rather than panic in the Duration conversion
        let timeout = std::time::Duration::try_from_secs_f64(
            snapshot.settings.measurement_timeout.max(0.0),
        )
        .map_err(|e| SnapshotError::InvalidSettings {
            reason: format!(
                "measurement timeout {}: {}",
                snapshot.settings.measurement_timeout, e
            ),
        })?;

        // The file's own ceiling governs its point count
        if snapshot.points.len() > snapshot.settings.max_points {
            return Err(SnapshotError::InvalidRecord {
                index: snapshot.settings.max_points,
                reason: format!(
                    "point count exceeds the {} ceiling",
                    snapshot.settings.max_points
                ),
            });
        }

        let mut max_id = 0;
        for point in &snapshot.points {
            if self.points.contains_key(&point.id) {
                return Err(SnapshotError::DuplicateId { id: point.id });
            }
            self.order.push(point.id);
            self.points.insert(point.id, point.clone());
            max_id = max_id.max(point.id);
        }
        self.next_id = self.next_id.max(max_id + 1).max(snapshot.next_id);

        self.set_measurement_timeout(timeout);
        self.max_points = snapshot.settings.max_points;
        Ok(())
    }
}
