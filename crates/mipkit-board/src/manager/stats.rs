//! Aggregate statistics with a dirty-flag cache.

use mipkit_core::{AppEvent, PointEvent, ShapeKind, StatisticsSnapshot, ValueStats};

use super::PointManager;

impl PointManager {
    /// Aggregate statistics for the given tolerance (percent).
    ///
    /// Recomputed only when the collection changed since the last call or
    /// the tolerance differs; `StatisticsChanged` is emitted only on a
    /// recompute.
    pub fn statistics(&mut self, tolerance: f64) -> StatisticsSnapshot {
        if !self.stats_dirty {
            if let Some(cached) = &self.stats_cache {
                if cached.tolerance == tolerance {
                    return cached.clone();
                }
            }
        }

        let stats = self.compute_statistics(tolerance);
        self.stats_cache = Some(stats.clone());
        self.stats_dirty = false;

        self.emit(AppEvent::Point(PointEvent::StatisticsChanged {
            stats: stats.clone(),
        }));
        stats
    }

    fn compute_statistics(&self, tolerance: f64) -> StatisticsSnapshot {
        let total = self.point_count();
        let measured = self.measured_count();
        let unmeasured = total - measured;
        let divergent = self.divergent_count(tolerance);
        let passed = measured - divergent;

        let mut reference = Vec::with_capacity(measured);
        let mut test = Vec::with_capacity(measured);
        let mut circles = 0;
        let mut rectangles = 0;
        for point in self.points.values() {
            match point.shape() {
                ShapeKind::Circle => circles += 1,
                ShapeKind::Rectangle => rectangles += 1,
            }
            if point.is_measured() {
                if let Some(v) = point.reference_value {
                    reference.push(v);
                }
                if let Some(v) = point.test_value {
                    test.push(v);
                }
            }
        }

        StatisticsSnapshot {
            total,
            measured,
            unmeasured,
            passed,
            divergent,
            measurement_progress: if total > 0 {
                measured as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            pass_rate: if measured > 0 {
                passed as f64 / measured as f64 * 100.0
            } else {
                0.0
            },
            tolerance,
            circles,
            rectangles,
            reference_values: ValueStats::from_values(&reference),
            test_values: ValueStats::from_values(&test),
        }
    }
}
