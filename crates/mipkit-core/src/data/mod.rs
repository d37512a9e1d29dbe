//! Shared data types for MipKit.
//!
//! Plain value types that cross crate boundaries: shape and measurement
//! discriminants used by events and filters, and the aggregate statistics
//! snapshot computed by the point manager and consumed by the UI layer.

use serde::{Deserialize, Serialize};

/// Shape discriminant for a measurement point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Circular point (center + radius)
    Circle,
    /// Rectangular point (center + width/height)
    Rectangle,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Circle => write!(f, "circle"),
            Self::Rectangle => write!(f, "rectangle"),
        }
    }
}

/// Which board a measurement value was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    /// Value from the known-good reference board
    Reference,
    /// Value from the board under test
    Test,
}

impl std::fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Min/max/average summary over a set of measured values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueStats {
    /// Smallest value seen.
    pub min: f64,
    /// Largest value seen.
    pub max: f64,
    /// Arithmetic mean.
    pub avg: f64,
}

impl ValueStats {
    /// Summarize a slice of values; `None` when the slice is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        Some(Self {
            min,
            max,
            avg: sum / values.len() as f64,
        })
    }
}

/// Aggregate statistics over the point collection
///
/// Computed by the point manager for a given tolerance and cached until
/// the next mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    /// Total number of points.
    pub total: usize,
    /// Points with both reference and test values recorded.
    pub measured: usize,
    /// Points still missing at least one value.
    pub unmeasured: usize,
    /// Measured points within tolerance.
    pub passed: usize,
    /// Measured points outside tolerance.
    pub divergent: usize,
    /// Measured / total, in percent (0 when there are no points).
    pub measurement_progress: f64,
    /// Passed / measured, in percent (0 when nothing is measured).
    pub pass_rate: f64,
    /// Tolerance (percent) this snapshot was computed for.
    pub tolerance: f64,
    /// Number of circular points.
    pub circles: usize,
    /// Number of rectangular points.
    pub rectangles: usize,
    /// Summary of reference values among measured points, if any.
    pub reference_values: Option<ValueStats>,
    /// Summary of test values among measured points, if any.
    pub test_values: Option<ValueStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_stats_empty() {
        assert!(ValueStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_value_stats_summary() {
        let stats = ValueStats::from_values(&[1.0, 3.0, 2.0]).expect("non-empty");
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert!((stats.avg - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&ShapeKind::Circle).expect("serialize"),
            "\"circle\""
        );
        let kind: ShapeKind = serde_json::from_str("\"rectangle\"").expect("deserialize");
        assert_eq!(kind, ShapeKind::Rectangle);
    }

    #[test]
    fn test_measurement_kind_display() {
        assert_eq!(MeasurementKind::Reference.to_string(), "reference");
        assert_eq!(MeasurementKind::Test.to_string(), "test");
    }
}
