//! The measurement point entity.
//!
//! A point stores its geometry plus up to two recorded values: one from
//! the known-good reference board and one from the board under test.
//! The divergence math lives here; everything collection-shaped lives in
//! the manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mipkit_core::ShapeKind;

use crate::model::PointGeometry;

/// Values this close to zero are treated as zero by the divergence math.
pub(crate) const VALUE_EPSILON: f64 = 1e-3;

/// Tolerance verdict for a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToleranceStatus {
    /// Measured and within tolerance.
    Ok,
    /// Measured and outside tolerance.
    Divergent,
    /// Missing at least one value.
    NotMeasured,
}

impl std::fmt::Display for ToleranceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Divergent => write!(f, "DIVERGENT"),
            Self::NotMeasured => write!(f, "NOT MEASURED"),
        }
    }
}

/// A measurement point on the board image
///
/// Created through `PointManager::add_point`, never directly by the UI.
/// Serializes to the flat record layout of the `.mip` format (shape
/// discriminant plus optional radius/width/height fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PointRecord", into = "PointRecord")]
pub struct MeasurePoint {
    /// Unique id assigned by the manager, never reused.
    pub id: u32,
    /// Center x in image pixels.
    pub x: i32,
    /// Center y in image pixels.
    pub y: i32,
    /// Shape and dimensions.
    pub geometry: PointGeometry,
    /// Value from the reference board, once measured.
    pub reference_value: Option<f64>,
    /// Value from the board under test, once measured.
    pub test_value: Option<f64>,
    /// Optional label.
    pub name: Option<String>,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Component type, e.g. "resistor", "capacitor".
    pub component_type: Option<String>,
    /// Expected nominal value, e.g. "10k", "100uF".
    pub expected_value: Option<String>,
    /// When the point was created.
    pub created_at: DateTime<Utc>,
    /// When the first value was recorded.
    pub measured_at: Option<DateTime<Utc>>,
}

impl MeasurePoint {
    /// Create an unmeasured point.
    pub fn new(id: u32, x: i32, y: i32, geometry: PointGeometry) -> Self {
        Self {
            id,
            x,
            y,
            geometry,
            reference_value: None,
            test_value: None,
            name: None,
            description: None,
            component_type: None,
            expected_value: None,
            created_at: Utc::now(),
            measured_at: None,
        }
    }

    // ---- Measurement state ----

    /// Whether both values have been recorded.
    pub fn is_measured(&self) -> bool {
        self.reference_value.is_some() && self.test_value.is_some()
    }

    /// Whether the reference value has been recorded.
    pub fn has_reference(&self) -> bool {
        self.reference_value.is_some()
    }

    /// Whether the test value has been recorded.
    pub fn has_test_value(&self) -> bool {
        self.test_value.is_some()
    }

    /// Record the reference-board value, stamping `measured_at` on the
    /// first measurement.
    pub fn set_reference_value(&mut self, value: f64) {
        self.reference_value = Some(value);
        if self.measured_at.is_none() {
            self.measured_at = Some(Utc::now());
        }
    }

    /// Record the test-board value, stamping `measured_at` on the first
    /// measurement.
    pub fn set_test_value(&mut self, value: f64) {
        self.test_value = Some(value);
        if self.measured_at.is_none() {
            self.measured_at = Some(Utc::now());
        }
    }

    /// Drop both values and the measurement timestamp.
    pub fn clear_measurements(&mut self) {
        self.reference_value = None;
        self.test_value = None;
        self.measured_at = None;
    }

    // ---- Analysis ----

    /// Whether the point is outside the given tolerance (in percent).
    ///
    /// Unmeasured points are never divergent. A reference of ~0 with a
    /// test of ~0 is not divergent; a reference of ~0 with a non-zero
    /// test always is.
    pub fn is_divergent(&self, tolerance: f64) -> bool {
        let (Some(reference), Some(test)) = (self.reference_value, self.test_value) else {
            return false;
        };

        if reference.abs() < VALUE_EPSILON {
            return test.abs() > VALUE_EPSILON;
        }

        let diff_percent = ((test - reference) / reference).abs() * 100.0;
        diff_percent > tolerance
    }

    /// Signed percentage difference between test and reference.
    ///
    /// `None` when unmeasured or when the reference is ~0 (the ratio is
    /// undefined there; `is_divergent` still gives a verdict).
    pub fn difference_percent(&self) -> Option<f64> {
        let (reference, test) = (self.reference_value?, self.test_value?);
        if reference.abs() < VALUE_EPSILON {
            return None;
        }
        Some((test - reference) / reference * 100.0)
    }

    /// Signed absolute difference between test and reference.
    pub fn difference_absolute(&self) -> Option<f64> {
        Some(self.test_value? - self.reference_value?)
    }

    /// Tolerance verdict for display.
    pub fn tolerance_status(&self, tolerance: f64) -> ToleranceStatus {
        if !self.is_measured() {
            ToleranceStatus::NotMeasured
        } else if self.is_divergent(tolerance) {
            ToleranceStatus::Divergent
        } else {
            ToleranceStatus::Ok
        }
    }

    // ---- Geometry ----

    /// Shape discriminant of this point.
    pub fn shape(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Center coordinates.
    pub fn center(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Distance from the point center to `(px, py)`.
    pub fn distance_to(&self, px: i32, py: i32) -> f64 {
        let dx = f64::from(px - self.x);
        let dy = f64::from(py - self.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Hit test against this point's shape.
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        self.geometry.contains(self.x, self.y, px, py)
    }

    // ---- Display ----

    /// Name for list display, e.g. `#3: C17` or `Point #3`.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("#{}: {}", self.id, name),
            None => format!("Point #{}", self.id),
        }
    }

    /// One-line measurement summary for tables.
    pub fn measurement_summary(&self) -> String {
        let (Some(reference), Some(test)) = (self.reference_value, self.test_value) else {
            return "Not measured".to_string();
        };

        match self.difference_percent() {
            Some(diff) => format!("Ref: {:.3} | Test: {:.3} ({:+.1}%)", reference, test, diff),
            None => format!("Ref: {:.3} | Test: {:.3}", reference, test),
        }
    }
}

impl std::fmt::Display for MeasurePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Point(id={}, x={}, y={}, shape={}, measured={})",
            self.id,
            self.x,
            self.y,
            self.shape(),
            self.is_measured()
        )
    }
}

/// Flat serialization record matching the `.mip` point layout.
///
/// The shape discriminant plus optional dimension fields; absent
/// dimensions fall back to 20 px like the original file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PointRecord {
    id: u32,
    x: i32,
    y: i32,
    shape: ShapeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    radius: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(default)]
    reference_value: Option<f64>,
    #[serde(default)]
    test_value: Option<f64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    component_type: Option<String>,
    #[serde(default)]
    expected_value: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    measured_at: Option<DateTime<Utc>>,
}

/// Fallback dimension when a record omits radius/width/height.
const DEFAULT_RECORD_SIZE: u32 = 20;

impl From<PointRecord> for MeasurePoint {
    fn from(record: PointRecord) -> Self {
        let geometry = match record.shape {
            ShapeKind::Circle => PointGeometry::Circle {
                radius: record.radius.unwrap_or(DEFAULT_RECORD_SIZE),
            },
            ShapeKind::Rectangle => PointGeometry::Rectangle {
                width: record.width.unwrap_or(DEFAULT_RECORD_SIZE),
                height: record.height.unwrap_or(DEFAULT_RECORD_SIZE),
            },
        };
        Self {
            id: record.id,
            x: record.x,
            y: record.y,
            geometry,
            reference_value: record.reference_value,
            test_value: record.test_value,
            name: record.name,
            description: record.description,
            component_type: record.component_type,
            expected_value: record.expected_value,
            created_at: record.created_at,
            measured_at: record.measured_at,
        }
    }
}

impl From<MeasurePoint> for PointRecord {
    fn from(point: MeasurePoint) -> Self {
        let (radius, width, height) = match point.geometry {
            PointGeometry::Circle { radius } => (Some(radius), None, None),
            PointGeometry::Rectangle { width, height } => (None, Some(width), Some(height)),
        };
        Self {
            id: point.id,
            x: point.x,
            y: point.y,
            shape: point.geometry.kind(),
            radius,
            width,
            height,
            reference_value: point.reference_value,
            test_value: point.test_value,
            name: point.name,
            description: point.description,
            component_type: point.component_type,
            expected_value: point.expected_value,
            created_at: point.created_at,
            measured_at: point.measured_at,
        }
    }
}
