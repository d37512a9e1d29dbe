//! Point geometry: shape variants, size limits, and hit tests.

use mipkit_core::{PointError, ShapeKind};
use serde::{Deserialize, Serialize};

/// Largest valid board coordinate on either axis, in image pixels.
pub const BOARD_MAX_COORD: i32 = 10_000;

/// Geometry of a measurement point
///
/// The variant decides which dimensions exist: a circle never carries a
/// width and a rectangle never carries a radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointGeometry {
    /// Circle around the point center.
    Circle {
        /// Radius in pixels.
        radius: u32,
    },
    /// Axis-aligned rectangle around the point center.
    Rectangle {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

impl PointGeometry {
    /// Default geometry for a shape kind with the given default size.
    pub fn default_for(kind: ShapeKind, size: u32) -> Self {
        match kind {
            ShapeKind::Circle => Self::Circle { radius: size },
            ShapeKind::Rectangle => Self::Rectangle {
                width: size,
                height: size,
            },
        }
    }

    /// The shape discriminant of this geometry.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
        }
    }

    /// Area covered by the shape, in pixels².
    pub fn area(&self) -> f64 {
        match self {
            Self::Circle { radius } => std::f64::consts::PI * f64::from(*radius).powi(2),
            Self::Rectangle { width, height } => f64::from(*width) * f64::from(*height),
        }
    }

    /// Axis-aligned bounding box `(min_x, min_y, max_x, max_y)` around a
    /// center.
    pub fn bounds(&self, cx: i32, cy: i32) -> (f64, f64, f64, f64) {
        let (cx, cy) = (f64::from(cx), f64::from(cy));
        match self {
            Self::Circle { radius } => {
                let r = f64::from(*radius);
                (cx - r, cy - r, cx + r, cy + r)
            }
            Self::Rectangle { width, height } => {
                let (hw, hh) = (f64::from(*width) / 2.0, f64::from(*height) / 2.0);
                (cx - hw, cy - hh, cx + hw, cy + hh)
            }
        }
    }

    /// Hit test: whether `(px, py)` lies inside the shape centered at
    /// `(cx, cy)`.
    pub fn contains(&self, cx: i32, cy: i32, px: i32, py: i32) -> bool {
        match self {
            Self::Circle { radius } => {
                let dx = f64::from(px - cx);
                let dy = f64::from(py - cy);
                (dx * dx + dy * dy).sqrt() <= f64::from(*radius)
            }
            Self::Rectangle { .. } => {
                let (min_x, min_y, max_x, max_y) = self.bounds(cx, cy);
                let (px, py) = (f64::from(px), f64::from(py));
                px >= min_x && px <= max_x && py >= min_y && py <= max_y
            }
        }
    }

    /// Short size description, e.g. `r=20px` or `20x30px`.
    pub fn size_text(&self) -> String {
        match self {
            Self::Circle { radius } => format!("r={}px", radius),
            Self::Rectangle { width, height } => format!("{}x{}px", width, height),
        }
    }
}

/// Valid range for point dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryLimits {
    /// Minimum dimension in pixels.
    pub min_size: u32,
    /// Maximum dimension in pixels.
    pub max_size: u32,
}

impl Default for GeometryLimits {
    fn default() -> Self {
        Self {
            min_size: 10,
            max_size: 60,
        }
    }
}

impl GeometryLimits {
    /// Validate every dimension of a geometry against this range.
    ///
    /// Out-of-range values are a creation error, never silently clamped.
    pub fn check(&self, geometry: &PointGeometry) -> Result<(), PointError> {
        let dims: &[(&'static str, u32)] = match geometry {
            PointGeometry::Circle { radius } => &[("radius", *radius)],
            PointGeometry::Rectangle { width, height } => {
                &[("width", *width), ("height", *height)]
            }
        };
        for &(dimension, value) in dims {
            if value < self.min_size || value > self.max_size {
                return Err(PointError::DimensionOutOfRange {
                    dimension,
                    value,
                    min: self.min_size,
                    max: self.max_size,
                });
            }
        }
        Ok(())
    }
}

/// Validate board coordinates.
pub fn check_coordinates(x: i32, y: i32) -> Result<(), PointError> {
    if x < 0 || y < 0 || x > BOARD_MAX_COORD || y > BOARD_MAX_COORD {
        return Err(PointError::InvalidCoordinates { x, y });
    }
    Ok(())
}
