//! Per-project settings carried inside the `.mip` file.

use serde::{Deserialize, Serialize};

use mipkit_core::ShapeKind;

/// Project-level settings
///
/// Every field has a serde default so files written by older versions
/// still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Divergence tolerance in percent.
    #[serde(default = "default_tolerance")]
    pub tolerance_percent: f64,
    /// Shape used for newly created points.
    #[serde(default = "default_shape")]
    pub default_shape: ShapeKind,
    /// Dimension in pixels for newly created points.
    #[serde(default = "default_size")]
    pub default_size: u32,
    /// Measurement timeout in seconds.
    #[serde(default = "default_timeout")]
    pub measurement_timeout_secs: f64,
}

fn default_tolerance() -> f64 {
    5.0
}

fn default_shape() -> ShapeKind {
    ShapeKind::Circle
}

fn default_size() -> u32 {
    20
}

fn default_timeout() -> f64 {
    30.0
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            tolerance_percent: default_tolerance(),
            default_shape: default_shape(),
            default_size: default_size(),
            measurement_timeout_secs: default_timeout(),
        }
    }
}
