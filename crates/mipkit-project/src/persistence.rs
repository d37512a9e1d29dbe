//! The `.mip` file codec: gzip-compressed JSON envelope.
//!
//! All public entry points here are error-swallowing: failures are logged
//! and reported as `false`/`None` so a bad file never propagates a panic
//! or error into the host. The typed fallible path stays private.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mipkit_core::{AppEvent, EventBus, PersistenceError, ProjectEvent};

use crate::project::ProjectData;

/// Format tag every `.mip` envelope carries.
pub const MIP_FORMAT: &str = "mip";

/// Format version written by this codec.
pub const MIP_VERSION: &str = "1.0";

/// The on-disk envelope around the project payload
#[derive(Debug, Serialize, Deserialize)]
struct MipEnvelope {
    #[serde(default)]
    version: String,
    #[serde(default)]
    format: String,
    data: Value,
}

/// Save an arbitrary JSON payload as a `.mip` file.
///
/// Returns `false` on any failure, with the reason logged.
pub fn save_value(data: &Value, path: &Path) -> bool {
    match write_envelope(data, path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Project file saved");
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to save project file");
            false
        }
    }
}

/// Load the JSON payload of a `.mip` file.
///
/// `None` on any failure, including a wrong format tag. A version
/// mismatch only logs a warning; the payload is still returned.
pub fn load_value(path: &Path) -> Option<Value> {
    match read_envelope(path) {
        Ok(envelope) => {
            if envelope.version != MIP_VERSION {
                tracing::warn!(
                    path = %path.display(),
                    found = %envelope.version,
                    expected = MIP_VERSION,
                    "Project file version mismatch, loading anyway"
                );
            }
            Some(envelope.data)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to load project file");
            None
        }
    }
}

/// Save a typed project payload.
pub fn save_project(data: &ProjectData, path: &Path) -> bool {
    match serde_json::to_value(data) {
        Ok(value) => save_value(&value, path),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode project data");
            false
        }
    }
}

/// Load a typed project payload.
pub fn load_project(path: &Path) -> Option<ProjectData> {
    let value = load_value(path)?;
    match serde_json::from_value(value) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Project file has invalid contents");
            None
        }
    }
}

/// Whether the file at `path` is a readable `.mip` file.
pub fn is_mip_file(path: &Path) -> bool {
    read_envelope(path).is_ok()
}

/// Summary of a project file without fully loading it
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    /// Project name, if present.
    pub name: Option<String>,
    /// Board model, if present.
    pub board_model: Option<String>,
    /// Number of points in the file.
    pub point_count: usize,
    /// Whether a board image is embedded.
    pub has_image: bool,
    /// File size on disk in bytes.
    pub file_size: u64,
}

/// Peek at a project file for list views and open dialogs.
pub fn project_info(path: &Path) -> Option<ProjectInfo> {
    let data = load_value(path)?;
    let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let as_str = |v: &Value| v.as_str().map(str::to_owned);
    Some(ProjectInfo {
        name: data.pointer("/project/name").and_then(|v| as_str(v)),
        board_model: data.pointer("/project/board_model").and_then(|v| as_str(v)),
        point_count: data
            .pointer("/points/points")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
        has_image: data.get("image").is_some_and(|v| !v.is_null()),
        file_size,
    })
}

/// Dump a `.mip` file as uncompressed pretty JSON for debugging.
pub fn export_to_json(path: &Path, dest: &Path) -> bool {
    let Some(data) = load_value(path) else {
        return false;
    };
    match serde_json::to_vec_pretty(&data).map_err(PersistenceError::from).and_then(|bytes| {
        std::fs::write(dest, bytes).map_err(PersistenceError::from)
    }) {
        Ok(()) => {
            tracing::info!(dest = %dest.display(), "Project exported to JSON");
            true
        }
        Err(e) => {
            tracing::error!(dest = %dest.display(), error = %e, "Failed to export project");
            false
        }
    }
}

fn write_envelope(data: &Value, path: &Path) -> Result<(), PersistenceError> {
    let envelope = MipEnvelope {
        version: MIP_VERSION.to_string(),
        format: MIP_FORMAT.to_string(),
        data: data.clone(),
    };
    let json = serde_json::to_vec_pretty(&envelope)?;

    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(&json)?;
    encoder.finish()?;
    Ok(())
}

fn read_envelope(path: &Path) -> Result<MipEnvelope, PersistenceError> {
    if !path.exists() {
        return Err(PersistenceError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(file);
    let mut json = String::new();
    decoder
        .read_to_string(&mut json)
        .map_err(|e| PersistenceError::Decompression {
            reason: e.to_string(),
        })?;

    let envelope: MipEnvelope = serde_json::from_str(&json)?;
    if envelope.format != MIP_FORMAT {
        return Err(PersistenceError::WrongFormat {
            found: (!envelope.format.is_empty()).then_some(envelope.format),
        });
    }
    Ok(envelope)
}

/// Project file operations bound to an event bus
///
/// Thin wrapper over the free functions that additionally announces
/// successful saves and loads.
pub struct ProjectStore {
    bus: Arc<EventBus>,
}

impl ProjectStore {
    /// Create a store publishing on the given bus.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Save a project and announce it.
    pub fn save(&self, data: &ProjectData, path: &Path) -> bool {
        let saved = save_project(data, path);
        if saved {
            let _ = self.bus.publish(AppEvent::Project(ProjectEvent::Saved {
                path: PathBuf::from(path),
            }));
        }
        saved
    }

    /// Load a project and announce it.
    pub fn load(&self, path: &Path) -> Option<ProjectData> {
        let data = load_project(path)?;
        let _ = self.bus.publish(AppEvent::Project(ProjectEvent::Loaded {
            path: PathBuf::from(path),
            point_count: data.points.points.len(),
        }));
        Some(data)
    }
}
