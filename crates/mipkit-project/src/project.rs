//! Project metadata and the full project payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mipkit_board::ManagerSnapshot;

use crate::image_blob::ImageBlob;
use crate::settings::ProjectSettings;

/// Metadata describing a board project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardProject {
    /// Project name shown in titles.
    pub name: String,
    /// Model or revision of the board being mapped.
    #[serde(default)]
    pub board_model: String,
    /// Whether the reference board is known to be fully functional.
    #[serde(default = "default_fully_functional")]
    pub is_fully_functional: bool,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time, updated by `mark_modified`.
    pub modified_at: DateTime<Utc>,
}

fn default_fully_functional() -> bool {
    true
}

impl BoardProject {
    /// Create a fresh project with both timestamps set to now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            board_model: String::new(),
            is_fully_functional: true,
            description: String::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Bump the modification timestamp.
    pub fn mark_modified(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// The full `data` payload of a `.mip` file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    /// Project metadata.
    pub project: BoardProject,
    /// The point collection snapshot.
    pub points: ManagerSnapshot,
    /// Optional board photograph, PNG encoded as base64.
    #[serde(default)]
    pub image: Option<ImageBlob>,
    /// Project settings.
    #[serde(default)]
    pub settings: ProjectSettings,
}
