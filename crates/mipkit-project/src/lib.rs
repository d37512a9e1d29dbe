//! # MipKit Project
//!
//! Project metadata, settings, and the `.mip` file format.
//!
//! A `.mip` file is a gzip-compressed JSON envelope:
//!
//! ```json
//! { "version": "1.0", "format": "mip", "data": { ... } }
//! ```
//!
//! The `data` payload is a [`ProjectData`]: project metadata, the point
//! collection snapshot, project settings, and an optional base64-encoded
//! board image. The persistence boundary swallows errors by design: save
//! and load report success as `bool`/`Option` and log the reason, so a
//! corrupt file can never take the host application down.

pub mod image_blob;
pub mod persistence;
pub mod project;
pub mod settings;

pub use image_blob::ImageBlob;
pub use persistence::{
    export_to_json, is_mip_file, load_project, load_value, project_info, save_project, save_value,
    ProjectInfo, ProjectStore, MIP_FORMAT, MIP_VERSION,
};
pub use project::{BoardProject, ProjectData};
pub use settings::ProjectSettings;
