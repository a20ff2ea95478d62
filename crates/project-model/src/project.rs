//! Project bundle: metadata plus the persisted timeline.
//!
//! A project directory holds the source reference and the editing state:
//!
//! ```text
//! my-edit/
//! ├── sources/
//! ├── meta/
//! │   ├── project.json
//! │   └── timeline.json
//! └── exports/
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::timeline::Timeline;

/// Top-level project file (`project.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Unique project identifier (UUID).
    pub id: String,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,

    /// Last modified timestamp (RFC 3339).
    pub modified_at: String,

    /// The raw video being cut.
    pub source: SourceVideo,
}

/// Reference to the source video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceVideo {
    /// Path relative to the project root. Empty until media is attached.
    #[serde(default)]
    pub path: String,

    /// Duration in seconds, as reported by the media probe.
    pub duration_secs: f64,
}

/// The complete in-memory representation of a loaded project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Filesystem path to the project directory.
    pub root: PathBuf,

    /// Project metadata.
    pub project: Project,

    /// Editing timeline.
    pub timeline: Timeline,
}

impl Project {
    /// Create a new project for a source of the given duration.
    pub fn new(name: impl Into<String>, duration_secs: f64) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            id: crate::new_id(),
            created_at: now.clone(),
            modified_at: now,
            source: SourceVideo {
                path: String::new(),
                duration_secs,
            },
        }
    }
}

impl LoadedProject {
    /// Load a project from a directory.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();

        let project_path = root.join("meta").join("project.json");
        let timeline_path = root.join("meta").join("timeline.json");

        let project: Project = read_json(&project_path)?;

        let timeline = if timeline_path.exists() {
            read_json(&timeline_path)?
        } else {
            Timeline::new(project.source.duration_secs)
        };

        Ok(Self {
            root,
            project,
            timeline,
        })
    }

    /// Save project and timeline to disk, bumping `modified_at`.
    pub fn save(&mut self) -> Result<(), ProjectError> {
        let meta_dir = self.root.join("meta");
        std::fs::create_dir_all(&meta_dir).map_err(|e| ProjectError::IoError {
            path: meta_dir.clone(),
            source: e,
        })?;

        self.project.modified_at = chrono::Utc::now().to_rfc3339();

        write_json(&meta_dir.join("project.json"), &self.project)?;
        write_json(&meta_dir.join("timeline.json"), &self.timeline)?;

        tracing::debug!(root = %self.root.display(), clips = self.timeline.clips.len(), "Project saved");
        Ok(())
    }

    /// Create a new project on disk with the standard directory structure.
    pub fn create(
        root: impl AsRef<Path>,
        name: impl Into<String>,
        duration_secs: f64,
    ) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();

        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(ProjectError::ValidationError {
                message: format!("source duration must be positive, got {duration_secs}"),
            });
        }

        for subdir in &["sources", "meta", "exports"] {
            std::fs::create_dir_all(root.join(subdir)).map_err(|e| ProjectError::IoError {
                path: root.join(subdir),
                source: e,
            })?;
        }

        let mut loaded = Self {
            root,
            project: Project::new(name, duration_secs),
            timeline: Timeline::new(duration_secs),
        };
        loaded.save()?;
        Ok(loaded)
    }

    /// Check the loaded state for inconsistencies.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.timeline.violations();

        if (self.timeline.video_duration - self.project.source.duration_secs).abs() > 1e-6 {
            errors.push(format!(
                "timeline duration {} does not match source duration {}",
                self.timeline.video_duration, self.project.source.duration_secs
            ));
        }

        if !self.project.source.path.is_empty() {
            let path = self.root.join(&self.project.source.path);
            if !path.exists() {
                errors.push(format!("Source missing: {}", self.project.source.path));
            }
        }

        errors
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|e| ProjectError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ProjectError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ProjectError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ProjectError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| ProjectError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}
