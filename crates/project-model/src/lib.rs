//! Cutline Project Model
//!
//! Defines the core data contracts for the editing engine:
//! - **Clips:** Source windows with speed, zoom, crop and keyframe tracks
//! - **Presets:** Static table of framing bundles
//! - **Timeline:** The ordered clip sequence over one source video
//! - **Actions:** The tagged command vocabulary accepted by the executor
//! - **Project:** On-disk bundle holding metadata and the timeline
//!
//! Times are seconds. Crop values are percentages of the source frame.

pub mod action;
pub mod clip;
pub mod keyframe;
pub mod preset;
pub mod project;
pub mod timeline;

pub use action::*;
pub use clip::*;
pub use keyframe::*;
pub use preset::*;
pub use project::*;
pub use timeline::*;

/// Generate a fresh opaque identifier for clips, keyframes and projects.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
