pub mod apply;
pub mod auto_cut;
pub mod config;
pub mod info;
pub mod init;
pub mod validate;

use std::path::Path;

use cutline_common::{CutlineError, CutlineResult};
use cutline_project_model::LoadedProject;

/// Load a project bundle from disk.
pub fn load_project(path: &Path) -> CutlineResult<LoadedProject> {
    if !path.exists() {
        return Err(CutlineError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    LoadedProject::load(path)
        .map_err(|e| CutlineError::project(format!("Failed to load project: {e}")))
}

pub fn save_project(project: &mut LoadedProject) -> CutlineResult<()> {
    project
        .save()
        .map_err(|e| CutlineError::project(format!("Failed to save project: {e}")))
}
