//! Apply a JSON action list to a project.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cutline_action_executor::ActionExecutor;
use cutline_common::{CutlineError, CutlineResult, EditorConfig};
use cutline_project_model::Timeline;
use cutline_timeline_store::TimelineStore;

/// Name of the edit list handed to the renderer.
const EDIT_LIST_FILE: &str = "edit-list.json";

pub fn run(
    path: PathBuf,
    actions: PathBuf,
    dry_run: bool,
    config: &EditorConfig,
) -> anyhow::Result<()> {
    let mut project = super::load_project(&path)?;

    let json = std::fs::read_to_string(&actions)
        .with_context(|| format!("failed to read {}", actions.display()))?;

    let mut store = TimelineStore::from_timeline(project.timeline.clone(), config);
    let exports_dir = project.root.join("exports");
    let mut executor = ActionExecutor::with_config(config).with_export_hook(move |timeline| {
        if dry_run {
            tracing::info!("Dry run: export skipped");
            return Ok(());
        }
        let target = export_edit_list(&exports_dir, timeline)?;
        tracing::info!(path = %target.display(), "Edit list exported");
        Ok(())
    });

    let report = executor
        .execute_json(&mut store, &json)
        .with_context(|| format!("{} is not a JSON array of actions", actions.display()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if dry_run {
        println!("\nDry run: project not saved.");
        return Ok(());
    }

    project.timeline = store.into_timeline();
    super::save_project(&mut project)?;
    println!(
        "\nSaved {} clip(s) to {}",
        project.timeline.clips.len(),
        project.root.display()
    );

    Ok(())
}

/// Write the timeline as the renderer's edit list.
fn export_edit_list(exports_dir: &Path, timeline: &Timeline) -> CutlineResult<PathBuf> {
    if timeline.clips.is_empty() {
        return Err(CutlineError::export("timeline has no clips"));
    }

    std::fs::create_dir_all(exports_dir)?;
    let target = exports_dir.join(EDIT_LIST_FILE);
    std::fs::write(&target, serde_json::to_string_pretty(timeline)?)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutline_project_model::TimelineClip;

    #[test]
    fn test_export_refuses_empty_timeline() {
        let dir = std::env::temp_dir().join("cutline_test_export_empty");
        let err = export_edit_list(&dir, &Timeline::new(10.0)).unwrap_err();
        assert!(matches!(err, CutlineError::Export { .. }));
    }

    #[test]
    fn test_export_writes_edit_list() {
        let dir = std::env::temp_dir().join("cutline_test_export");
        let _ = std::fs::remove_dir_all(&dir);

        let mut timeline = Timeline::new(10.0);
        timeline.clips.push(TimelineClip::scene(1, 0.0, 4.0));
        let path = export_edit_list(&dir, &timeline).unwrap();

        let written: Timeline =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, timeline);

        std::fs::remove_dir_all(&dir).ok();
    }
}
