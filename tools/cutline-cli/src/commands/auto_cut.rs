//! Generate a cut list from the source duration.

use std::path::PathBuf;

use cutline_action_executor::ActionExecutor;
use cutline_common::EditorConfig;
use cutline_processing_core::{generate_auto_cut_actions, AutoCutOptions, AutoCutStrategy};
use cutline_project_model::EditorAction;
use cutline_timeline_store::TimelineStore;

pub fn run(
    path: PathBuf,
    strategy: String,
    clips: Option<i64>,
    target: Option<f64>,
    apply: bool,
    config: &EditorConfig,
) -> anyhow::Result<()> {
    let strategy: AutoCutStrategy = strategy.parse()?;
    let clip_count = clips.unwrap_or(config.auto_cut_clip_count);

    let mut project = super::load_project(&path)?;

    if !apply {
        let options = AutoCutOptions {
            strategy,
            target_duration: target,
            clip_count,
        };
        let actions = generate_auto_cut_actions(
            &project.timeline.clips,
            project.timeline.video_duration,
            &options,
        );
        println!("{}", serde_json::to_string_pretty(&actions)?);
        return Ok(());
    }

    let action = EditorAction::AutoCut {
        strategy: Some(strategy.as_str().to_string()),
        target_duration: target,
        clip_count: Some(clip_count),
    };

    let mut store = TimelineStore::from_timeline(project.timeline.clone(), config);
    let report = ActionExecutor::with_config(config).execute(&mut store, &[action]);
    if !report.errors.is_empty() || report.executed.is_empty() {
        anyhow::bail!("auto-cut did not apply: {}", serde_json::to_string(&report)?);
    }

    project.timeline = store.into_timeline();
    super::save_project(&mut project)?;

    println!("Auto-cut applied ({}):", strategy.as_str());
    for clip in &project.timeline.clips {
        println!("  {:<12} [{:>7.2}, {:>7.2})", clip.name, clip.start, clip.end);
    }

    Ok(())
}
