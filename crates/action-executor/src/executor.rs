//! Action list dispatch.
//!
//! An action list is applied inside a single store batch, so the whole list
//! is one undo step. Each action lands in exactly one bucket of the
//! [`ExecutionReport`]; a bad action never stops the ones after it.

use serde::{Deserialize, Serialize};

use cutline_common::EditorConfig;
use cutline_processing_core::{generate_auto_cut_actions, AutoCutOptions, AutoCutStrategy};
use cutline_project_model::{
    find_preset, parse_actions, AnimatableProperty, ClipPatch, Easing, EditorAction, Timeline,
    TimelineClip, MIN_CLIP_LENGTH,
};
use cutline_timeline_store::TimelineStore;

/// Callback that hands the finished timeline to an export runner.
pub type ExportHook = Box<dyn FnMut(&Timeline) -> anyhow::Result<()>>;

/// Undo label of an executed action list.
const BATCH_LABEL: &str = "apply actions";

/// Per-action result buckets, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Tags of actions that changed (or validly re-set) state.
    pub executed: Vec<String>,
    /// Tags of actions that did not apply (unknown id, unknown name, nothing to do).
    pub skipped: Vec<String>,
    /// `"{tag}: {message}"` for actions that failed.
    pub errors: Vec<String>,
}

impl ExecutionReport {
    /// True when nothing was skipped and nothing failed.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.errors.is_empty()
    }

    pub fn total(&self) -> usize {
        self.executed.len() + self.skipped.len() + self.errors.len()
    }
}

/// Failures that land in [`ExecutionReport::errors`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("source video duration is unknown")]
    NoSourceVideo,

    #[error("export failed: {0:#}")]
    Export(anyhow::Error),
}

/// What happened to one action that did not fail.
#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Applied,
    Skipped(&'static str),
}

fn applied_if(ok: bool, reason: &'static str) -> Outcome {
    if ok {
        Outcome::Applied
    } else {
        Outcome::Skipped(reason)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Applies action lists to a [`TimelineStore`].
pub struct ActionExecutor {
    export_hook: Option<ExportHook>,
    default_clip_duration: f64,
    default_clip_count: i64,
}

impl Default for ActionExecutor {
    fn default() -> Self {
        Self::with_config(&EditorConfig::default())
    }
}

impl std::fmt::Debug for ActionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionExecutor")
            .field("export_hook", &self.export_hook.is_some())
            .field("default_clip_duration", &self.default_clip_duration)
            .field("default_clip_count", &self.default_clip_count)
            .finish()
    }
}

impl ActionExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `add_clip` and `auto_cut` defaults from the editor settings.
    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            export_hook: None,
            default_clip_duration: config.default_clip_duration,
            default_clip_count: config.auto_cut_clip_count,
        }
    }

    /// Attach the runner invoked by `export_video`.
    ///
    /// Failures must come back as `Err`; they land in the report's `errors`.
    /// A panicking hook unwinds out of `execute`, though the open batch still
    /// closes its undo entry on the way out.
    pub fn with_export_hook(
        mut self,
        hook: impl FnMut(&Timeline) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.export_hook = Some(Box::new(hook));
        self
    }

    /// Apply `actions` in order as one undo step.
    pub fn execute(&mut self, store: &mut TimelineStore, actions: &[EditorAction]) -> ExecutionReport {
        self.execute_entries(store, actions.iter().map(Ok))
    }

    /// Parse a JSON array of actions and apply it. Entries that fail to
    /// decode are reported under `errors`; the rest still run.
    pub fn execute_json(
        &mut self,
        store: &mut TimelineStore,
        json: &str,
    ) -> Result<ExecutionReport, serde_json::Error> {
        let parsed = parse_actions(json)?;
        Ok(self.execute_entries(
            store,
            parsed.iter().map(|entry| entry.as_ref().map_err(ToString::to_string)),
        ))
    }

    fn execute_entries<'a>(
        &mut self,
        store: &mut TimelineStore,
        entries: impl IntoIterator<Item = Result<&'a EditorAction, String>>,
    ) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        let mut batch = store.begin_batch(BATCH_LABEL);

        for entry in entries {
            match entry {
                Ok(action) => self.run(&mut batch, action, &mut report),
                Err(message) => {
                    tracing::warn!(%message, "Malformed action");
                    report.errors.push(message);
                }
            }
        }

        let recorded = batch.commit();
        tracing::info!(
            executed = report.executed.len(),
            skipped = report.skipped.len(),
            errors = report.errors.len(),
            undo_entry = recorded,
            "Action list applied"
        );
        report
    }

    fn run(&mut self, store: &mut TimelineStore, action: &EditorAction, report: &mut ExecutionReport) {
        let kind = action.kind();
        match self.dispatch(store, action, report) {
            Ok(Outcome::Applied) => {
                tracing::debug!(action = kind, "Executed");
                report.executed.push(kind.to_string());
            }
            Ok(Outcome::Skipped(reason)) => {
                tracing::warn!(action = kind, reason, "Skipped");
                report.skipped.push(kind.to_string());
            }
            Err(e) => {
                tracing::warn!(action = kind, error = %e, "Failed");
                report.errors.push(format!("{kind}: {e}"));
            }
        }
    }

    fn dispatch(
        &mut self,
        store: &mut TimelineStore,
        action: &EditorAction,
        report: &mut ExecutionReport,
    ) -> Result<Outcome, DispatchError> {
        let outcome = match action {
            EditorAction::SetPreset { preset_id } => {
                applied_if(store.set_selected_preset_id(preset_id), "unknown preset")
            }

            EditorAction::TrimClip {
                clip_id,
                start,
                end,
            } => applied_if(store.trim_clip(clip_id, *start, *end), "unknown clip"),

            EditorAction::SetClipSpeed { clip_id, speed } => {
                let patch = ClipPatch {
                    speed: Some(*speed),
                    ..Default::default()
                };
                applied_if(store.update_clip(clip_id, &patch), "unknown clip")
            }

            EditorAction::SetClipZoom { clip_id, zoom } => {
                let patch = ClipPatch {
                    zoom: Some(*zoom),
                    ..Default::default()
                };
                applied_if(store.update_clip(clip_id, &patch), "unknown clip")
            }

            EditorAction::CropClip {
                clip_id,
                x,
                y,
                width,
                height,
            } => {
                let patch = ClipPatch {
                    crop_x: *x,
                    crop_y: *y,
                    crop_width: *width,
                    crop_height: *height,
                    ..Default::default()
                };
                applied_if(store.update_clip(clip_id, &patch), "unknown clip")
            }

            EditorAction::RenameClip { clip_id, name } => {
                let patch = ClipPatch {
                    name: Some(name.clone()),
                    ..Default::default()
                };
                applied_if(store.update_clip(clip_id, &patch), "unknown clip")
            }

            EditorAction::SplitClip { clip_id, at } => {
                if !at.is_finite() {
                    return Err(DispatchError::NonFinite { field: "at" });
                }
                if store.clip(clip_id).is_none() {
                    Outcome::Skipped("unknown clip")
                } else {
                    applied_if(
                        store.split_clip(clip_id, *at).is_some(),
                        "clip too short to split",
                    )
                }
            }

            EditorAction::AddClip {
                start,
                end,
                duration,
                name,
                preset_id,
                speed,
                zoom,
            } => self.add_clip(store, *start, *end, *duration, name, preset_id, *speed, *zoom)?,

            EditorAction::RemoveClip { clip_id } => {
                applied_if(store.remove_clip(clip_id), "unknown clip")
            }

            EditorAction::DuplicateClip { clip_id } => {
                applied_if(store.duplicate_clip(clip_id).is_some(), "unknown clip")
            }

            EditorAction::ReorderClips {
                from_index,
                to_index,
            } => {
                let (Ok(from), Ok(to)) =
                    (usize::try_from(*from_index), usize::try_from(*to_index))
                else {
                    return Ok(Outcome::Skipped("index out of range"));
                };
                applied_if(store.reorder_clips(from, to), "index out of range")
            }

            EditorAction::AddKeyframe {
                clip_id,
                property,
                time,
                value,
                easing,
            } => {
                let Ok(property) = property.parse::<AnimatableProperty>() else {
                    return Ok(Outcome::Skipped("unknown property"));
                };
                let easing = match easing.as_deref() {
                    None => Easing::default(),
                    Some(name) => match name.parse::<Easing>() {
                        Ok(easing) => easing,
                        Err(_) => return Ok(Outcome::Skipped("unknown easing")),
                    },
                };
                if !time.is_finite() {
                    return Err(DispatchError::NonFinite { field: "time" });
                }
                if !value.is_finite() {
                    return Err(DispatchError::NonFinite { field: "value" });
                }
                applied_if(
                    store
                        .add_keyframe(clip_id, property, *time, *value, easing)
                        .is_some(),
                    "unknown clip",
                )
            }

            EditorAction::RemoveKeyframe {
                clip_id,
                keyframe_id,
            } => applied_if(
                store.remove_keyframe(clip_id, keyframe_id),
                "unknown clip or keyframe",
            ),

            EditorAction::AutoCut {
                strategy,
                target_duration,
                clip_count,
            } => {
                let strategy = match strategy.as_deref() {
                    None => AutoCutStrategy::default(),
                    Some(name) => match name.parse::<AutoCutStrategy>() {
                        Ok(strategy) => strategy,
                        Err(_) => return Ok(Outcome::Skipped("unknown strategy")),
                    },
                };
                let options = AutoCutOptions {
                    strategy,
                    target_duration: *target_duration,
                    clip_count: clip_count.unwrap_or(self.default_clip_count),
                };
                let generated =
                    generate_auto_cut_actions(store.clips(), store.video_duration(), &options);
                if generated.is_empty() {
                    Outcome::Skipped("source duration unknown")
                } else {
                    for sub in &generated {
                        self.run(store, sub, report);
                    }
                    Outcome::Applied
                }
            }

            EditorAction::BatchTrim {
                trim_start,
                trim_end,
            } => {
                let head = finite(*trim_start).unwrap_or(0.0);
                let tail = finite(*trim_end).unwrap_or(0.0);
                if store.clips().is_empty() {
                    Outcome::Skipped("no clips")
                } else if head == 0.0 && tail == 0.0 {
                    Outcome::Skipped("nothing to trim")
                } else {
                    let windows: Vec<(String, f64, f64)> = store
                        .clips()
                        .iter()
                        .map(|c| (c.id.clone(), c.start + head, c.end - tail))
                        .collect();
                    for (id, start, end) in windows {
                        store.trim_clip(&id, Some(start), Some(end));
                    }
                    Outcome::Applied
                }
            }

            EditorAction::ApplyPresetAll { preset_id } => {
                if find_preset(preset_id).is_none() {
                    Outcome::Skipped("unknown preset")
                } else {
                    store.set_selected_preset_id(preset_id);
                    let ids: Vec<String> = store.clips().iter().map(|c| c.id.clone()).collect();
                    for id in ids {
                        store.apply_preset_to_clip(&id, preset_id);
                    }
                    Outcome::Applied
                }
            }

            EditorAction::ToggleLoop { value } => {
                store.set_loop_selected_clip(*value);
                Outcome::Applied
            }

            EditorAction::Undo => applied_if(store.undo(), "nothing to undo"),

            EditorAction::Redo => applied_if(store.redo(), "nothing to redo"),

            EditorAction::ExportVideo => match self.export_hook.as_mut() {
                None => Outcome::Skipped("no export runner attached"),
                Some(hook) => {
                    hook(store.timeline()).map_err(DispatchError::Export)?;
                    Outcome::Applied
                }
            },
        };

        Ok(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    fn add_clip(
        &self,
        store: &mut TimelineStore,
        start: Option<f64>,
        end: Option<f64>,
        duration: Option<f64>,
        name: &Option<String>,
        preset_id: &Option<String>,
        speed: Option<f64>,
        zoom: Option<f64>,
    ) -> Result<Outcome, DispatchError> {
        let video_duration = store.video_duration();
        if video_duration <= 0.0 {
            return Err(DispatchError::NoSourceVideo);
        }

        let preset_id = preset_id
            .clone()
            .unwrap_or_else(|| store.timeline().selected_preset_id.clone());
        let Some(preset) = find_preset(&preset_id) else {
            return Ok(Outcome::Skipped("unknown preset"));
        };

        let start = finite(start).unwrap_or_else(|| {
            let tail = store.clips().last().map_or(0.0, |c| c.end);
            if video_duration - tail < MIN_CLIP_LENGTH {
                0.0
            } else {
                tail
            }
        });
        let length = finite(duration)
            .filter(|d| *d > 0.0)
            .unwrap_or(self.default_clip_duration);
        let end = finite(end).unwrap_or(start + length);

        let mut clip = TimelineClip::scene(store.clips().len() + 1, start, end);
        if let Some(name) = name {
            clip.name = name.clone();
        }
        clip.apply_preset(preset);
        if let Some(speed) = finite(speed) {
            clip.speed = speed;
        }
        if let Some(zoom) = finite(zoom) {
            clip.zoom = zoom;
        }

        store.add_clip(clip);
        Ok(Outcome::Applied)
    }
}

/// Apply `actions` with a default executor (no export runner).
pub fn execute_actions(store: &mut TimelineStore, actions: &[EditorAction]) -> ExecutionReport {
    ActionExecutor::default().execute(store, actions)
}
