//! The editor action vocabulary.
//!
//! Actions are the only external input surface of the editing engine. They
//! arrive as JSON objects tagged by `type`, with camelCase payload fields:
//!
//! ```json
//! {"type": "trim_clip", "clipId": "c1", "start": 2.0}
//! ```
//!
//! Property, easing and strategy names travel as plain strings so that an
//! unknown name skips one action instead of rejecting the whole list.

use serde::{Deserialize, Serialize};

/// A single externally issued edit command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EditorAction {
    /// Choose the preset applied to newly added clips.
    SetPreset { preset_id: String },

    TrimClip {
        clip_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<f64>,
    },

    SetClipSpeed { clip_id: String, speed: f64 },

    SetClipZoom { clip_id: String, zoom: f64 },

    CropClip {
        clip_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
    },

    RenameClip { clip_id: String, name: String },

    /// Split at a source-video time.
    SplitClip { clip_id: String, at: f64 },

    AddClip {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preset_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speed: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        zoom: Option<f64>,
    },

    RemoveClip { clip_id: String },

    DuplicateClip { clip_id: String },

    /// Indices are signed on the wire; out-of-range values are a no-op.
    ReorderClips { from_index: i64, to_index: i64 },

    AddKeyframe {
        clip_id: String,
        property: String,
        time: f64,
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        easing: Option<String>,
    },

    RemoveKeyframe { clip_id: String, keyframe_id: String },

    /// Replace every clip with a generated cut list.
    AutoCut {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        strategy: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_duration: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        clip_count: Option<i64>,
    },

    /// Shave seconds off the head and tail of every clip.
    BatchTrim {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trim_start: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trim_end: Option<f64>,
    },

    ApplyPresetAll { preset_id: String },

    ToggleLoop { value: bool },

    Undo,

    Redo,

    /// Hand off to the export runner.
    ExportVideo,
}

impl EditorAction {
    /// The wire tag of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetPreset { .. } => "set_preset",
            Self::TrimClip { .. } => "trim_clip",
            Self::SetClipSpeed { .. } => "set_clip_speed",
            Self::SetClipZoom { .. } => "set_clip_zoom",
            Self::CropClip { .. } => "crop_clip",
            Self::RenameClip { .. } => "rename_clip",
            Self::SplitClip { .. } => "split_clip",
            Self::AddClip { .. } => "add_clip",
            Self::RemoveClip { .. } => "remove_clip",
            Self::DuplicateClip { .. } => "duplicate_clip",
            Self::ReorderClips { .. } => "reorder_clips",
            Self::AddKeyframe { .. } => "add_keyframe",
            Self::RemoveKeyframe { .. } => "remove_keyframe",
            Self::AutoCut { .. } => "auto_cut",
            Self::BatchTrim { .. } => "batch_trim",
            Self::ApplyPresetAll { .. } => "apply_preset_all",
            Self::ToggleLoop { .. } => "toggle_loop",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::ExportVideo => "export_video",
        }
    }
}

/// An action list entry that could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {source}")]
pub struct ActionParseError {
    /// The entry's `type` field, or `"unknown"` when absent.
    pub kind: String,
    pub source: serde_json::Error,
}

/// Parse a JSON array of actions element by element.
///
/// Fails only when the document is not a JSON array; malformed entries
/// come back as per-element errors.
pub fn parse_actions(
    json: &str,
) -> Result<Vec<Result<EditorAction, ActionParseError>>, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(values.into_iter().map(parse_action_value).collect())
}

/// Decode one action from an already-parsed JSON value.
pub fn parse_action_value(value: serde_json::Value) -> Result<EditorAction, ActionParseError> {
    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    serde_json::from_value(value).map_err(|source| ActionParseError { kind, source })
}
