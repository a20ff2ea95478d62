//! Timeline clips and their numeric invariants.
//!
//! Every mutation path funnels through [`TimelineClip::normalize`], which
//! clamps out-of-range values instead of rejecting them. Drag handles and
//! automated callers both produce transient garbage; the clip always ends up
//! valid.

use serde::{Deserialize, Serialize};

use crate::keyframe::{sort_keyframes, AnimatableProperty, Keyframe};
use crate::preset::{ShotPreset, NONE_PRESET_ID};

/// Shortest allowed source window, in seconds.
pub const MIN_CLIP_LENGTH: f64 = 0.2;

pub const MIN_SPEED: f64 = 0.25;
pub const MAX_SPEED: f64 = 3.0;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 3.0;

/// Smallest crop width/height, in percent of the frame.
pub const MIN_CROP_SIZE: f64 = 5.0;

/// Palette cycled by clip insertion order.
pub const CLIP_COLORS: [&str; 8] = [
    "#6366f1", "#ec4899", "#f59e0b", "#10b981", "#3b82f6", "#ef4444", "#8b5cf6", "#14b8a6",
];

/// A contiguous segment of the source video placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineClip {
    pub id: String,

    pub name: String,

    /// Window start, seconds into the source video.
    pub start: f64,

    /// Window end, seconds into the source video.
    pub end: f64,

    pub color: String,

    #[serde(default = "unit")]
    pub speed: f64,

    #[serde(default = "unit")]
    pub zoom: f64,

    /// Crop rectangle, percent of frame.
    #[serde(default)]
    pub crop_x: f64,
    #[serde(default)]
    pub crop_y: f64,
    #[serde(default = "full_frame")]
    pub crop_width: f64,
    #[serde(default = "full_frame")]
    pub crop_height: f64,

    #[serde(default = "default_preset_id")]
    pub preset_id: String,

    #[serde(default)]
    pub muted: bool,

    /// All keyframes of the clip, sorted by time.
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

fn unit() -> f64 {
    1.0
}

fn full_frame() -> f64 {
    100.0
}

fn default_preset_id() -> String {
    NONE_PRESET_ID.to_string()
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

impl TimelineClip {
    /// Create a clip named `Scene {ordinal}` with the palette colour for
    /// that ordinal (1-based).
    pub fn scene(ordinal: usize, start: f64, end: f64) -> Self {
        let ordinal = ordinal.max(1);
        Self {
            id: crate::new_id(),
            name: format!("Scene {ordinal}"),
            start,
            end,
            color: CLIP_COLORS[(ordinal - 1) % CLIP_COLORS.len()].to_string(),
            speed: 1.0,
            zoom: 1.0,
            crop_x: 0.0,
            crop_y: 0.0,
            crop_width: 100.0,
            crop_height: 100.0,
            preset_id: default_preset_id(),
            muted: false,
            keyframes: vec![],
        }
    }

    /// Source window length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Time the clip occupies on the edited timeline, after speed.
    pub fn timeline_duration(&self) -> f64 {
        self.duration() / self.speed
    }

    /// Keyframes of one property, in time order.
    pub fn keyframes_for(
        &self,
        property: AnimatableProperty,
    ) -> impl Iterator<Item = &Keyframe> + '_ {
        self.keyframes.iter().filter(move |k| k.property == property)
    }

    /// Static (non-animated) value of a property.
    pub fn base_value(&self, property: AnimatableProperty) -> f64 {
        match property {
            AnimatableProperty::Zoom => self.zoom,
            AnimatableProperty::Rotate => 0.0,
            AnimatableProperty::PanX | AnimatableProperty::PanY => 0.0,
            AnimatableProperty::Opacity => 1.0,
            AnimatableProperty::CropX => self.crop_x,
            AnimatableProperty::CropY => self.crop_y,
            AnimatableProperty::CropWidth => self.crop_width,
            AnimatableProperty::CropHeight => self.crop_height,
        }
    }

    /// Bulk-assign a preset's framing values.
    pub fn apply_preset(&mut self, preset: &ShotPreset) {
        self.zoom = preset.zoom;
        self.crop_x = preset.crop_x;
        self.crop_y = preset.crop_y;
        self.crop_width = preset.crop_width;
        self.crop_height = preset.crop_height;
        self.preset_id = preset.id.to_string();
    }

    /// Shift every keyframe so it keeps its absolute source time after the
    /// window start moved by `delta` seconds.
    pub fn rebase_keyframes(&mut self, delta: f64) {
        for keyframe in &mut self.keyframes {
            keyframe.time -= delta;
        }
    }

    /// Re-establish every numeric invariant.
    ///
    /// `video_duration <= 0` means the source length is unknown and the
    /// upper window bound is not enforced.
    pub fn normalize(&mut self, video_duration: f64) {
        let max_end = if video_duration.is_finite() && video_duration > 0.0 {
            video_duration
        } else {
            f64::INFINITY
        };
        let max_start = (max_end - MIN_CLIP_LENGTH).max(0.0);

        self.start = finite_or(self.start, 0.0).clamp(0.0, max_start);
        self.end = finite_or(self.end, self.start + MIN_CLIP_LENGTH)
            .max(self.start + MIN_CLIP_LENGTH)
            .min(max_end);

        self.speed = finite_or(self.speed, 1.0).clamp(MIN_SPEED, MAX_SPEED);
        self.zoom = finite_or(self.zoom, 1.0).clamp(MIN_ZOOM, MAX_ZOOM);

        self.crop_x = finite_or(self.crop_x, 0.0).clamp(0.0, 100.0 - MIN_CROP_SIZE);
        self.crop_y = finite_or(self.crop_y, 0.0).clamp(0.0, 100.0 - MIN_CROP_SIZE);
        self.crop_width =
            finite_or(self.crop_width, 100.0).clamp(MIN_CROP_SIZE, 100.0 - self.crop_x);
        self.crop_height =
            finite_or(self.crop_height, 100.0).clamp(MIN_CROP_SIZE, 100.0 - self.crop_y);

        let duration = self.duration().max(0.0);
        for keyframe in &mut self.keyframes {
            keyframe.time = finite_or(keyframe.time, 0.0).clamp(0.0, duration);
            let fallback = keyframe.property.value_range().0;
            keyframe.value = keyframe
                .property
                .clamp_value(finite_or(keyframe.value, fallback));
        }
        sort_keyframes(&mut self.keyframes);
    }

    /// Describe every invariant this clip currently violates.
    pub fn violations(&self, video_duration: f64) -> Vec<String> {
        let mut issues = vec![];
        let eps = 1e-9;

        if self.start < 0.0 || self.start >= self.end {
            issues.push(format!(
                "clip {}: invalid window [{}, {})",
                self.id, self.start, self.end
            ));
        }
        if video_duration > 0.0 && self.end > video_duration + eps {
            issues.push(format!(
                "clip {}: ends at {} past source duration {}",
                self.id, self.end, video_duration
            ));
        }
        if video_duration >= MIN_CLIP_LENGTH && self.duration() < MIN_CLIP_LENGTH - eps {
            issues.push(format!(
                "clip {}: shorter than {MIN_CLIP_LENGTH}s",
                self.id
            ));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            issues.push(format!("clip {}: speed {} out of range", self.id, self.speed));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            issues.push(format!("clip {}: zoom {} out of range", self.id, self.zoom));
        }
        if self.crop_x < 0.0
            || self.crop_y < 0.0
            || self.crop_x + self.crop_width > 100.0 + eps
            || self.crop_y + self.crop_height > 100.0 + eps
        {
            issues.push(format!("clip {}: crop rectangle leaves the frame", self.id));
        }

        issues
    }
}

/// Partial update merged into a clip by the store.
///
/// Non-finite numbers are ignored so the field keeps its current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub speed: Option<f64>,
    pub zoom: Option<f64>,
    pub crop_x: Option<f64>,
    pub crop_y: Option<f64>,
    pub crop_width: Option<f64>,
    pub crop_height: Option<f64>,
    pub muted: Option<bool>,
}

impl ClipPatch {
    /// Merge the set fields into `clip`. Does not normalize.
    pub fn apply_to(&self, clip: &mut TimelineClip) {
        fn merge(slot: &mut f64, value: Option<f64>) {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                *slot = v;
            }
        }

        if let Some(name) = &self.name {
            clip.name = name.clone();
        }
        if let Some(color) = &self.color {
            clip.color = color.clone();
        }
        merge(&mut clip.start, self.start);
        merge(&mut clip.end, self.end);
        merge(&mut clip.speed, self.speed);
        merge(&mut clip.zoom, self.zoom);
        merge(&mut clip.crop_x, self.crop_x);
        merge(&mut clip.crop_y, self.crop_y);
        merge(&mut clip.crop_width, self.crop_width);
        merge(&mut clip.crop_height, self.crop_height);
        if let Some(muted) = self.muted {
            clip.muted = muted;
        }
    }

    /// True when the patch touches the source window.
    pub fn touches_window(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}
