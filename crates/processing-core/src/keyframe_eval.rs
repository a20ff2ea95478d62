//! Keyframe evaluation for playback and rendering.
//!
//! Keyframe times are relative to the clip's source window start. Between
//! two keyframes the value follows the earlier keyframe's easing curve;
//! outside the keyed range it holds the nearest keyframe value.

use serde::Serialize;

use cutline_project_model::{AnimatableProperty, Timeline, TimelineClip, MIN_CROP_SIZE};

/// Crop rectangle in percent of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    /// Pull the rectangle back inside the frame. Position wins over size.
    fn contained(self) -> Self {
        let x = self.x.clamp(0.0, 100.0 - MIN_CROP_SIZE);
        let y = self.y.clamp(0.0, 100.0 - MIN_CROP_SIZE);
        Self {
            x,
            y,
            width: self.width.clamp(MIN_CROP_SIZE, 100.0 - x),
            height: self.height.clamp(MIN_CROP_SIZE, 100.0 - y),
        }
    }
}

/// Every animatable property of a clip at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTransform {
    pub zoom: f64,
    pub rotate: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub opacity: f64,
    pub crop: CropRect,
}

/// What the renderer should show at a point on the edited timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFrame {
    pub clip_index: usize,
    pub clip_id: String,
    /// Seconds into the source video.
    pub source_time: f64,
    /// Seconds since the clip's window start, in source time.
    pub local_time: f64,
    pub muted: bool,
    pub transform: FrameTransform,
}

/// Value of one property at `local_time` seconds into the clip window.
pub fn evaluate_property(
    clip: &TimelineClip,
    property: AnimatableProperty,
    local_time: f64,
) -> f64 {
    let keys: Vec<_> = clip.keyframes_for(property).collect();

    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return clip.base_value(property);
    };

    if !local_time.is_finite() || local_time <= first.time {
        return first.value;
    }
    if local_time >= last.time {
        return last.value;
    }

    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if local_time >= a.time && local_time < b.time {
            let span = b.time - a.time;
            if span <= f64::EPSILON {
                return b.value;
            }
            let progress = (local_time - a.time) / span;
            let eased = a.easing.apply(progress);
            return property.clamp_value(a.value + (b.value - a.value) * eased);
        }
    }

    last.value
}

/// Evaluate every property of `clip` at `local_time`.
pub fn resolve_frame(clip: &TimelineClip, local_time: f64) -> FrameTransform {
    let value = |property| evaluate_property(clip, property, local_time);

    FrameTransform {
        zoom: value(AnimatableProperty::Zoom),
        rotate: value(AnimatableProperty::Rotate),
        pan_x: value(AnimatableProperty::PanX),
        pan_y: value(AnimatableProperty::PanY),
        opacity: value(AnimatableProperty::Opacity),
        crop: CropRect {
            x: value(AnimatableProperty::CropX),
            y: value(AnimatableProperty::CropY),
            width: value(AnimatableProperty::CropWidth),
            height: value(AnimatableProperty::CropHeight),
        }
        .contained(),
    }
}

/// Locate the clip under the playhead and evaluate it.
///
/// Returns `None` past the end of the edit or on an empty timeline.
pub fn resolve_at(timeline: &Timeline, timeline_time: f64) -> Option<ResolvedFrame> {
    let location = timeline.clip_at(timeline_time)?;
    let clip = timeline.clips.get(location.index)?;
    let local_time = location.source_time - clip.start;

    tracing::trace!(
        clip = %clip.id,
        timeline_time,
        source_time = location.source_time,
        "Resolved playhead"
    );

    Some(ResolvedFrame {
        clip_index: location.index,
        clip_id: clip.id.clone(),
        source_time: location.source_time,
        local_time,
        muted: clip.muted,
        transform: resolve_frame(clip, local_time),
    })
}
