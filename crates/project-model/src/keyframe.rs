//! Keyframe types for per-clip property animation.
//!
//! Keyframe times are clip-local: `0.0` is the clip's `start` in source
//! time, and the last valid time is the clip's duration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of clip properties that can carry keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimatableProperty {
    Zoom,
    Rotate,
    PanX,
    PanY,
    Opacity,
    CropX,
    CropY,
    CropWidth,
    CropHeight,
}

impl AnimatableProperty {
    pub const ALL: [AnimatableProperty; 9] = [
        AnimatableProperty::Zoom,
        AnimatableProperty::Rotate,
        AnimatableProperty::PanX,
        AnimatableProperty::PanY,
        AnimatableProperty::Opacity,
        AnimatableProperty::CropX,
        AnimatableProperty::CropY,
        AnimatableProperty::CropWidth,
        AnimatableProperty::CropHeight,
    ];

    /// Wire name, as used in action payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zoom => "zoom",
            Self::Rotate => "rotate",
            Self::PanX => "panX",
            Self::PanY => "panY",
            Self::Opacity => "opacity",
            Self::CropX => "cropX",
            Self::CropY => "cropY",
            Self::CropWidth => "cropWidth",
            Self::CropHeight => "cropHeight",
        }
    }

    /// Valid value range for this property.
    pub fn value_range(&self) -> (f64, f64) {
        match self {
            Self::Zoom => (crate::clip::MIN_ZOOM, crate::clip::MAX_ZOOM),
            Self::Rotate => (-360.0, 360.0),
            Self::PanX | Self::PanY => (-100.0, 100.0),
            Self::Opacity => (0.0, 1.0),
            Self::CropX | Self::CropY | Self::CropWidth | Self::CropHeight => (0.0, 100.0),
        }
    }

    /// Clamp a value into this property's domain.
    pub fn clamp_value(&self, value: f64) -> f64 {
        let (lo, hi) = self.value_range();
        value.clamp(lo, hi)
    }
}

impl fmt::Display for AnimatableProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimatableProperty {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownName {
                kind: "property",
                name: s.to_string(),
            })
    }
}

/// Interpolation curve applied from a keyframe to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Keep the keyframe value until the next keyframe.
    Hold,
}

impl Easing {
    pub const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Hold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Hold => "hold",
        }
    }

    /// Map normalized progress `t` in `[0, 1]` through the curve.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::Hold => 0.0,
        }
    }
}

impl FromStr for Easing {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownName {
                kind: "easing",
                name: s.to_string(),
            })
    }
}

/// A name that is not part of one of the model's closed vocabularies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{name}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

/// A timed value sample on one property of one clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    /// Unique within the owning clip.
    pub id: String,

    pub property: AnimatableProperty,

    /// Seconds relative to the clip start.
    pub time: f64,

    pub value: f64,

    #[serde(default)]
    pub easing: Easing,
}

impl Keyframe {
    /// Create a keyframe with a freshly generated id.
    pub fn new(property: AnimatableProperty, time: f64, value: f64, easing: Easing) -> Self {
        Self {
            id: crate::new_id(),
            property,
            time,
            value,
            easing,
        }
    }
}

/// Sort keyframes by time, keeping insertion order for equal times.
pub fn sort_keyframes(keyframes: &mut [Keyframe]) {
    keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
}
