//! Shot presets: named bundles of framing values applied to a clip in one step.

use serde::Serialize;

/// A camera/composition preset from the static table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub zoom: f64,
    pub crop_x: f64,
    pub crop_y: f64,
    pub crop_width: f64,
    pub crop_height: f64,
}

/// Identifier of the neutral preset.
pub const NONE_PRESET_ID: &str = "none";

/// The full preset table. Crop values assume a 16:9 source frame.
pub const PRESETS: &[ShotPreset] = &[
    ShotPreset {
        id: NONE_PRESET_ID,
        name: "None",
        description: "Full frame, no zoom",
        zoom: 1.0,
        crop_x: 0.0,
        crop_y: 0.0,
        crop_width: 100.0,
        crop_height: 100.0,
    },
    ShotPreset {
        id: "cinematic",
        name: "Cinematic",
        description: "2.39:1 letterbox",
        zoom: 1.0,
        crop_x: 0.0,
        crop_y: 12.8,
        crop_width: 100.0,
        crop_height: 74.4,
    },
    ShotPreset {
        id: "close-up",
        name: "Close-up",
        description: "Tight framing on the subject",
        zoom: 1.6,
        crop_x: 0.0,
        crop_y: 0.0,
        crop_width: 100.0,
        crop_height: 100.0,
    },
    ShotPreset {
        id: "dramatic",
        name: "Dramatic",
        description: "Heavy push-in",
        zoom: 2.2,
        crop_x: 0.0,
        crop_y: 0.0,
        crop_width: 100.0,
        crop_height: 100.0,
    },
    ShotPreset {
        id: "punch-in",
        name: "Punch-in",
        description: "Subtle zoom for emphasis",
        zoom: 1.25,
        crop_x: 0.0,
        crop_y: 0.0,
        crop_width: 100.0,
        crop_height: 100.0,
    },
    ShotPreset {
        id: "vertical",
        name: "Vertical",
        description: "Centred 9:16 crop for short-form",
        zoom: 1.0,
        crop_x: 34.18,
        crop_y: 0.0,
        crop_width: 31.64,
        crop_height: 100.0,
    },
    ShotPreset {
        id: "square",
        name: "Square",
        description: "Centred 1:1 crop",
        zoom: 1.0,
        crop_x: 21.88,
        crop_y: 0.0,
        crop_width: 56.25,
        crop_height: 100.0,
    },
];

/// Look up a preset by id.
pub fn find_preset(id: &str) -> Option<&'static ShotPreset> {
    PRESETS.iter().find(|p| p.id == id)
}
