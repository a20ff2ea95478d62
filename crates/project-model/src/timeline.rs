//! The timeline aggregate: ordered clips over one source video.
//!
//! Clip order is the edit/playback order. It is independent of where the
//! clips sit in source time; gaps and overlaps between source windows are
//! legal.

use serde::{Deserialize, Serialize};

use crate::clip::TimelineClip;
use crate::preset::NONE_PRESET_ID;

/// Complete editing state for one source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Schema version.
    pub version: String,

    /// Clips in edit order.
    pub clips: Vec<TimelineClip>,

    /// Source video length in seconds. Owned by the outside world.
    pub video_duration: f64,

    /// Playhead position on the edited timeline, seconds.
    #[serde(default)]
    pub current_time: f64,

    /// Preset given to newly added clips.
    #[serde(default = "default_preset_id")]
    pub selected_preset_id: String,

    #[serde(default)]
    pub selected_clip_id: Option<String>,

    #[serde(default)]
    pub loop_selected_clip: bool,
}

fn default_preset_id() -> String {
    NONE_PRESET_ID.to_string()
}

/// The undo-tracked part of a timeline.
///
/// Playhead, selection and the loop flag are view state and survive
/// undo/redo untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub clips: Vec<TimelineClip>,
    pub selected_preset_id: String,
}

/// Where a timeline time lands inside the edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipLocation {
    /// Index into `Timeline::clips`.
    pub index: usize,
    /// Seconds since the clip began playing, on the edited timeline.
    pub offset: f64,
    /// Corresponding time in the source video.
    pub source_time: f64,
}

impl Timeline {
    /// Create an empty timeline for a source of the given length.
    pub fn new(video_duration: f64) -> Self {
        Self {
            version: "1.0".to_string(),
            clips: vec![],
            video_duration: video_duration.max(0.0),
            current_time: 0.0,
            selected_preset_id: default_preset_id(),
            selected_clip_id: None,
            loop_selected_clip: false,
        }
    }

    pub fn clip(&self, id: &str) -> Option<&TimelineClip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn clip_index(&self, id: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.id == id)
    }

    pub fn selected_clip(&self) -> Option<&TimelineClip> {
        self.selected_clip_id.as_deref().and_then(|id| self.clip(id))
    }

    /// Length of the edited output, honouring per-clip speed.
    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(TimelineClip::timeline_duration).sum()
    }

    /// Find the clip playing at `time` on the edited timeline.
    pub fn clip_at(&self, time: f64) -> Option<ClipLocation> {
        if !time.is_finite() || time < 0.0 {
            return None;
        }

        let mut elapsed = 0.0;
        for (index, clip) in self.clips.iter().enumerate() {
            let length = clip.timeline_duration();
            let is_last = index + 1 == self.clips.len();
            if time < elapsed + length || (is_last && time <= elapsed + length) {
                let offset = time - elapsed;
                return Some(ClipLocation {
                    index,
                    offset,
                    source_time: (clip.start + offset * clip.speed).min(clip.end),
                });
            }
            elapsed += length;
        }
        None
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            clips: self.clips.clone(),
            selected_preset_id: self.selected_preset_id.clone(),
        }
    }

    /// Replace the undo-tracked state. A selection that no longer resolves
    /// is cleared.
    pub fn apply_snapshot(&mut self, snapshot: HistorySnapshot) {
        self.clips = snapshot.clips;
        self.selected_preset_id = snapshot.selected_preset_id;
        if self.selected_clip().is_none() {
            self.selected_clip_id = None;
        }
    }

    /// Describe every invariant the timeline currently violates.
    pub fn violations(&self) -> Vec<String> {
        let mut issues: Vec<String> = self
            .clips
            .iter()
            .flat_map(|c| c.violations(self.video_duration))
            .collect();

        let mut ids: Vec<&str> = self.clips.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            issues.push("duplicate clip ids".to_string());
        }
        if let Some(id) = &self.selected_clip_id {
            if self.clip(id).is_none() {
                issues.push(format!("selected clip {id} does not exist"));
            }
        }
        if crate::preset::find_preset(&self.selected_preset_id).is_none() {
            issues.push(format!("unknown preset '{}'", self.selected_preset_id));
        }

        issues
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_clip_timeline() -> Timeline {
        let mut timeline = Timeline::new(30.0);
        timeline.clips.push(TimelineClip::scene(1, 0.0, 4.0));
        let mut fast = TimelineClip::scene(2, 10.0, 16.0);
        fast.speed = 2.0;
        timeline.clips.push(fast);
        timeline
    }

    #[test]
    fn test_total_duration_honours_speed() {
        let timeline = two_clip_timeline();
        assert!((timeline.total_duration() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_at_maps_to_source_time() {
        let timeline = two_clip_timeline();

        let first = timeline.clip_at(1.5).unwrap();
        assert_eq!(first.index, 0);
        assert!((first.source_time - 1.5).abs() < 1e-9);

        let second = timeline.clip_at(5.0).unwrap();
        assert_eq!(second.index, 1);
        assert!((second.offset - 1.0).abs() < 1e-9);
        assert!((second.source_time - 12.0).abs() < 1e-9);

        assert_eq!(timeline.clip_at(7.0).map(|l| l.index), Some(1));
        assert!(timeline.clip_at(7.5).is_none());
        assert!(timeline.clip_at(-1.0).is_none());
    }

    #[test]
    fn test_snapshot_clears_dangling_selection() {
        let mut timeline = two_clip_timeline();
        let before = timeline.snapshot();
        let removed = timeline.clips.remove(0);
        timeline.selected_clip_id = Some(removed.id.clone());

        let mut empty = before.clone();
        empty.clips.clear();
        timeline.apply_snapshot(empty);
        assert!(timeline.selected_clip_id.is_none());

        timeline.apply_snapshot(before);
        assert_eq!(timeline.clips.len(), 2);
    }

    #[test]
    fn test_violations_catch_dangling_selection() {
        let mut timeline = two_clip_timeline();
        assert!(timeline.violations().is_empty());
        timeline.selected_clip_id = Some("ghost".to_string());
        assert_eq!(timeline.violations().len(), 1);
    }

    #[test]
    fn test_timeline_serialization_uses_camel_case() {
        let timeline = two_clip_timeline();
        let json = serde_json::to_string(&timeline).unwrap();
        assert!(json.contains("\"videoDuration\":30.0"));
        assert!(json.contains("\"cropWidth\":100.0"));
        let parsed: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, timeline);
    }
}
