//! Auto-cut: synthesize a full cut list from the source duration alone.
//!
//! # Strategies
//!
//! - **Even:** partition `[0, D)` into `count` contiguous windows of equal
//!   length. Full coverage of the source.
//! - **Proportional:** `count` short highlight clips whose starts are evenly
//!   spread over the source, each `target / count` seconds long, where
//!   `target` defaults to 70% of the source.
//!
//! The generator is pure: it returns actions and never touches a store.
//! Output always begins with one `remove_clip` per existing clip, so
//! applying it replaces the whole timeline.

use std::str::FromStr;

use cutline_project_model::{EditorAction, TimelineClip, UnknownName, NONE_PRESET_ID};

/// Upper bound on generated clips.
pub const MAX_AUTO_CUT_CLIPS: i64 = 20;

/// Share of the source used by the proportional strategy when no target
/// duration is given.
pub const DEFAULT_TARGET_RATIO: f64 = 0.7;

/// How the source is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoCutStrategy {
    #[default]
    Even,
    Proportional,
}

impl AutoCutStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Even => "even",
            Self::Proportional => "proportional",
        }
    }
}

impl FromStr for AutoCutStrategy {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "even" => Ok(Self::Even),
            "proportional" => Ok(Self::Proportional),
            other => Err(UnknownName {
                kind: "strategy",
                name: other.to_string(),
            }),
        }
    }
}

/// Parameters for [`generate_auto_cut_actions`].
#[derive(Debug, Clone, PartialEq)]
pub struct AutoCutOptions {
    pub strategy: AutoCutStrategy,

    /// Total seconds of material for the proportional strategy.
    pub target_duration: Option<f64>,

    /// Requested number of clips, clamped to `[1, 20]`.
    pub clip_count: i64,
}

impl Default for AutoCutOptions {
    fn default() -> Self {
        Self {
            strategy: AutoCutStrategy::Even,
            target_duration: None,
            clip_count: 5,
        }
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Produce the actions that replace `existing` with a generated cut list.
///
/// Returns an empty list when the source duration is unknown.
pub fn generate_auto_cut_actions(
    existing: &[TimelineClip],
    video_duration: f64,
    options: &AutoCutOptions,
) -> Vec<EditorAction> {
    if !video_duration.is_finite() || video_duration <= 0.0 {
        return vec![];
    }

    let count = options.clip_count.clamp(1, MAX_AUTO_CUT_CLIPS) as usize;

    let mut actions: Vec<EditorAction> = existing
        .iter()
        .map(|clip| EditorAction::RemoveClip {
            clip_id: clip.id.clone(),
        })
        .collect();

    let windows = match options.strategy {
        AutoCutStrategy::Even => even_windows(video_duration, count),
        AutoCutStrategy::Proportional => {
            let target = options
                .target_duration
                .filter(|t| t.is_finite() && *t > 0.0)
                .unwrap_or(video_duration * DEFAULT_TARGET_RATIO);
            proportional_windows(video_duration, count, target)
        }
    };

    actions.extend(
        windows
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| EditorAction::AddClip {
                start: Some(start),
                end: Some(end),
                duration: None,
                name: Some(format!("Scene {}", i + 1)),
                preset_id: Some(NONE_PRESET_ID.to_string()),
                speed: None,
                zoom: None,
            }),
    );

    tracing::debug!(
        strategy = ?options.strategy,
        count,
        video_duration,
        actions = actions.len(),
        "Auto-cut generated"
    );

    actions
}

/// Contiguous windows sharing rounded boundaries, so neighbours meet
/// exactly. The final boundary is `duration` itself, unrounded, so the cut
/// list always ends on the last frame of the source.
fn even_windows(duration: f64, count: usize) -> Vec<(f64, f64)> {
    let segment = duration / count as f64;
    let boundary = |i: usize| {
        if i == count {
            duration
        } else {
            round2(i as f64 * segment).min(duration)
        }
    };
    (0..count).map(|i| (boundary(i), boundary(i + 1))).collect()
}

fn proportional_windows(duration: f64, count: usize, target: f64) -> Vec<(f64, f64)> {
    let clip_target = target / count as f64;
    (0..count)
        .map(|i| {
            let start = i as f64 / count as f64 * duration;
            let end = (start + clip_target).min(duration);
            (round2(start), round2(end).min(duration))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows(actions: &[EditorAction]) -> Vec<(f64, f64)> {
        actions
            .iter()
            .filter_map(|a| match a {
                EditorAction::AddClip {
                    start: Some(s),
                    end: Some(e),
                    ..
                } => Some((*s, *e)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_unknown_duration_yields_nothing() {
        let existing = vec![TimelineClip::scene(1, 0.0, 5.0)];
        assert!(generate_auto_cut_actions(&existing, 0.0, &AutoCutOptions::default()).is_empty());
        assert!(
            generate_auto_cut_actions(&existing, f64::NAN, &AutoCutOptions::default()).is_empty()
        );
    }

    #[test]
    fn test_removes_existing_clips_first() {
        let existing = vec![
            TimelineClip::scene(1, 0.0, 5.0),
            TimelineClip::scene(2, 5.0, 9.0),
        ];
        let actions = generate_auto_cut_actions(&existing, 30.0, &AutoCutOptions::default());
        assert_eq!(actions.len(), 2 + 5);
        assert_eq!(
            actions[0],
            EditorAction::RemoveClip {
                clip_id: existing[0].id.clone()
            }
        );
        assert_eq!(actions[1].kind(), "remove_clip");
        assert!(actions[2..].iter().all(|a| a.kind() == "add_clip"));
    }

    #[test]
    fn test_even_covers_source_contiguously() {
        let options = AutoCutOptions {
            strategy: AutoCutStrategy::Even,
            clip_count: 4,
            ..Default::default()
        };
        let actions = generate_auto_cut_actions(&[], 37.3, &options);
        let w = windows(&actions);
        assert_eq!(w.len(), 4);
        assert_eq!(w[0].0, 0.0);
        assert_eq!(w[3].1, 37.3);
        for pair in w.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        for (start, end) in &w {
            assert!(end > start);
        }
    }

    #[test]
    fn test_even_names_and_preset() {
        let options = AutoCutOptions {
            clip_count: 3,
            ..Default::default()
        };
        let actions = generate_auto_cut_actions(&[], 30.0, &options);
        assert_eq!(
            actions[1],
            EditorAction::AddClip {
                start: Some(10.0),
                end: Some(20.0),
                duration: None,
                name: Some("Scene 2".to_string()),
                preset_id: Some("none".to_string()),
                speed: None,
                zoom: None,
            }
        );
    }

    #[test]
    fn test_proportional_spacing() {
        let options = AutoCutOptions {
            strategy: AutoCutStrategy::Proportional,
            clip_count: 3,
            target_duration: Some(9.0),
        };
        let w = windows(&generate_auto_cut_actions(&[], 30.0, &options));
        assert_eq!(w, vec![(0.0, 3.0), (10.0, 13.0), (20.0, 23.0)]);
    }

    #[test]
    fn test_proportional_defaults_to_seventy_percent() {
        let options = AutoCutOptions {
            strategy: AutoCutStrategy::Proportional,
            clip_count: 2,
            target_duration: None,
        };
        let w = windows(&generate_auto_cut_actions(&[], 100.0, &options));
        assert_eq!(w, vec![(0.0, 35.0), (50.0, 85.0)]);
    }

    #[test]
    fn test_proportional_end_clamped_to_source() {
        let options = AutoCutOptions {
            strategy: AutoCutStrategy::Proportional,
            clip_count: 2,
            target_duration: Some(40.0),
        };
        let w = windows(&generate_auto_cut_actions(&[], 30.0, &options));
        assert_eq!(w[1], (15.0, 30.0));
    }

    #[test]
    fn test_values_rounded_to_two_decimals() {
        let options = AutoCutOptions {
            clip_count: 3,
            ..Default::default()
        };
        let w = windows(&generate_auto_cut_actions(&[], 10.0, &options));
        assert_eq!(w[0], (0.0, 3.33));
        assert_eq!(w[1], (3.33, 6.67));
    }

    #[test]
    fn test_even_last_boundary_is_exact_duration() {
        let options = AutoCutOptions {
            clip_count: 2,
            ..Default::default()
        };
        let w = windows(&generate_auto_cut_actions(&[], 12.3456, &options));
        assert_eq!(w[0].1, 6.17);
        assert_eq!(w[1], (6.17, 12.3456));
    }

    #[test]
    fn test_clip_count_clamped() {
        let many = AutoCutOptions {
            clip_count: 500,
            ..Default::default()
        };
        assert_eq!(windows(&generate_auto_cut_actions(&[], 60.0, &many)).len(), 20);

        let none = AutoCutOptions {
            clip_count: -3,
            ..Default::default()
        };
        assert_eq!(
            windows(&generate_auto_cut_actions(&[], 60.0, &none)),
            vec![(0.0, 60.0)]
        );
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("even".parse(), Ok(AutoCutStrategy::Even));
        assert_eq!("proportional".parse(), Ok(AutoCutStrategy::Proportional));
        assert!("random".parse::<AutoCutStrategy>().is_err());
        assert_eq!(AutoCutStrategy::Proportional.as_str(), "proportional");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn added(actions: &[EditorAction]) -> Vec<(f64, f64)> {
        actions
            .iter()
            .filter_map(|a| match a {
                EditorAction::AddClip {
                    start: Some(s),
                    end: Some(e),
                    ..
                } => Some((*s, *e)),
                _ => None,
            })
            .collect()
    }

    proptest! {
        #[test]
        fn even_windows_tile_the_source(duration in 1.0f64..3600.0, count in 1i64..=20) {
            let options = AutoCutOptions { clip_count: count, ..Default::default() };
            let w = added(&generate_auto_cut_actions(&[], duration, &options));

            prop_assert_eq!(w.len() as i64, count);
            prop_assert_eq!(w[0].0, 0.0);
            prop_assert_eq!(w[w.len() - 1].1, duration);
            for (start, end) in &w {
                prop_assert!(end > start);
            }
            for pair in w.windows(2) {
                prop_assert_eq!(pair[0].1, pair[1].0);
            }
        }

        #[test]
        fn proportional_stays_inside_source(
            duration in 1.0f64..3600.0,
            count in 1i64..=20,
            target in proptest::option::of(0.1f64..7200.0),
        ) {
            let options = AutoCutOptions {
                strategy: AutoCutStrategy::Proportional,
                clip_count: count,
                target_duration: target,
            };
            let w = added(&generate_auto_cut_actions(&[], duration, &options));

            prop_assert_eq!(w.len() as i64, count);
            for (start, end) in &w {
                prop_assert!(*start >= 0.0);
                prop_assert!(*end <= duration);
                prop_assert!(end >= start);
            }
        }
    }
}
