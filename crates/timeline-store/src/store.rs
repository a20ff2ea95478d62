//! The timeline store: single owner of the timeline aggregate.
//!
//! Every mutation goes through a method here so that undo history and
//! subscriber notifications stay consistent. Operations never fail loudly:
//! an unknown id or index is a no-op reported through the return value, and
//! out-of-range numbers are clamped.

use std::ops::{Deref, DerefMut};

use cutline_common::EditorConfig;
use cutline_project_model::{
    find_preset, new_id, AnimatableProperty, ClipPatch, Easing, HistorySnapshot, Keyframe,
    Timeline, TimelineClip, MIN_CLIP_LENGTH,
};

use crate::history::History;

/// Handle returned by [`TimelineStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Timeline)>;

/// Observable, undoable container for one timeline.
pub struct TimelineStore {
    timeline: Timeline,
    history: History,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl std::fmt::Debug for TimelineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineStore")
            .field("timeline", &self.timeline)
            .field("history", &self.history)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TimelineStore {
    /// Create an empty store for a source of the given duration.
    pub fn new(video_duration: f64) -> Self {
        Self::with_config(video_duration, &EditorConfig::default())
    }

    pub fn with_config(video_duration: f64, config: &EditorConfig) -> Self {
        let mut timeline = Timeline::new(video_duration);
        if find_preset(&config.default_preset_id).is_some() {
            timeline.selected_preset_id = config.default_preset_id.clone();
        }
        Self {
            timeline,
            history: History::new(config.history_limit),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Adopt a previously persisted timeline. Clips are re-normalized; the
    /// history starts empty.
    pub fn from_timeline(mut timeline: Timeline, config: &EditorConfig) -> Self {
        let duration = timeline.video_duration;
        for clip in &mut timeline.clips {
            clip.normalize(duration);
        }
        if timeline.selected_clip().is_none() {
            timeline.selected_clip_id = None;
        }
        Self {
            timeline,
            history: History::new(config.history_limit),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Read-only view of the current state.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Consume the store, keeping only the timeline (for persistence).
    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    pub fn clips(&self) -> &[TimelineClip] {
        &self.timeline.clips
    }

    pub fn clip(&self, id: &str) -> Option<&TimelineClip> {
        self.timeline.clip(id)
    }

    pub fn video_duration(&self) -> f64 {
        self.timeline.video_duration
    }

    // ── Subscriptions ────────────────────────────────────────────────────

    /// Register a callback invoked with the new state after every change.
    pub fn subscribe(&mut self, callback: impl FnMut(&Timeline) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.timeline);
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Start over for a newly loaded source video. Clears clips, view state
    /// and history.
    pub fn reset(&mut self, video_duration: f64) {
        let preset = self.timeline.selected_preset_id.clone();
        self.timeline = Timeline::new(video_duration);
        self.timeline.selected_preset_id = preset;
        self.history.clear();
        tracing::debug!(video_duration, "Timeline reset");
        self.notify();
    }

    /// Capture the undo-tracked state.
    pub fn snapshot(&self) -> HistorySnapshot {
        self.timeline.snapshot()
    }

    /// Replace the undo-tracked state with `snapshot`, as one undoable step.
    pub fn restore(&mut self, snapshot: HistorySnapshot) {
        self.mutate("restore", |t| {
            let duration = t.video_duration;
            t.apply_snapshot(snapshot);
            for clip in &mut t.clips {
                clip.normalize(duration);
            }
            Some(())
        });
    }

    /// Run `op` against the timeline, recording history and notifying
    /// subscribers when it succeeds. `op` must leave the timeline untouched
    /// when it returns `None`.
    fn mutate<R>(&mut self, label: &str, op: impl FnOnce(&mut Timeline) -> Option<R>) -> Option<R> {
        let before = (!self.history.is_batching()).then(|| self.timeline.snapshot());

        let Some(result) = op(&mut self.timeline) else {
            tracing::warn!(op = label, "Ignored: invalid reference");
            return None;
        };

        if let Some(before) = before {
            if self.differs_from(&before) {
                self.history.push(label, before);
            }
        }
        tracing::debug!(op = label, clips = self.timeline.clips.len(), "Timeline updated");
        self.notify();
        Some(result)
    }

    fn differs_from(&self, snapshot: &HistorySnapshot) -> bool {
        self.timeline.clips != snapshot.clips
            || self.timeline.selected_preset_id != snapshot.selected_preset_id
    }

    // ── Clip operations ──────────────────────────────────────────────────

    /// Append a clip to the end of the edit. The clip is clamped into the
    /// source; an empty or colliding id is replaced with a fresh one.
    pub fn add_clip(&mut self, mut clip: TimelineClip) -> String {
        if clip.id.is_empty() || self.timeline.clip(&clip.id).is_some() {
            clip.id = new_id();
        }
        let id = clip.id.clone();
        self.mutate("add clip", |t| {
            clip.normalize(t.video_duration);
            t.clips.push(clip);
            Some(())
        });
        id
    }

    /// Merge `patch` into a clip, then re-clamp every invariant.
    ///
    /// Moving the window start keeps keyframes at their source time.
    pub fn update_clip(&mut self, id: &str, patch: &ClipPatch) -> bool {
        self.mutate("update clip", |t| {
            let duration = t.video_duration;
            let clip = t.clips.iter_mut().find(|c| c.id == id)?;
            let old_start = clip.start;
            let keyframes = std::mem::take(&mut clip.keyframes);
            patch.apply_to(clip);
            clip.normalize(duration);
            clip.keyframes = keyframes;
            clip.rebase_keyframes(clip.start - old_start);
            clip.normalize(duration);
            Some(())
        })
        .is_some()
    }

    /// Move one or both window edges. A missing edge keeps its current
    /// value; the start is bounded by the (new) end and vice versa.
    pub fn trim_clip(&mut self, id: &str, start: Option<f64>, end: Option<f64>) -> bool {
        self.mutate("trim clip", |t| {
            let duration = t.video_duration;
            let clip = t.clips.iter_mut().find(|c| c.id == id)?;
            let max_end = if duration > 0.0 { duration } else { f64::INFINITY };

            let end = end
                .filter(|v| v.is_finite())
                .unwrap_or(clip.end)
                .clamp(MIN_CLIP_LENGTH.min(max_end), max_end);
            let start = start
                .filter(|v| v.is_finite())
                .unwrap_or(clip.start)
                .clamp(0.0, (end - MIN_CLIP_LENGTH).max(0.0));
            let end = end.max(start + MIN_CLIP_LENGTH).min(max_end);

            let delta = start - clip.start;
            clip.start = start;
            clip.end = end;
            clip.rebase_keyframes(delta);
            clip.normalize(duration);
            Some(())
        })
        .is_some()
    }

    /// Delete a clip and its keyframes. Clears the selection if it pointed
    /// at the clip.
    pub fn remove_clip(&mut self, id: &str) -> bool {
        self.mutate("remove clip", |t| {
            let index = t.clip_index(id)?;
            t.clips.remove(index);
            if t.selected_clip_id.as_deref() == Some(id) {
                t.selected_clip_id = None;
            }
            Some(())
        })
        .is_some()
    }

    /// Copy a clip (keyframes included, with fresh ids) right after the
    /// original and select the copy.
    pub fn duplicate_clip(&mut self, id: &str) -> Option<String> {
        self.mutate("duplicate clip", |t| {
            let index = t.clip_index(id)?;
            let mut copy = t.clips[index].clone();
            copy.id = new_id();
            for keyframe in &mut copy.keyframes {
                keyframe.id = new_id();
            }
            let copy_id = copy.id.clone();
            t.clips.insert(index + 1, copy);
            t.selected_clip_id = Some(copy_id.clone());
            Some(copy_id)
        })
    }

    /// Cut a clip in two at source time `at`.
    ///
    /// `at` is clamped so both halves keep the minimum length. The left half
    /// keeps the original id; the right half gets a fresh one. Keyframes
    /// before the cut stay left, keyframes at or after it move right with
    /// their time rebased. Clips too short to halve are left alone.
    pub fn split_clip(&mut self, id: &str, at: f64) -> Option<(String, String)> {
        if !at.is_finite() {
            tracing::warn!(clip_id = id, "Split point is not a number");
            return None;
        }
        self.mutate("split clip", |t| {
            let index = t.clip_index(id)?;
            let original = &t.clips[index];
            let lo = original.start + MIN_CLIP_LENGTH;
            let hi = original.end - MIN_CLIP_LENGTH;
            if lo > hi {
                return None;
            }

            let at = at.clamp(lo, hi);
            let local_cut = at - original.start;

            let mut left = original.clone();
            let mut right = original.clone();
            right.id = new_id();
            right.name = format!("{} (2)", original.name);

            left.end = at;
            left.keyframes.retain(|k| k.time < local_cut);

            right.start = at;
            right.keyframes.retain(|k| k.time >= local_cut);
            right.rebase_keyframes(local_cut);

            let ids = (left.id.clone(), right.id.clone());
            t.clips[index] = left;
            t.clips.insert(index + 1, right);
            Some(ids)
        })
    }

    /// Move the clip at `from` so it ends up at index `to`.
    pub fn reorder_clips(&mut self, from: usize, to: usize) -> bool {
        self.mutate("reorder clips", |t| {
            let len = t.clips.len();
            if from >= len || to >= len {
                return None;
            }
            let clip = t.clips.remove(from);
            t.clips.insert(to, clip);
            Some(())
        })
        .is_some()
    }

    // ── Keyframes ────────────────────────────────────────────────────────

    /// Add a keyframe at clip-local `time`. Time and value are clamped into
    /// the clip window and the property's domain.
    pub fn add_keyframe(
        &mut self,
        clip_id: &str,
        property: AnimatableProperty,
        time: f64,
        value: f64,
        easing: Easing,
    ) -> Option<String> {
        if !time.is_finite() || !value.is_finite() {
            tracing::warn!(clip_id, "Keyframe time/value is not a number");
            return None;
        }
        self.mutate("add keyframe", |t| {
            let clip = t.clips.iter_mut().find(|c| c.id == clip_id)?;
            let keyframe = Keyframe::new(
                property,
                time.clamp(0.0, clip.duration().max(0.0)),
                property.clamp_value(value),
                easing,
            );
            let id = keyframe.id.clone();
            clip.keyframes.push(keyframe);
            cutline_project_model::sort_keyframes(&mut clip.keyframes);
            Some(id)
        })
    }

    pub fn remove_keyframe(&mut self, clip_id: &str, keyframe_id: &str) -> bool {
        self.mutate("remove keyframe", |t| {
            let clip = t.clips.iter_mut().find(|c| c.id == clip_id)?;
            let index = clip.keyframes.iter().position(|k| k.id == keyframe_id)?;
            clip.keyframes.remove(index);
            Some(())
        })
        .is_some()
    }

    // ── Presets ──────────────────────────────────────────────────────────

    /// Bulk-assign a preset's framing onto one clip.
    pub fn apply_preset_to_clip(&mut self, clip_id: &str, preset_id: &str) -> bool {
        self.mutate("apply preset", |t| {
            let preset = find_preset(preset_id)?;
            let duration = t.video_duration;
            let clip = t.clips.iter_mut().find(|c| c.id == clip_id)?;
            clip.apply_preset(preset);
            clip.normalize(duration);
            Some(())
        })
        .is_some()
    }

    /// Choose the preset given to newly added clips.
    pub fn set_selected_preset_id(&mut self, preset_id: &str) -> bool {
        self.mutate("select preset", |t| {
            let preset = find_preset(preset_id)?;
            t.selected_preset_id = preset.id.to_string();
            Some(())
        })
        .is_some()
    }

    // ── View state (not undo-tracked) ────────────────────────────────────

    /// Select a clip, or clear the selection with `None`.
    pub fn select_clip(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.timeline.clip(id).is_none() => {
                tracing::warn!(clip_id = id, "Cannot select unknown clip");
                false
            }
            _ => {
                self.timeline.selected_clip_id = id.map(str::to_string);
                self.notify();
                true
            }
        }
    }

    pub fn set_loop_selected_clip(&mut self, value: bool) {
        self.timeline.loop_selected_clip = value;
        self.notify();
    }

    /// Move the playhead, clamped to the edited timeline's length.
    pub fn set_current_time(&mut self, time: f64) -> bool {
        if !time.is_finite() {
            return false;
        }
        self.timeline.current_time = time.clamp(0.0, self.timeline.total_duration());
        self.notify();
        true
    }

    // ── History ──────────────────────────────────────────────────────────

    /// Step back one history entry. An open batch is committed first and
    /// reopened afterwards.
    pub fn undo(&mut self) -> bool {
        let current = self.timeline.snapshot();
        let open_batch = self.history.suspend_batch(&current);
        let restored = self.history.undo(current);
        self.finish_cursor_move(restored, open_batch)
    }

    /// Re-apply the most recently undone entry.
    pub fn redo(&mut self) -> bool {
        let current = self.timeline.snapshot();
        let open_batch = self.history.suspend_batch(&current);
        let restored = self.history.redo(current);
        self.finish_cursor_move(restored, open_batch)
    }

    fn finish_cursor_move(
        &mut self,
        restored: Option<HistorySnapshot>,
        open_batch: Option<String>,
    ) -> bool {
        let moved = restored.is_some();
        if let Some(snapshot) = restored {
            self.timeline.apply_snapshot(snapshot);
        }
        if let Some(label) = open_batch {
            self.history.start_batch(&label, self.timeline.snapshot());
        }
        if moved {
            self.notify();
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_count()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn is_batching(&self) -> bool {
        self.history.is_batching()
    }

    /// Open a batch: every change made through the returned guard collapses
    /// into one undo entry when the guard is committed or dropped.
    ///
    /// Opening a batch while one is already open yields a guard that does
    /// not own it; the outer batch decides when the entry is written.
    pub fn begin_batch(&mut self, label: &str) -> Batch<'_> {
        let snapshot = self.timeline.snapshot();
        let owns = self.history.start_batch(label, snapshot);
        Batch {
            store: self,
            owns,
            closed: false,
        }
    }

    fn end_batch(&mut self) -> bool {
        let current = self.timeline.snapshot();
        self.history.end_batch(&current)
    }
}

/// An open undo transaction on a [`TimelineStore`].
///
/// Dereferences to the store, so every store operation is available on
/// the guard. The batch closes exactly once: on [`Batch::commit`] or when
/// the guard is dropped.
pub struct Batch<'a> {
    store: &'a mut TimelineStore,
    owns: bool,
    closed: bool,
}

impl Batch<'_> {
    /// Close the batch. Returns whether an undo entry was written.
    pub fn commit(mut self) -> bool {
        self.close()
    }

    fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.owns && self.store.end_batch()
    }
}

impl Deref for Batch<'_> {
    type Target = TimelineStore;

    fn deref(&self) -> &TimelineStore {
        &*self.store
    }
}

impl DerefMut for Batch<'_> {
    fn deref_mut(&mut self) -> &mut TimelineStore {
        &mut *self.store
    }
}

impl Drop for Batch<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn clip(id: &str, start: f64, end: f64) -> TimelineClip {
        let mut clip = TimelineClip::scene(1, start, end);
        clip.id = id.to_string();
        clip
    }

    fn store_with(clips: &[(&str, f64, f64)]) -> TimelineStore {
        let mut store = TimelineStore::new(30.0);
        for (id, start, end) in clips {
            store.add_clip(clip(id, *start, *end));
        }
        store
    }

    #[test]
    fn test_add_clip_clamps_and_keeps_id() {
        let mut store = TimelineStore::new(30.0);
        let id = store.add_clip(clip("c1", 25.0, 40.0));
        assert_eq!(id, "c1");
        assert_eq!(store.clip("c1").unwrap().end, 30.0);
    }

    #[test]
    fn test_add_clip_replaces_colliding_id() {
        let mut store = store_with(&[("c1", 0.0, 5.0)]);
        let id = store.add_clip(clip("c1", 5.0, 10.0));
        assert_ne!(id, "c1");
        assert_eq!(store.clips().len(), 2);
    }

    #[test]
    fn test_update_clip_reclamps() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        let patch = ClipPatch {
            speed: Some(10.0),
            zoom: Some(0.5),
            crop_x: Some(90.0),
            crop_width: Some(50.0),
            ..Default::default()
        };
        assert!(store.update_clip("c1", &patch));
        let c = store.clip("c1").unwrap();
        assert_eq!(c.speed, 3.0);
        assert_eq!(c.zoom, 1.0);
        assert_eq!(c.crop_x, 90.0);
        assert!((c.crop_width - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        let before = store.timeline().clone();
        let depth = store.undo_depth();

        assert!(!store.update_clip("ghost", &ClipPatch::default()));
        assert!(!store.trim_clip("ghost", Some(1.0), None));
        assert!(!store.remove_clip("ghost"));
        assert!(store.duplicate_clip("ghost").is_none());
        assert!(store.split_clip("ghost", 5.0).is_none());
        assert!(!store.remove_keyframe("c1", "ghost"));
        assert!(!store.apply_preset_to_clip("c1", "fisheye"));
        assert!(!store.reorder_clips(0, 3));
        assert!(!store.select_clip(Some("ghost")));

        assert_eq!(store.timeline(), &before);
        assert_eq!(store.undo_depth(), depth);
    }

    #[test]
    fn test_trim_reuses_missing_edge() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        assert!(store.trim_clip("c1", Some(2.0), None));
        let c = store.clip("c1").unwrap();
        assert_eq!((c.start, c.end), (2.0, 10.0));
    }

    #[test]
    fn test_trim_enforces_min_length() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        store.trim_clip("c1", Some(9.95), None);
        let c = store.clip("c1").unwrap();
        assert!((c.start - 9.8).abs() < 1e-9);
        assert_eq!(c.end, 10.0);

        store.trim_clip("c1", None, Some(1.0));
        let c = store.clip("c1").unwrap();
        assert!(c.duration() >= MIN_CLIP_LENGTH - 1e-9);
        assert!(c.start >= 0.0);
    }

    #[test]
    fn test_trim_keeps_keyframes_at_source_time() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        store.add_keyframe("c1", AnimatableProperty::Zoom, 6.0, 2.0, Easing::Linear);
        store.trim_clip("c1", Some(2.0), None);
        let c = store.clip("c1").unwrap();
        assert!((c.keyframes[0].time - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_clip_clears_selection() {
        let mut store = store_with(&[("c1", 0.0, 10.0), ("c2", 10.0, 20.0)]);
        store.select_clip(Some("c1"));
        assert!(store.remove_clip("c1"));
        assert!(store.timeline().selected_clip_id.is_none());
        assert_eq!(store.clips().len(), 1);
    }

    #[test]
    fn test_duplicate_remaps_keyframes_and_selects_copy() {
        let mut store = store_with(&[("c1", 0.0, 10.0), ("c2", 10.0, 20.0)]);
        let kf = store
            .add_keyframe("c1", AnimatableProperty::Opacity, 1.0, 0.5, Easing::EaseIn)
            .unwrap();

        let copy_id = store.duplicate_clip("c1").unwrap();
        let clips = store.clips();
        assert_eq!(clips.len(), 3);
        assert_eq!(clips[1].id, copy_id);
        assert_eq!(clips[1].name, clips[0].name);
        assert_eq!(clips[1].keyframes.len(), 1);
        assert_ne!(clips[1].keyframes[0].id, kf);
        assert_eq!(clips[1].keyframes[0].value, 0.5);
        assert_eq!(store.timeline().selected_clip_id.as_deref(), Some(copy_id.as_str()));
    }

    #[test]
    fn test_split_partitions_window() {
        let mut store = store_with(&[("c1", 2.0, 12.0)]);
        let (left, right) = store.split_clip("c1", 5.0).unwrap();
        assert_eq!(left, "c1");
        let l = store.clip(&left).unwrap();
        let r = store.clip(&right).unwrap();
        assert_eq!((l.start, l.end), (2.0, 5.0));
        assert_eq!((r.start, r.end), (5.0, 12.0));
        assert_eq!(store.clips()[1].id, right);
    }

    #[test]
    fn test_split_point_is_clamped() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        let (left, right) = store.split_clip("c1", 9.99).unwrap();
        let l = store.clip(&left).unwrap();
        let r = store.clip(&right).unwrap();
        assert!((l.end - 9.8).abs() < 1e-9);
        assert_eq!(l.end, r.start);
        assert!(r.duration() >= MIN_CLIP_LENGTH - 1e-9);
    }

    #[test]
    fn test_split_too_short_clip_is_noop() {
        let mut store = store_with(&[("c1", 0.0, 0.3)]);
        assert!(store.split_clip("c1", 0.15).is_none());
        assert_eq!(store.clips().len(), 1);
    }

    #[test]
    fn test_split_at_twice_minimum_length_does_not_panic() {
        // 0.1 + 0.2 rounds above 0.5 - 0.2, so no cut point fits.
        let mut store = store_with(&[("c1", 0.1, 0.5)]);
        let before = store.snapshot();
        assert!(store.split_clip("c1", 0.3).is_none());
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.undo_depth(), 1);

        let mut store = store_with(&[("c1", 0.0, 0.4)]);
        let (left, right) = store.split_clip("c1", 0.3).unwrap();
        assert_eq!(store.clip(&left).unwrap().end, 0.2);
        assert_eq!(store.clip(&right).unwrap().start, 0.2);
    }

    #[test]
    fn test_split_keyframe_policy() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        store.add_keyframe("c1", AnimatableProperty::Zoom, 1.0, 1.5, Easing::Linear);
        store.add_keyframe("c1", AnimatableProperty::Zoom, 4.0, 2.0, Easing::Linear);
        store.add_keyframe("c1", AnimatableProperty::Zoom, 7.0, 2.5, Easing::Linear);

        let (left, right) = store.split_clip("c1", 4.0).unwrap();
        let l = store.clip(&left).unwrap();
        let r = store.clip(&right).unwrap();

        // Strictly before the cut stays left; at-or-after moves right, rebased.
        assert_eq!(l.keyframes.len(), 1);
        assert_eq!(l.keyframes[0].time, 1.0);
        assert_eq!(r.keyframes.len(), 2);
        assert_eq!(r.keyframes[0].time, 0.0);
        assert_eq!(r.keyframes[0].value, 2.0);
        assert!((r.keyframes[1].time - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_reorder_clips() {
        let mut store = store_with(&[("a", 0.0, 1.0), ("b", 1.0, 2.0), ("c", 2.0, 3.0)]);
        assert!(store.reorder_clips(0, 2));
        let order: Vec<_> = store.clips().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn test_keyframe_values_clamped() {
        let mut store = store_with(&[("c1", 0.0, 4.0)]);
        store.add_keyframe("c1", AnimatableProperty::Opacity, 10.0, 7.0, Easing::Hold);
        let kf = &store.clip("c1").unwrap().keyframes[0];
        assert_eq!(kf.time, 4.0);
        assert_eq!(kf.value, 1.0);
        assert!(store
            .add_keyframe("c1", AnimatableProperty::Zoom, f64::NAN, 1.0, Easing::Linear)
            .is_none());
    }

    #[test]
    fn test_keyframes_stay_time_sorted() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        store.add_keyframe("c1", AnimatableProperty::PanX, 5.0, 10.0, Easing::Linear);
        store.add_keyframe("c1", AnimatableProperty::PanX, 2.0, 20.0, Easing::Linear);
        let times: Vec<f64> = store.clip("c1").unwrap().keyframes.iter().map(|k| k.time).collect();
        assert_eq!(times, [2.0, 5.0]);
    }

    #[test]
    fn test_remove_keyframe() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        let kf = store
            .add_keyframe("c1", AnimatableProperty::Rotate, 1.0, 45.0, Easing::Linear)
            .unwrap();
        assert!(store.remove_keyframe("c1", &kf));
        assert!(store.clip("c1").unwrap().keyframes.is_empty());
    }

    #[test]
    fn test_apply_preset_to_clip() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        assert!(store.apply_preset_to_clip("c1", "cinematic"));
        let c = store.clip("c1").unwrap();
        assert_eq!(c.preset_id, "cinematic");
        assert!((c.crop_y - 12.8).abs() < 1e-9);
    }

    #[test]
    fn test_selected_preset_rejects_unknown() {
        let mut store = TimelineStore::new(30.0);
        assert!(store.set_selected_preset_id("dramatic"));
        assert!(!store.set_selected_preset_id("fisheye"));
        assert_eq!(store.timeline().selected_preset_id, "dramatic");
    }

    #[test]
    fn test_undo_redo_single_operation() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        store.set_clip_speed_for_test("c1", 2.0);
        assert_eq!(store.clip("c1").unwrap().speed, 2.0);

        assert!(store.undo());
        assert_eq!(store.clip("c1").unwrap().speed, 1.0);
        assert!(store.redo());
        assert_eq!(store.clip("c1").unwrap().speed, 2.0);
        assert!(!store.redo());
    }

    #[test]
    fn test_batch_collapses_to_one_undo_step() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        let before = store.snapshot();
        let depth = store.undo_depth();

        {
            let mut batch = store.begin_batch("agent edit");
            batch.trim_clip("c1", Some(1.0), None);
            batch.add_clip(clip("c2", 10.0, 20.0));
            batch.apply_preset_to_clip("c2", "square");
            assert!(batch.commit());
        }

        assert_eq!(store.undo_depth(), depth + 1);
        assert_eq!(store.undo_label(), Some("agent edit"));
        assert!(store.undo());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_batch_closes_on_drop() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        {
            let mut batch = store.begin_batch("dropped");
            batch.remove_clip("c1");
        }
        assert!(!store.is_batching());
        assert_eq!(store.undo_label(), Some("dropped"));
    }

    #[test]
    fn test_nested_batch_defers_to_outer() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        let depth = store.undo_depth();
        {
            let mut outer = store.begin_batch("outer");
            {
                let mut inner = outer.begin_batch("inner");
                inner.remove_clip("c1");
                assert!(!inner.commit());
            }
            assert!(outer.is_batching());
        }
        assert_eq!(store.undo_depth(), depth + 1);
        assert_eq!(store.undo_label(), Some("outer"));
    }

    #[test]
    fn test_undo_inside_batch_flushes_pending_changes() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        {
            let mut batch = store.begin_batch("edit");
            batch.trim_clip("c1", Some(3.0), None);
            assert!(batch.undo());
            assert_eq!(batch.clip("c1").unwrap().start, 0.0);
            assert!(batch.is_batching());
        }
        assert!(store.can_redo());
        assert!(store.redo());
        assert_eq!(store.clip("c1").unwrap().start, 3.0);
    }

    #[test]
    fn test_view_state_not_undo_tracked() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        let depth = store.undo_depth();
        store.select_clip(Some("c1"));
        store.set_loop_selected_clip(true);
        store.set_current_time(4.0);
        assert_eq!(store.undo_depth(), depth);
        assert!(store.timeline().loop_selected_clip);
        assert_eq!(store.timeline().current_time, 4.0);
    }

    #[test]
    fn test_playhead_clamped_to_edit_length() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        store.set_current_time(99.0);
        assert_eq!(store.timeline().current_time, 10.0);
        assert!(!store.set_current_time(f64::NAN));
    }

    #[test]
    fn test_reset_clears_history() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        assert!(store.can_undo());
        store.reset(60.0);
        assert!(store.clips().is_empty());
        assert!(!store.can_undo());
        assert_eq!(store.video_duration(), 60.0);
    }

    #[test]
    fn test_restore_is_undoable() {
        let mut store = store_with(&[("c1", 0.0, 10.0)]);
        let saved = store.snapshot();
        store.remove_clip("c1");
        store.restore(saved.clone());
        assert_eq!(store.snapshot(), saved);
        store.undo();
        assert!(store.clips().is_empty());
    }

    #[test]
    fn test_subscribers_notified() {
        let mut store = TimelineStore::new(30.0);
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let id = store.subscribe(move |_| seen.set(seen.get() + 1));

        store.add_clip(clip("c1", 0.0, 5.0));
        store.remove_clip("ghost");
        store.undo();
        assert_eq!(calls.get(), 2);

        assert!(store.unsubscribe(id));
        store.redo();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = EditorConfig {
            history_limit: 2,
            ..Default::default()
        };
        let mut store = TimelineStore::with_config(30.0, &config);
        for i in 0..5 {
            store.add_clip(clip(&format!("c{i}"), 0.0, 1.0));
        }
        assert_eq!(store.undo_depth(), 2);
    }

    #[test]
    fn test_from_timeline_normalizes() {
        let mut timeline = Timeline::new(30.0);
        let mut bad = clip("c1", 0.0, 50.0);
        bad.zoom = 9.0;
        timeline.clips.push(bad);
        timeline.selected_clip_id = Some("ghost".to_string());

        let store = TimelineStore::from_timeline(timeline, &EditorConfig::default());
        assert!(store.timeline().violations().is_empty());
    }

    impl TimelineStore {
        fn set_clip_speed_for_test(&mut self, id: &str, speed: f64) {
            let patch = ClipPatch {
                speed: Some(speed),
                ..Default::default()
            };
            self.update_clip(id, &patch);
        }
    }
}
