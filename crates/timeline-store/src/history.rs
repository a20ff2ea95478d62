//! Snapshot-based undo/redo history.
//!
//! - Undo/redo stacks of [`HistorySnapshot`]
//! - Batch grouping to collapse many related changes into one undo step
//! - Configurable maximum history depth
//!
//! The history never touches the timeline itself; the store hands it
//! snapshots and applies whatever comes back.

use cutline_project_model::HistorySnapshot;

/// A single entry in the undo/redo history.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    /// Human-readable label describing the change (e.g., "trim clip").
    pub label: String,
    /// State to restore when this entry is applied.
    pub snapshot: HistorySnapshot,
}

/// An open batch: the state before its first change.
#[derive(Clone, Debug)]
struct PendingBatch {
    label: String,
    before: HistorySnapshot,
}

/// Linear undo/redo history.
///
/// - Two stacks: undo (past states) and redo (states undone)
/// - Pushing a new entry clears the redo stack
/// - While a batch is open, individual pushes are suppressed; closing the
///   batch pushes one entry if anything changed
/// - Oldest entries are evicted past `max_entries`
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_entries: usize,
    batch: Option<PendingBatch>,
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
            batch: None,
        }
    }

    /// Record the state *before* a change.
    pub fn push(&mut self, label: &str, before: HistorySnapshot) {
        if self.batch.is_some() {
            tracing::trace!(label, "Push suppressed: batch in progress");
            return;
        }

        self.redo_stack.clear();
        self.undo_stack.push(HistoryEntry {
            label: label.to_string(),
            snapshot: before,
        });
        self.enforce_limit();

        tracing::debug!(
            label,
            undo_depth = self.undo_stack.len(),
            "History entry pushed"
        );
    }

    /// Step back. `current` is parked on the redo stack; the returned
    /// snapshot is the state to restore.
    pub fn undo(&mut self, current: HistorySnapshot) -> Option<HistorySnapshot> {
        let entry = self.undo_stack.pop()?;
        tracing::debug!(
            label = %entry.label,
            undo_remaining = self.undo_stack.len(),
            "Undo"
        );
        self.redo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: HistorySnapshot) -> Option<HistorySnapshot> {
        let entry = self.redo_stack.pop()?;
        tracing::debug!(
            label = %entry.label,
            redo_remaining = self.redo_stack.len(),
            "Redo"
        );
        self.undo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    /// Open a batch. Returns `false` (and changes nothing) when one is
    /// already open; the outer batch keeps ownership.
    pub fn start_batch(&mut self, label: &str, before: HistorySnapshot) -> bool {
        if self.batch.is_some() {
            tracing::debug!(label, "Nested batch folded into the open one");
            return false;
        }
        self.batch = Some(PendingBatch {
            label: label.to_string(),
            before,
        });
        tracing::debug!(label, "Batch started");
        true
    }

    /// Close the open batch. Pushes a single entry when `current` differs
    /// from the state the batch started from. Returns whether an entry was
    /// pushed.
    pub fn end_batch(&mut self, current: &HistorySnapshot) -> bool {
        let Some(batch) = self.batch.take() else {
            return false;
        };

        if batch.before == *current {
            tracing::debug!(label = %batch.label, "Batch ended without changes");
            return false;
        }

        self.push(&batch.label, batch.before);
        true
    }

    /// Close the open batch (committing its changes) and hand back its
    /// label so the caller can reopen it later.
    pub fn suspend_batch(&mut self, current: &HistorySnapshot) -> Option<String> {
        let label = self.batch.as_ref()?.label.clone();
        self.end_batch(current);
        Some(label)
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.label.as_str())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history, including any open batch.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch = None;
        tracing::debug!("History cleared");
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn set_max_entries(&mut self, max: usize) {
        self.max_entries = max.max(1);
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        if self.undo_stack.len() > self.max_entries {
            let excess = self.undo_stack.len() - self.max_entries;
            self.undo_stack.drain(..excess);
        }
    }
}
