//! Cutline Action Executor
//!
//! Applies lists of [`EditorAction`](cutline_project_model::EditorAction)s
//! submitted by the UI or an automated agent to a
//! [`TimelineStore`](cutline_timeline_store::TimelineStore):
//! - One store batch per list, so one undo step per list
//! - Per-action outcome buckets: executed, skipped, errors
//! - `auto_cut` expands into generated sub-actions inside the same batch
//! - `export_video` hands the timeline to an optional export hook

pub mod executor;

pub use executor::{execute_actions, ActionExecutor, DispatchError, ExecutionReport, ExportHook};
