//! Cutline Processing Core
//!
//! Pure computation over the timeline model:
//! - **Auto-Cut:** Generate a replacement cut list from the source duration
//! - **Keyframe Evaluation:** Resolve animated clip properties at a point in time
//!
//! No I/O and no store access. All inputs are data; all outputs are data.

pub mod auto_cut;
pub mod keyframe_eval;

pub use auto_cut::{generate_auto_cut_actions, AutoCutOptions, AutoCutStrategy};
pub use keyframe_eval::{
    evaluate_property, resolve_at, resolve_frame, CropRect, FrameTransform, ResolvedFrame,
};
