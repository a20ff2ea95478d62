//! Cutline Timeline Store
//!
//! The single source of truth for a timeline:
//! - **Store:** Atomic clip, keyframe and preset operations with clamping
//! - **History:** Snapshot undo/redo with configurable depth
//! - **Batch:** Guard object collapsing many operations into one undo step
//! - **Subscriptions:** Callbacks fired with the new state after each change
//!
//! Stores are plain values; create one per editing session.

pub mod history;
pub mod store;

pub use history::{History, HistoryEntry};
pub use store::{Batch, SubscriptionId, TimelineStore};
