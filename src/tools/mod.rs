//! Interactive tools layered over the projection engine.
//!
//! Each tool is a plugin pairing a state resource with the Update systems
//! that drive it; `tool_manager` arbitrates which tool owns the pointer.

/// Ink strokes drawn on the near plane and pinned to a chosen anchor.
pub mod ink;
/// Terrain sculpting from silhouette gestures.
pub mod sculpt;
/// Exclusive tool activation and keyboard shortcuts.
pub mod tool_manager;
