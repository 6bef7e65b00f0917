//! Segment selectors, one per summary variant.

pub mod interval;
pub mod scene;

pub use interval::select_interval_segments;
pub use scene::{select_scene_segments, InsufficientScenes, MIN_SCENES};
