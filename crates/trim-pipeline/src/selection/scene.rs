//! Longest-shot segment selection.

use thiserror::Error;
use trim_models::{SceneBoundary, Segment, SegmentList, MAX_SEGMENTS};

/// Fewer detected shots than this cannot make a scene summary.
pub const MIN_SCENES: usize = MAX_SEGMENTS;

/// The detector found too few shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient distinct scenes: {found} found, {required} required")]
pub struct InsufficientScenes {
    pub found: usize,
    pub required: usize,
}

/// Pick the three longest shots, longest first.
///
/// Shots of equal length keep the order the detector reported them in.
pub fn select_scene_segments(boundaries: &[SceneBoundary]) -> Result<SegmentList, InsufficientScenes> {
    if boundaries.len() < MIN_SCENES {
        return Err(InsufficientScenes {
            found: boundaries.len(),
            required: MIN_SCENES,
        });
    }

    let mut ranked = boundaries.to_vec();
    // sort_by is stable
    ranked.sort_by(|a, b| b.duration().total_cmp(&a.duration()));

    Ok(ranked.into_iter().map(Segment::from).collect())
}
