//! Time ranges selected from a source video.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::timestamp::format_seconds;

/// Maximum number of segments a summary is built from.
pub const MAX_SEGMENTS: usize = 3;

/// Errors raised when constructing time ranges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    #[error("Start time must not be negative (got {0})")]
    NegativeStart(f64),

    #[error("Start ({start}) must be before end ({end})")]
    StartNotBeforeEnd { start: f64, end: f64 },

    #[error("Time value is not finite")]
    NotFinite,
}

fn check_range(start: f64, end: f64) -> Result<(), SegmentError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(SegmentError::NotFinite);
    }
    if start < 0.0 {
        return Err(SegmentError::NegativeStart(start));
    }
    if start >= end {
        return Err(SegmentError::StartNotBeforeEnd { start, end });
    }
    Ok(())
}

/// A range of source video to retain, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds (inclusive)
    pub start: f64,
    /// End time in seconds (exclusive)
    pub end: f64,
}

impl Segment {
    /// Create a segment, validating `0 <= start < end`.
    pub fn new(start: f64, end: f64) -> Result<Self, SegmentError> {
        check_range(start, end)?;
        Ok(Self { start, end })
    }

    /// Length of the segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the segment lies entirely inside `[0, total]`.
    pub fn fits_within(&self, total: f64) -> bool {
        self.start >= 0.0 && self.end <= total
    }

    /// Whether two segments share any time.
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_seconds(self.start), format_seconds(self.end))
    }
}

impl From<SceneBoundary> for Segment {
    fn from(scene: SceneBoundary) -> Self {
        Self {
            start: scene.start,
            end: scene.end,
        }
    }
}

/// One continuous shot reported by the scene-boundary detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBoundary {
    /// Shot start in seconds
    pub start: f64,
    /// Shot end in seconds
    pub end: f64,
}

impl SceneBoundary {
    /// Create a boundary, validating `0 <= start < end`.
    pub fn new(start: f64, end: f64) -> Result<Self, SegmentError> {
        check_range(start, end)?;
        Ok(Self { start, end })
    }

    /// Shot length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Ordered list of at most [`MAX_SEGMENTS`] segments.
///
/// Order is significant: it is the order the clips appear in the summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentList(Vec<Segment>);

impl SegmentList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(Vec::with_capacity(MAX_SEGMENTS))
    }

    /// Append a segment. Returns `false` (and drops the segment) once the
    /// list already holds [`MAX_SEGMENTS`] entries.
    pub fn push(&mut self, segment: Segment) -> bool {
        if self.0.len() >= MAX_SEGMENTS {
            return false;
        }
        self.0.push(segment);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.0
    }

    /// Sum of all segment lengths in seconds.
    pub fn total_duration(&self) -> f64 {
        self.0.iter().map(Segment::duration).sum()
    }
}

impl FromIterator<Segment> for SegmentList {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        let mut list = SegmentList::new();
        for segment in iter {
            if !list.push(segment) {
                break;
            }
        }
        list
    }
}

impl<'a> IntoIterator for &'a SegmentList {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<SegmentList> for Vec<Segment> {
    fn from(list: SegmentList) -> Self {
        list.0
    }
}
