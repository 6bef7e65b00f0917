//! Fixed-interval segment selection.
//!
//! Short videos are cut into back-to-back pieces of a third of their length
//! (at least ten seconds). Longer videos get three one-minute segments with
//! equal gaps around them.

use trim_models::{Segment, SegmentList, MAX_SEGMENTS};

/// Videos shorter than this use the back-to-back layout.
pub const SHORT_VIDEO_SECS: u64 = 180;
/// Minimum segment length for short videos.
pub const SHORT_MIN_SEGMENT_SECS: u64 = 10;
/// Segment length for long videos.
pub const LONG_SEGMENT_SECS: u64 = 60;

/// Pick up to three segments from a video of `duration` seconds.
///
/// The duration is truncated to whole seconds first, so every offset is a
/// whole second. An empty list means no segment fits.
pub fn select_interval_segments(duration: f64) -> SegmentList {
    let total = whole_seconds(duration);
    if total == 0 {
        return SegmentList::new();
    }

    if total < SHORT_VIDEO_SECS {
        short_video_segments(total)
    } else {
        long_video_segments(total)
    }
}

fn whole_seconds(duration: f64) -> u64 {
    if duration.is_finite() && duration > 0.0 {
        duration.floor() as u64
    } else {
        0
    }
}

fn segment(start: u64, end: u64) -> Option<Segment> {
    Segment::new(start as f64, end as f64).ok()
}

fn short_video_segments(total: u64) -> SegmentList {
    // Clamped so a sub-ten-second video still yields one segment
    let length = (total / 3).max(SHORT_MIN_SEGMENT_SECS).min(total);
    let candidates = total / length;

    (0..candidates)
        .take(MAX_SEGMENTS)
        .filter_map(|i| {
            let start = i * length;
            segment(start, (start + length).min(total))
        })
        .collect()
}

fn long_video_segments(total: u64) -> SegmentList {
    let length = LONG_SEGMENT_SECS;
    let spacing = (total - length * 3) / 4;
    let starts = [spacing, spacing * 2 + length, spacing * 3 + length * 2];

    starts
        .into_iter()
        .filter(|start| start + length <= total)
        .filter_map(|start| segment(start, start + length))
        .collect()
}
