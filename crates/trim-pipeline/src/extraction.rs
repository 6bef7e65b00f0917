//! Per-segment extraction with skip-and-warn failure handling.

use std::path::{Path, PathBuf};

use trim_media::MediaBackend;
use trim_models::{Segment, SegmentList, SkippedSegment};

use crate::logging::RunLogger;
use crate::pipeline::SourceVideo;

/// A sub-clip written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct KeptClip {
    pub segment: Segment,
    pub path: PathBuf,
}

/// Result of one extraction attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipOutcome {
    Kept(KeptClip),
    Skipped { segment: Segment, reason: String },
}

/// Outcomes of every attempt of a run, in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSummary {
    pub kept: Vec<KeptClip>,
    pub skipped: Vec<SkippedSegment>,
}

impl ExtractionSummary {
    pub fn attempted(&self) -> usize {
        self.kept.len() + self.skipped.len()
    }

    pub fn clip_paths(&self) -> Vec<PathBuf> {
        self.kept.iter().map(|c| c.path.clone()).collect()
    }

    pub fn kept_segments(&self) -> Vec<Segment> {
        self.kept.iter().map(|c| c.segment).collect()
    }
}

impl FromIterator<ClipOutcome> for ExtractionSummary {
    fn from_iter<I: IntoIterator<Item = ClipOutcome>>(iter: I) -> Self {
        let mut summary = ExtractionSummary::default();
        for outcome in iter {
            match outcome {
                ClipOutcome::Kept(clip) => summary.kept.push(clip),
                ClipOutcome::Skipped { segment, reason } => {
                    summary.skipped.push(SkippedSegment { segment, reason })
                }
            }
        }
        summary
    }
}

/// File name of the `index`th intermediate clip.
pub fn clip_file_name(index: usize) -> String {
    format!("segment_{:02}.mp4", index)
}

/// Attempt one segment. Failures become [`ClipOutcome::Skipped`].
pub async fn extract_one(
    backend: &dyn MediaBackend,
    source: &SourceVideo,
    segment: Segment,
    output: PathBuf,
) -> ClipOutcome {
    if !segment.fits_within(source.duration) {
        return ClipOutcome::Skipped {
            segment,
            reason: format!(
                "segment {} lies outside the {:.3}s source",
                segment, source.duration
            ),
        };
    }

    match backend.extract_subclip(&source.path, &segment, &output).await {
        Ok(()) => ClipOutcome::Kept(KeptClip {
            segment,
            path: output,
        }),
        Err(e) => ClipOutcome::Skipped {
            segment,
            reason: e.detailed(),
        },
    }
}

/// Extract every segment in order into `scratch_dir`, one at a time.
pub async fn extract_all(
    backend: &dyn MediaBackend,
    source: &SourceVideo,
    segments: &SegmentList,
    scratch_dir: &Path,
    logger: &RunLogger,
) -> ExtractionSummary {
    let mut outcomes = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let output = scratch_dir.join(clip_file_name(index));
        let outcome = extract_one(backend, source, *segment, output).await;

        match &outcome {
            ClipOutcome::Kept(clip) => {
                logger.log_progress(&format!(
                    "extracted segment {}/{} ({})",
                    index + 1,
                    segments.len(),
                    clip.segment
                ));
            }
            ClipOutcome::Skipped { segment, reason } => {
                logger.log_warning(&format!("skipping segment {}: {}", segment, reason));
            }
        }
        outcomes.push(outcome);
    }

    outcomes.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64) -> Segment {
        Segment::new(start, end).unwrap()
    }

    #[test]
    fn test_fold_keeps_order() {
        let summary: ExtractionSummary = vec![
            ClipOutcome::Kept(KeptClip {
                segment: seg(0.0, 30.0),
                path: PathBuf::from("segment_00.mp4"),
            }),
            ClipOutcome::Skipped {
                segment: seg(30.0, 60.0),
                reason: "decode error".to_string(),
            },
            ClipOutcome::Kept(KeptClip {
                segment: seg(60.0, 90.0),
                path: PathBuf::from("segment_02.mp4"),
            }),
        ]
        .into_iter()
        .collect();

        assert_eq!(summary.attempted(), 3);
        assert_eq!(summary.kept_segments(), vec![seg(0.0, 30.0), seg(60.0, 90.0)]);
        assert_eq!(
            summary.clip_paths(),
            vec![PathBuf::from("segment_00.mp4"), PathBuf::from("segment_02.mp4")]
        );
        assert_eq!(summary.skipped[0].reason, "decode error");
    }

    #[test]
    fn test_clip_file_name() {
        assert_eq!(clip_file_name(0), "segment_00.mp4");
        assert_eq!(clip_file_name(2), "segment_02.mp4");
    }
}
