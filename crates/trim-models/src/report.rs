//! Summary run identifiers and results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::segment::Segment;
use crate::variant::SummaryVariant;

/// Unique identifier for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A segment whose extraction failed and was left out of the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSegment {
    pub segment: Segment,
    pub reason: String,
}

/// Result of a successful summary run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub run_id: RunId,
    pub variant: SummaryVariant,
    /// Source duration in seconds
    pub source_duration: f64,
    /// Segments present in the output, in playback order
    pub segments: Vec<Segment>,
    /// Segments that were selected but could not be extracted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedSegment>,
    /// Summed length of the kept segments in seconds
    pub output_duration: f64,
    /// Size of the written summary file
    pub output_bytes: u64,
    /// Location of the written summary file
    pub output_path: PathBuf,
}

impl SummaryReport {
    /// File name offered to the user on download.
    pub fn download_name(&self) -> &'static str {
        self.variant.download_name()
    }
}
