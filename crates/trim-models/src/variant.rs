//! Summary pipeline variants and their fixed output names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MIME type of every summary output.
pub const SUMMARY_MIME_TYPE: &str = "video/mp4";

/// Which segment selector a summary run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryVariant {
    /// Fixed time-based spacing
    Interval,
    /// Three longest detected shots
    Scene,
}

impl SummaryVariant {
    pub const ALL: [SummaryVariant; 2] = [SummaryVariant::Interval, SummaryVariant::Scene];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryVariant::Interval => "interval",
            SummaryVariant::Scene => "scene",
        }
    }

    /// File name offered to the user on download.
    pub fn download_name(&self) -> &'static str {
        match self {
            SummaryVariant::Interval => "summary_clip.mp4",
            SummaryVariant::Scene => "scene_summary.mp4",
        }
    }

    /// File name of the output inside the output directory.
    pub fn disk_name(&self) -> &'static str {
        match self {
            SummaryVariant::Interval => "merged_summary_clip.mp4",
            SummaryVariant::Scene => "merged_scene_clip.mp4",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        SUMMARY_MIME_TYPE
    }
}

impl fmt::Display for SummaryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown variant name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown summary variant: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for SummaryVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interval" => Ok(SummaryVariant::Interval),
            "scene" => Ok(SummaryVariant::Scene),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}
