//! Shared data models for the Smart Trim service.
//!
//! This crate provides Serde-serializable types for:
//! - Segments, scene boundaries and segment lists
//! - Summary variants and their output names
//! - Encoding configuration
//! - Run reports

pub mod encoding;
pub mod report;
pub mod segment;
pub mod timestamp;
pub mod variant;

// Re-export common types
pub use encoding::{EncodingConfig, MAX_CRF};
pub use report::{RunId, SkippedSegment, SummaryReport};
pub use segment::{SceneBoundary, Segment, SegmentError, SegmentList, MAX_SEGMENTS};
pub use timestamp::format_seconds;
pub use variant::{SummaryVariant, UnknownVariant, SUMMARY_MIME_TYPE};
