//! Segment selection and the summary pipeline.
//!
//! A run probes the uploaded source, picks up to three segments with the
//! variant's selector, extracts each one (skipping failures), and joins the
//! survivors into the variant's output file.

pub mod config;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod pipeline;
pub mod selection;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use extraction::{ClipOutcome, ExtractionSummary, KeptClip};
pub use logging::RunLogger;
pub use pipeline::{SourceVideo, SummaryPipeline};
pub use selection::{select_interval_segments, select_scene_segments, InsufficientScenes};
