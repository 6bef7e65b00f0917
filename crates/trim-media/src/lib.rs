//! FFmpeg CLI wrapper for the summary pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Progress parsing from `-progress pipe:2`
//! - Probing, sub-clip extraction and concatenation
//! - Shot boundary detection with the `scene` select filter
//! - The [`MediaBackend`] seam the pipeline is tested through

pub mod backend;
pub mod clip;
pub mod command;
pub mod concat;
pub mod error;
pub mod fs_utils;
pub mod probe;
pub mod progress;
pub mod scene;

pub use backend::{FfmpegBackend, MediaBackend};
pub use clip::extract_subclip;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use concat::concat_clips;
pub use error::{MediaError, MediaResult};
pub use fs_utils::move_file;
pub use probe::{probe_media, MediaInfo};
pub use progress::FfmpegProgress;
pub use scene::{detect_scenes, SceneDetectionOptions, DEFAULT_MIN_SCENE_SECS, DEFAULT_SCENE_THRESHOLD};
