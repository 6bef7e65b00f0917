//! Pipeline configuration.

use std::path::PathBuf;

use trim_media::{FfmpegBackend, SceneDetectionOptions, DEFAULT_MIN_SCENE_SECS, DEFAULT_SCENE_THRESHOLD};
use trim_models::{EncodingConfig, SummaryVariant, MAX_CRF};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Scratch directory for uploads and per-run intermediate clips
    pub work_dir: PathBuf,
    /// Directory holding the one output file per variant
    pub output_dir: PathBuf,
    /// Shot detector settings (scene variant)
    pub scene: SceneDetectionOptions,
    /// Encoding applied to every sub-clip
    pub encoding: EncodingConfig,
    /// Per FFmpeg invocation limit; `None` waits indefinitely
    pub ffmpeg_timeout_secs: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let tmp = std::env::temp_dir();
        Self {
            work_dir: tmp.join("smart-trim"),
            output_dir: tmp,
            scene: SceneDetectionOptions::default(),
            encoding: EncodingConfig::default(),
            ffmpeg_timeout_secs: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let encoding = defaults.encoding.clone();

        Self {
            work_dir: std::env::var("TRIM_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("TRIM_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            scene: SceneDetectionOptions {
                threshold: env_parse("TRIM_SCENE_THRESHOLD").unwrap_or(DEFAULT_SCENE_THRESHOLD),
                min_scene_secs: env_parse("TRIM_MIN_SCENE_SECS").unwrap_or(DEFAULT_MIN_SCENE_SECS),
            },
            encoding: EncodingConfig {
                codec: std::env::var("TRIM_VIDEO_CODEC").unwrap_or(encoding.codec),
                preset: std::env::var("TRIM_PRESET").unwrap_or(encoding.preset),
                crf: env_parse::<u8>("TRIM_CRF").unwrap_or(encoding.crf).min(MAX_CRF),
                audio_codec: std::env::var("TRIM_AUDIO_CODEC").unwrap_or(encoding.audio_codec),
                audio_bitrate: std::env::var("TRIM_AUDIO_BITRATE").unwrap_or(encoding.audio_bitrate),
            },
            ffmpeg_timeout_secs: env_parse("TRIM_FFMPEG_TIMEOUT_SECS").filter(|secs| *secs > 0),
        }
    }

    /// Well-known location of a variant's output.
    pub fn output_path(&self, variant: SummaryVariant) -> PathBuf {
        self.output_dir.join(variant.disk_name())
    }

    /// The FFmpeg backend these settings describe.
    pub fn ffmpeg_backend(&self) -> FfmpegBackend {
        FfmpegBackend::new(self.encoding.clone(), self.scene).with_timeout(self.ffmpeg_timeout_secs)
    }
}
