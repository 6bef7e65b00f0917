//! The media operations a summary run depends on.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use trim_models::{EncodingConfig, SceneBoundary, Segment};

use crate::clip::extract_subclip;
use crate::command::FfmpegRunner;
use crate::concat::concat_clips;
use crate::error::MediaResult;
use crate::probe::{probe_media, MediaInfo};
use crate::scene::{detect_scenes, SceneDetectionOptions};

/// Decode, detect and encode collaborators used by the pipeline.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Duration and stream layout of `source`.
    async fn media_info(&self, source: &Path) -> MediaResult<MediaInfo>;

    /// Shot boundaries of `source`, in detection order.
    async fn detect_scenes(&self, source: &Path, duration: f64) -> MediaResult<Vec<SceneBoundary>>;

    /// Write `segment` of `source` to `output` as a standalone clip.
    async fn extract_subclip(&self, source: &Path, segment: &Segment, output: &Path) -> MediaResult<()>;

    /// Join `clips` in order into `output`.
    async fn concat(&self, clips: &[PathBuf], output: &Path) -> MediaResult<()>;
}

/// [`MediaBackend`] that shells out to `ffmpeg` and `ffprobe`.
#[derive(Debug, Clone, Default)]
pub struct FfmpegBackend {
    encoding: EncodingConfig,
    scene: SceneDetectionOptions,
    runner: FfmpegRunner,
}

impl FfmpegBackend {
    pub fn new(encoding: EncodingConfig, scene: SceneDetectionOptions) -> Self {
        Self {
            encoding,
            scene,
            runner: FfmpegRunner::new(),
        }
    }

    /// Kill any single FFmpeg invocation that runs longer than `secs`.
    pub fn with_timeout(mut self, secs: Option<u64>) -> Self {
        self.runner = self.runner.with_optional_timeout(secs);
        self
    }

    pub fn encoding(&self) -> &EncodingConfig {
        &self.encoding
    }

    pub fn scene_options(&self) -> &SceneDetectionOptions {
        &self.scene
    }
}

#[async_trait]
impl MediaBackend for FfmpegBackend {
    async fn media_info(&self, source: &Path) -> MediaResult<MediaInfo> {
        probe_media(source).await
    }

    async fn detect_scenes(&self, source: &Path, duration: f64) -> MediaResult<Vec<SceneBoundary>> {
        detect_scenes(source, duration, &self.scene, &self.runner).await
    }

    async fn extract_subclip(&self, source: &Path, segment: &Segment, output: &Path) -> MediaResult<()> {
        extract_subclip(source, output, segment, &self.encoding, &self.runner).await
    }

    async fn concat(&self, clips: &[PathBuf], output: &Path) -> MediaResult<()> {
        concat_clips(clips, output, &self.runner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_is_object_safe() {
        let backend: Box<dyn MediaBackend> = Box::new(FfmpegBackend::default().with_timeout(Some(60)));
        drop(backend);
    }

    #[test]
    fn test_backend_carries_settings() {
        let backend = FfmpegBackend::new(
            EncodingConfig::default().with_crf(28),
            SceneDetectionOptions {
                threshold: 45.0,
                min_scene_secs: 1.0,
            },
        );
        assert_eq!(backend.encoding().crf, 28);
        assert_eq!(backend.scene_options().threshold, 45.0);
    }
}
