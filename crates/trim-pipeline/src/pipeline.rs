//! Summary run orchestration: acquire, select, extract, concatenate.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn, Instrument};

use trim_media::{move_file, MediaBackend, MediaError};
use trim_models::{RunId, SegmentList, SummaryReport, SummaryVariant};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::extraction::extract_all;
use crate::logging::RunLogger;
use crate::selection::{select_interval_segments, select_scene_segments};

/// An acquired source video. Passed explicitly to every later step.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceVideo {
    pub path: PathBuf,
    /// Total length in seconds
    pub duration: f64,
    /// Whether the source carries an audio stream
    pub has_audio: bool,
}

/// Runs summary passes against a media backend.
#[derive(Clone)]
pub struct SummaryPipeline {
    backend: Arc<dyn MediaBackend>,
    config: PipelineConfig,
}

impl SummaryPipeline {
    pub fn new(backend: Arc<dyn MediaBackend>, config: PipelineConfig) -> Self {
        Self { backend, config }
    }

    /// Pipeline backed by the FFmpeg CLI.
    pub fn from_config(config: PipelineConfig) -> Self {
        let backend = Arc::new(config.ffmpeg_backend());
        Self::new(backend, config)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Well-known location of a variant's latest output.
    pub fn output_path(&self, variant: SummaryVariant) -> PathBuf {
        self.config.output_path(variant)
    }

    /// Probe a saved upload.
    pub async fn acquire(&self, path: impl Into<PathBuf>) -> PipelineResult<SourceVideo> {
        let path = path.into();
        let info = self
            .backend
            .media_info(&path)
            .await
            .map_err(PipelineError::Acquisition)?;
        let duration = info.duration;

        if !duration.is_finite() || duration < 0.0 {
            return Err(PipelineError::Acquisition(MediaError::InvalidVideo(format!(
                "unusable duration {}",
                duration
            ))));
        }

        info!(
            duration,
            width = info.width,
            height = info.height,
            fps = info.fps,
            codec = %info.video_codec,
            size = info.size,
            has_audio = info.has_audio,
            "Acquired {}",
            path.display()
        );
        if !info.has_audio {
            warn!("{} has no audio stream; the summary will be silent", path.display());
        }

        Ok(SourceVideo {
            path,
            duration,
            has_audio: info.has_audio,
        })
    }

    /// Choose the segments a run of `variant` would extract.
    pub async fn select(&self, variant: SummaryVariant, source: &SourceVideo) -> PipelineResult<SegmentList> {
        let segments = match variant {
            SummaryVariant::Interval => select_interval_segments(source.duration),
            SummaryVariant::Scene => {
                let scenes = self
                    .backend
                    .detect_scenes(&source.path, source.duration)
                    .await
                    .map_err(PipelineError::SceneDetection)?;
                select_scene_segments(&scenes)?
            }
        };

        if segments.is_empty() {
            return Err(PipelineError::NoSegments {
                duration: source.duration,
            });
        }
        Ok(segments)
    }

    /// Produce the summary for `source` at the variant's output path.
    pub async fn run(&self, variant: SummaryVariant, source: &SourceVideo) -> PipelineResult<SummaryReport> {
        let run_id = RunId::new();
        let logger = RunLogger::new(&run_id, variant);
        let span = logger.create_span();

        async move {
            let started = Instant::now();
            logger.log_start(&format!(
                "{} ({:.3}s)",
                source.path.display(),
                source.duration
            ));

            let result = self.run_steps(run_id, variant, source, &logger).await;
            match &result {
                Ok(report) => logger.log_completion(&format!(
                    "{} segments, {:.3}s, {} bytes in {:.1}s",
                    report.segments.len(),
                    report.output_duration,
                    report.output_bytes,
                    started.elapsed().as_secs_f64()
                )),
                Err(e) => logger.log_error(&e.detail()),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_steps(
        &self,
        run_id: RunId,
        variant: SummaryVariant,
        source: &SourceVideo,
        logger: &RunLogger,
    ) -> PipelineResult<SummaryReport> {
        let segments = self.select(variant, source).await?;
        logger.log_progress(&format!(
            "selected {}",
            segments
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));

        tokio::fs::create_dir_all(&self.config.work_dir).await?;
        let scratch = tempfile::Builder::new()
            .prefix("run-")
            .tempdir_in(&self.config.work_dir)?;

        let extraction = extract_all(self.backend.as_ref(), source, &segments, scratch.path(), logger).await;
        if extraction.kept.is_empty() {
            return Err(PipelineError::NoClipsCreated {
                attempted: extraction.attempted(),
            });
        }

        let output_path = self.output_path(variant);
        self.publish(&extraction.clip_paths(), &output_path).await?;
        let output_bytes = tokio::fs::metadata(&output_path).await?.len();

        let kept = extraction.kept_segments();
        Ok(SummaryReport {
            run_id,
            variant,
            source_duration: source.duration,
            output_duration: kept.iter().map(|s| s.duration()).sum(),
            segments: kept,
            skipped: extraction.skipped,
            output_bytes,
            output_path,
        })
    }

    /// Concatenate into a staging file beside `output`, then move it into place.
    async fn publish(&self, clips: &[PathBuf], output: &Path) -> PipelineResult<()> {
        let output_dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(output_dir).await?;

        // Removed on drop if the run fails before the move
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .suffix(".mp4")
            .tempfile_in(output_dir)?
            .into_temp_path();

        self.backend
            .concat(clips, &staging)
            .await
            .map_err(PipelineError::Encoding)?;

        move_file(&staging, output)
            .await
            .map_err(PipelineError::Encoding)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use trim_media::{MediaInfo, MediaResult};
    use trim_models::{SceneBoundary, Segment};

    #[derive(Default)]
    struct FakeBackend {
        duration: f64,
        silent: bool,
        scenes: Vec<SceneBoundary>,
        failing_starts: Vec<f64>,
        fail_concat: bool,
        extracted: Mutex<Vec<Segment>>,
        concatenated: Mutex<Vec<Vec<PathBuf>>>,
    }

    #[async_trait]
    impl MediaBackend for FakeBackend {
        async fn media_info(&self, source: &Path) -> MediaResult<MediaInfo> {
            if !source.exists() {
                return Err(MediaError::FileNotFound(source.to_path_buf()));
            }
            Ok(MediaInfo {
                duration: self.duration,
                width: 1280,
                height: 720,
                fps: 25.0,
                video_codec: "h264".to_string(),
                has_audio: !self.silent,
                size: 5,
            })
        }

        async fn detect_scenes(&self, _source: &Path, _duration: f64) -> MediaResult<Vec<SceneBoundary>> {
            Ok(self.scenes.clone())
        }

        async fn extract_subclip(&self, _source: &Path, segment: &Segment, output: &Path) -> MediaResult<()> {
            self.extracted.lock().unwrap().push(*segment);
            if self.failing_starts.contains(&segment.start) {
                return Err(MediaError::ffmpeg_failed(
                    "FFmpeg exited with non-zero status",
                    Some("Invalid data found when processing input".to_string()),
                    Some(1),
                ));
            }
            tokio::fs::write(output, segment.to_string()).await?;
            Ok(())
        }

        async fn concat(&self, clips: &[PathBuf], output: &Path) -> MediaResult<()> {
            self.concatenated.lock().unwrap().push(clips.to_vec());
            if self.fail_concat {
                return Err(MediaError::ffmpeg_failed("concat failed", None, Some(1)));
            }
            let mut joined = Vec::new();
            for clip in clips {
                joined.extend(tokio::fs::read(clip).await?);
            }
            tokio::fs::write(output, joined).await?;
            Ok(())
        }
    }

    struct Fixture {
        dir: TempDir,
        backend: Arc<FakeBackend>,
        pipeline: SummaryPipeline,
        upload: PathBuf,
    }

    fn fixture(backend: FakeBackend) -> Fixture {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig {
            work_dir: dir.path().join("work"),
            output_dir: dir.path().join("out"),
            ..Default::default()
        };
        let upload = dir.path().join("upload.mp4");
        std::fs::write(&upload, b"video").unwrap();

        let backend = Arc::new(backend);
        let pipeline = SummaryPipeline::new(backend.clone(), config);
        Fixture {
            dir,
            backend,
            pipeline,
            upload,
        }
    }

    fn scenes(ranges: &[(f64, f64)]) -> Vec<SceneBoundary> {
        ranges
            .iter()
            .map(|&(s, e)| SceneBoundary::new(s, e).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_interval_run_writes_output() {
        let fx = fixture(FakeBackend {
            duration: 300.0,
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        let report = fx.pipeline.run(SummaryVariant::Interval, &source).await.unwrap();

        assert_eq!(report.segments.len(), 3);
        assert_eq!(report.segments[0], Segment::new(30.0, 90.0).unwrap());
        assert!(report.skipped.is_empty());
        assert_eq!(report.output_duration, 180.0);
        assert_eq!(report.output_path, fx.dir.path().join("out/merged_summary_clip.mp4"));

        let written = std::fs::read_to_string(&report.output_path).unwrap();
        assert_eq!(
            written,
            "00:00:30-00:01:3000:02:00-00:03:0000:03:30-00:04:30"
        );
        assert_eq!(report.output_bytes, written.len() as u64);

        let concat_calls = fx.backend.concatenated.lock().unwrap().clone();
        assert_eq!(concat_calls.len(), 1);
        let names: Vec<_> = concat_calls[0]
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["segment_00.mp4", "segment_01.mp4", "segment_02.mp4"]);
    }

    #[tokio::test]
    async fn test_run_leaves_no_scratch_files() {
        let fx = fixture(FakeBackend {
            duration: 90.0,
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        fx.pipeline.run(SummaryVariant::Interval, &source).await.unwrap();

        let work_entries = std::fs::read_dir(fx.dir.path().join("work")).unwrap().count();
        assert_eq!(work_entries, 0);
        let out_entries: Vec<_> = std::fs::read_dir(fx.dir.path().join("out"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(out_entries, vec!["merged_summary_clip.mp4"]);
    }

    #[tokio::test]
    async fn test_failed_segment_is_skipped() {
        let fx = fixture(FakeBackend {
            duration: 90.0,
            failing_starts: vec![30.0],
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        let report = fx.pipeline.run(SummaryVariant::Interval, &source).await.unwrap();

        assert_eq!(
            report.segments,
            vec![Segment::new(0.0, 30.0).unwrap(), Segment::new(60.0, 90.0).unwrap()]
        );
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].segment, Segment::new(30.0, 60.0).unwrap());
        assert!(report.skipped[0].reason.contains("Invalid data"));
        assert_eq!(fx.backend.concatenated.lock().unwrap()[0].len(), 2);
    }

    #[tokio::test]
    async fn test_all_segments_failing() {
        let fx = fixture(FakeBackend {
            duration: 90.0,
            failing_starts: vec![0.0, 30.0, 60.0],
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        let err = fx.pipeline.run(SummaryVariant::Interval, &source).await.unwrap_err();

        assert!(matches!(err, PipelineError::NoClipsCreated { attempted: 3 }));
        assert!(fx.backend.concatenated.lock().unwrap().is_empty());
        assert!(!fx.pipeline.output_path(SummaryVariant::Interval).exists());
    }

    #[tokio::test]
    async fn test_concat_failure_is_encoding_error() {
        let fx = fixture(FakeBackend {
            duration: 300.0,
            fail_concat: true,
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        let err = fx.pipeline.run(SummaryVariant::Interval, &source).await.unwrap_err();

        assert_eq!(err.code(), "encoding_failed");
        assert!(!fx.pipeline.output_path(SummaryVariant::Interval).exists());
        let leftovers = std::fs::read_dir(fx.dir.path().join("out")).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_scene_run_orders_longest_first() {
        let fx = fixture(FakeBackend {
            duration: 100.0,
            scenes: scenes(&[(0.0, 5.0), (5.0, 40.0), (40.0, 45.0), (45.0, 100.0)]),
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        let report = fx.pipeline.run(SummaryVariant::Scene, &source).await.unwrap();

        assert_eq!(
            report.segments,
            vec![
                Segment::new(45.0, 100.0).unwrap(),
                Segment::new(5.0, 40.0).unwrap(),
                Segment::new(0.0, 5.0).unwrap(),
            ]
        );
        assert!(report.output_path.ends_with("merged_scene_clip.mp4"));
        assert_eq!(report.download_name(), "scene_summary.mp4");
    }

    #[tokio::test]
    async fn test_insufficient_scenes_stops_before_extraction() {
        let fx = fixture(FakeBackend {
            duration: 100.0,
            scenes: scenes(&[(0.0, 50.0), (50.0, 100.0)]),
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        let err = fx.pipeline.run(SummaryVariant::Scene, &source).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::InsufficientScenes { found: 2, required: 3 }
        ));
        assert!(fx.backend.extracted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scene_past_source_end_is_skipped() {
        let fx = fixture(FakeBackend {
            duration: 100.0,
            scenes: scenes(&[(0.0, 10.0), (10.0, 30.0), (30.0, 120.0)]),
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        let report = fx.pipeline.run(SummaryVariant::Scene, &source).await.unwrap();

        assert_eq!(report.segments.len(), 2);
        assert_eq!(report.skipped[0].segment, Segment::new(30.0, 120.0).unwrap());
        assert_eq!(fx.backend.extracted.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sub_second_source_has_no_segments() {
        let fx = fixture(FakeBackend {
            duration: 0.4,
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        let err = fx.pipeline.run(SummaryVariant::Interval, &source).await.unwrap_err();
        assert_eq!(err.code(), "no_segments");
    }

    #[tokio::test]
    async fn test_acquire_carries_audio_presence() {
        let fx = fixture(FakeBackend {
            duration: 42.5,
            ..Default::default()
        });
        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        assert_eq!(source.duration, 42.5);
        assert!(source.has_audio);

        let fx = fixture(FakeBackend {
            duration: 300.0,
            silent: true,
            ..Default::default()
        });
        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        assert!(!source.has_audio);

        // A silent source still produces a summary
        let report = fx.pipeline.run(SummaryVariant::Interval, &source).await.unwrap();
        assert_eq!(report.segments.len(), 3);
    }

    #[tokio::test]
    async fn test_acquire_missing_upload() {
        let fx = fixture(FakeBackend::default());
        let err = fx
            .pipeline
            .acquire(fx.dir.path().join("missing.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "acquisition_failed");
    }

    #[tokio::test]
    async fn test_second_run_replaces_output() {
        let fx = fixture(FakeBackend {
            duration: 300.0,
            ..Default::default()
        });

        let source = fx.pipeline.acquire(&fx.upload).await.unwrap();
        let first = fx.pipeline.run(SummaryVariant::Interval, &source).await.unwrap();
        let second = fx.pipeline.run(SummaryVariant::Interval, &source).await.unwrap();

        assert_ne!(first.run_id, second.run_id);
        assert_eq!(first.output_path, second.output_path);
        assert!(second.output_path.exists());
    }
}
