//! Content-based shot boundary detection.
//!
//! FFmpeg's `select='gt(scene,T)'` filter passes only frames whose scene
//! change score exceeds `T`, and `showinfo` logs the timestamp of each
//! passed frame. Every logged timestamp is a cut; the shots are the ranges
//! between consecutive cuts.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use trim_models::SceneBoundary;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Default sensitivity in content-change units (0-100).
pub const DEFAULT_SCENE_THRESHOLD: f64 = 30.0;
/// Default minimum shot length in seconds.
pub const DEFAULT_MIN_SCENE_SECS: f64 = 0.5;

/// Scene detector settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneDetectionOptions {
    /// Content-change threshold, 0-100
    pub threshold: f64,
    /// Cuts closer than this to the previous cut are ignored
    pub min_scene_secs: f64,
}

impl Default for SceneDetectionOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SCENE_THRESHOLD,
            min_scene_secs: DEFAULT_MIN_SCENE_SECS,
        }
    }
}

impl SceneDetectionOptions {
    /// Threshold as FFmpeg's 0-1 scene score.
    pub fn score_threshold(&self) -> f64 {
        (self.threshold / 100.0).clamp(0.0, 1.0)
    }

    /// The `-vf` filter chain for detection.
    pub fn filter(&self) -> String {
        format!("select='gt(scene,{:.2})',showinfo", self.score_threshold())
    }
}

fn detection_command(input: &Path, options: &SceneDetectionOptions) -> FfmpegCommand {
    // showinfo reports at info level
    FfmpegCommand::new(input, "-")
        .log_level("info")
        .output_args(["-an"])
        .video_filter(options.filter())
        .null_output()
}

/// Extract cut timestamps from `showinfo` log lines.
pub fn parse_showinfo_cuts<'a, I>(lines: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter(|line| line.contains("showinfo"))
        .filter_map(|line| {
            let rest = line.split_once("pts_time:")?.1;
            let value = rest.split_whitespace().next()?;
            value.parse::<f64>().ok()
        })
        .filter(|t| t.is_finite())
        .collect()
}

/// Turn cut timestamps into consecutive shots covering `[0, duration)`.
///
/// Cuts within `min_scene_secs` of the previous kept cut (or of zero) are
/// dropped, as are cuts at or past `duration`.
pub fn scenes_from_cuts(cuts: &[f64], duration: f64, min_scene_secs: f64) -> Vec<SceneBoundary> {
    if !duration.is_finite() || duration <= 0.0 {
        return Vec::new();
    }

    let mut sorted: Vec<f64> = cuts.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut edges = vec![0.0];
    for cut in sorted {
        let last = edges[edges.len() - 1];
        if cut >= duration || cut - last < min_scene_secs || cut <= last {
            continue;
        }
        edges.push(cut);
    }
    edges.push(duration);

    edges
        .windows(2)
        .filter_map(|w| SceneBoundary::new(w[0], w[1]).ok())
        .collect()
}

/// Run FFmpeg scene detection and return the raw cut timestamps.
pub async fn detect_scene_cuts(
    input: impl AsRef<Path>,
    options: &SceneDetectionOptions,
    runner: &FfmpegRunner,
) -> MediaResult<Vec<f64>> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    info!(
        "Detecting scenes in {} (threshold {:.1})",
        input.display(),
        options.threshold
    );

    let cmd = detection_command(input, options);
    let log = runner.run_capturing_log(&cmd).await?;
    let cuts = parse_showinfo_cuts(log.iter().map(String::as_str));

    debug!("Scene detection found {} raw cuts", cuts.len());
    Ok(cuts)
}

/// Detect the shots of a video of known `duration`.
pub async fn detect_scenes(
    input: impl AsRef<Path>,
    duration: f64,
    options: &SceneDetectionOptions,
    runner: &FfmpegRunner,
) -> MediaResult<Vec<SceneBoundary>> {
    let cuts = detect_scene_cuts(input, options, runner).await?;
    let scenes = scenes_from_cuts(&cuts, duration, options.min_scene_secs);
    info!("Detected {} scenes", scenes.len());
    Ok(scenes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOWINFO_LOG: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'in.mp4':
[Parsed_showinfo_1 @ 0x5581] config in time_base: 1/12800, frame_rate: 25/1
[Parsed_showinfo_1 @ 0x5581] n:   0 pts:  64000 pts_time:5       duration:    512 fmt:yuv420p
[Parsed_showinfo_1 @ 0x5581] n:   1 pts: 512000 pts_time:40      duration:    512 fmt:yuv420p
[Parsed_showinfo_1 @ 0x5581] n:   2 pts: 517120 pts_time:40.4    duration:    512 fmt:yuv420p
[Parsed_showinfo_1 @ 0x5581] n:   3 pts: 576000 pts_time:45      duration:    512 fmt:yuv420p
[out#0/null @ 0x5590] video:0KiB audio:0KiB";

    #[test]
    fn test_score_threshold() {
        let options = SceneDetectionOptions::default();
        assert!((options.score_threshold() - 0.30).abs() < 1e-9);
        assert_eq!(options.filter(), "select='gt(scene,0.30)',showinfo");
    }

    #[test]
    fn test_parse_showinfo_cuts() {
        let cuts = parse_showinfo_cuts(SHOWINFO_LOG.lines());
        assert_eq!(cuts, vec![5.0, 40.0, 40.4, 45.0]);
    }

    #[test]
    fn test_scenes_from_cuts_drops_close_cuts() {
        let cuts = parse_showinfo_cuts(SHOWINFO_LOG.lines());
        let scenes = scenes_from_cuts(&cuts, 100.0, 0.5);

        let ranges: Vec<(f64, f64)> = scenes.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, vec![(0.0, 5.0), (5.0, 40.0), (40.0, 45.0), (45.0, 100.0)]);
    }

    #[test]
    fn test_scenes_without_cuts() {
        let scenes = scenes_from_cuts(&[], 12.0, 0.5);
        assert_eq!(scenes.len(), 1);
        assert_eq!((scenes[0].start, scenes[0].end), (0.0, 12.0));
    }

    #[test]
    fn test_scenes_ignore_cuts_near_start_and_past_end() {
        let scenes = scenes_from_cuts(&[0.2, 3.0, 12.0, 15.0], 12.0, 0.5);
        let ranges: Vec<(f64, f64)> = scenes.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, vec![(0.0, 3.0), (3.0, 12.0)]);
    }

    #[test]
    fn test_scenes_from_unsorted_cuts() {
        let scenes = scenes_from_cuts(&[20.0, 10.0], 30.0, 0.5);
        assert_eq!(scenes.len(), 3);
        assert_eq!(scenes[1].start, 10.0);
    }

    #[test]
    fn test_scenes_zero_duration() {
        assert!(scenes_from_cuts(&[1.0], 0.0, 0.5).is_empty());
    }
}
