//! Parsing FFmpeg's `-progress pipe:2` key/value blocks.
//!
//! FFmpeg writes one `key=value` per line and closes each block with
//! `progress=continue` (or `progress=end` for the last one). Those lines share
//! stderr with the regular log, so they are recognised by key.

use serde::{Deserialize, Serialize};

/// Snapshot taken at the end of a progress block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FfmpegProgress {
    pub frame: u64,
    /// Position reached in the output, in seconds
    pub out_time_secs: f64,
    /// Multiple of realtime; absent while FFmpeg reports `N/A`
    pub speed: Option<f64>,
    pub is_complete: bool,
}

impl FfmpegProgress {
    /// Share of `total_secs` written so far, in `0.0..=1.0`.
    pub fn fraction_of(&self, total_secs: f64) -> f64 {
        if total_secs <= 0.0 {
            return 0.0;
        }
        (self.out_time_secs / total_secs).clamp(0.0, 1.0)
    }

    /// Wall-clock seconds left at the current speed.
    pub fn remaining_secs(&self, total_secs: f64) -> Option<f64> {
        let speed = self.speed.filter(|s| *s > 0.0)?;
        Some(((total_secs - self.out_time_secs).max(0.0)) / speed)
    }

    /// Fold one `key=value` line in. Returns a snapshot when the block closes.
    pub(crate) fn update(&mut self, line: &str) -> Option<FfmpegProgress> {
        let (key, value) = line.trim().split_once('=')?;
        let value = value.trim();
        match key {
            // Both carry microseconds
            "out_time_us" | "out_time_ms" => {
                if let Ok(us) = value.parse::<i64>() {
                    self.out_time_secs = us.max(0) as f64 / 1_000_000.0;
                }
            }
            "frame" => {
                if let Ok(frame) = value.parse() {
                    self.frame = frame;
                }
            }
            "speed" => {
                self.speed = value.strip_suffix('x').and_then(|s| s.trim().parse().ok());
            }
            "progress" => {
                self.is_complete = value == "end";
                return Some(self.clone());
            }
            _ => {}
        }
        None
    }
}

const PROGRESS_KEYS: &[&str] = &[
    "frame",
    "fps",
    "stream_0_0_q",
    "bitrate",
    "total_size",
    "out_time_us",
    "out_time_ms",
    "out_time",
    "dup_frames",
    "drop_frames",
    "speed",
    "progress",
];

/// Whether `line` belongs to a progress block rather than the log.
pub(crate) fn is_progress_line(line: &str) -> bool {
    line.trim()
        .split_once('=')
        .map(|(key, _)| PROGRESS_KEYS.contains(&key))
        .unwrap_or(false)
}
