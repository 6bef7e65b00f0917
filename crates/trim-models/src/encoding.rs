//! Sub-clip encoding settings.
//!
//! Every segment is re-encoded with the same settings so the concat demuxer
//! can join the clips without a second encode.

use serde::{Deserialize, Serialize};

/// Highest CRF x264 accepts.
pub const MAX_CRF: u8 = 51;

/// H.264/AAC settings for the summary clips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// FFmpeg video encoder name
    pub codec: String,
    pub preset: String,
    /// 0 (lossless) to 51
    pub crf: u8,
    pub audio_codec: String,
    /// FFmpeg bitrate string such as `128k`
    pub audio_bitrate: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 23,
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

impl EncodingConfig {
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf.min(MAX_CRF);
        self
    }

    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    /// Output-side FFmpeg arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        let crf = self.crf.min(MAX_CRF).to_string();
        [
            "-c:v",
            self.codec.as_str(),
            "-preset",
            self.preset.as_str(),
            "-crf",
            crf.as_str(),
            // Browsers only play 4:2:0 H.264
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            self.audio_codec.as_str(),
            "-b:a",
            self.audio_bitrate.as_str(),
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }
}
