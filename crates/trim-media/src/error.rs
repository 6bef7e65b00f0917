//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create an invalid range error.
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange(message.into())
    }

    /// Captured tool output attached to the error, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            MediaError::FfmpegFailed { stderr, .. } | MediaError::FfprobeFailed { stderr, .. } => {
                stderr.as_deref()
            }
            _ => None,
        }
    }

    /// One-line description including the tail of the tool output.
    pub fn detailed(&self) -> String {
        match self.stderr().map(str::trim).filter(|s| !s.is_empty()) {
            Some(stderr) => {
                let last = stderr.lines().last().unwrap_or_default();
                format!("{} ({})", self, last.trim())
            }
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detailed_uses_last_stderr_line() {
        let err = MediaError::ffmpeg_failed(
            "FFmpeg exited with non-zero status",
            Some("frame=1\nInvalid data found when processing input\n".to_string()),
            Some(1),
        );
        assert_eq!(
            err.detailed(),
            "FFmpeg command failed: FFmpeg exited with non-zero status (Invalid data found when processing input)"
        );
    }

    #[test]
    fn test_detailed_without_stderr() {
        assert_eq!(MediaError::Timeout(5).detailed(), "Operation timed out after 5 seconds");
    }
}
