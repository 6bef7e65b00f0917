//! Pipeline error types.

use thiserror::Error;
use trim_media::MediaError;

use crate::selection::InsufficientScenes;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Could not read the uploaded video: {0}")]
    Acquisition(#[source] MediaError),

    #[error("No segments could be selected from a {duration:.1}s video")]
    NoSegments { duration: f64 },

    #[error("Insufficient distinct scenes detected ({found} found, {required} required)")]
    InsufficientScenes { found: usize, required: usize },

    #[error("Scene detection failed: {0}")]
    SceneDetection(#[source] MediaError),

    #[error("No clips were successfully created ({attempted} attempted)")]
    NoClipsCreated { attempted: usize },

    #[error("Encoding the summary failed: {0}")]
    Encoding(#[source] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<InsufficientScenes> for PipelineError {
    fn from(e: InsufficientScenes) -> Self {
        Self::InsufficientScenes {
            found: e.found,
            required: e.required,
        }
    }
}

impl PipelineError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Acquisition(_) => "acquisition_failed",
            PipelineError::NoSegments { .. } => "no_segments",
            PipelineError::InsufficientScenes { .. } => "insufficient_scenes",
            PipelineError::SceneDetection(_) => "scene_detection_failed",
            PipelineError::NoClipsCreated { .. } => "no_clips_created",
            PipelineError::Encoding(_) => "encoding_failed",
            PipelineError::Io(_) => "io",
        }
    }

    /// Category message that carries no tool output.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Acquisition(_) => "Could not read the uploaded video".to_string(),
            PipelineError::SceneDetection(_) => "Scene detection failed".to_string(),
            PipelineError::Encoding(_) => "Encoding the summary failed".to_string(),
            PipelineError::Io(_) => "A file operation failed".to_string(),
            other => other.to_string(),
        }
    }

    /// Full message including the last line of any tool output.
    pub fn detail(&self) -> String {
        match self {
            PipelineError::Acquisition(e)
            | PipelineError::SceneDetection(e)
            | PipelineError::Encoding(e) => format!("{}: {}", self.user_message(), e.detailed()),
            other => other.to_string(),
        }
    }

    /// Whether the failure comes from the input rather than the service.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Acquisition(_)
                | PipelineError::NoSegments { .. }
                | PipelineError::InsufficientScenes { .. }
                | PipelineError::NoClipsCreated { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            PipelineError::Acquisition(MediaError::InvalidVideo("x".into())),
            PipelineError::NoSegments { duration: 0.4 },
            PipelineError::InsufficientScenes { found: 2, required: 3 },
            PipelineError::SceneDetection(MediaError::Timeout(10)),
            PipelineError::NoClipsCreated { attempted: 3 },
            PipelineError::Encoding(MediaError::Timeout(10)),
            PipelineError::Io(std::io::Error::other("disk")),
        ];
        let mut codes: Vec<_> = errors.iter().map(PipelineError::code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_user_message_hides_tool_output() {
        let err = PipelineError::Encoding(MediaError::ffmpeg_failed(
            "FFmpeg exited with non-zero status",
            Some("/tmp/smart-trim/run-1/concat.txt: Permission denied".into()),
            Some(1),
        ));
        assert_eq!(err.user_message(), "Encoding the summary failed");
        assert!(err.detail().contains("Permission denied"));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_insufficient_scenes_message() {
        let err: PipelineError = InsufficientScenes { found: 2, required: 3 }.into();
        assert_eq!(err.code(), "insufficient_scenes");
        assert_eq!(
            err.user_message(),
            "Insufficient distinct scenes detected (2 found, 3 required)"
        );
        assert!(err.is_input_error());
    }
}
