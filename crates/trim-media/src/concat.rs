//! Joining normalised sub-clips with the concat demuxer.

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Render a concat demuxer list for `clips`, one `file '...'` line each.
pub fn concat_list(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|p| {
            // A single quote cannot appear inside '...'; close, escape, reopen
            let quoted = p.to_string_lossy().replace('\'', r"'\''");
            format!("file '{}'\n", quoted)
        })
        .collect()
}

/// Build the stream-copy concat command for a list file.
pub fn concat_command(list_file: &Path, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(list_file, output)
        .input_args(["-f", "concat", "-safe", "0"])
        .codec_copy()
        .faststart()
}

/// Concatenate `clips` in order into `output`.
///
/// The clips must share codecs and parameters, which holds for clips made
/// by [`crate::clip::extract_subclip`] with one encoding configuration.
pub async fn concat_clips(
    clips: &[PathBuf],
    output: impl AsRef<Path>,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    let output = output.as_ref();

    if clips.is_empty() {
        return Err(MediaError::InvalidVideo("No clips to concatenate".to_string()));
    }
    if let Some(missing) = clips.iter().find(|p| !p.exists()) {
        return Err(MediaError::FileNotFound(missing.clone()));
    }

    let list_dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut list_file = tempfile::Builder::new()
        .prefix("concat-")
        .suffix(".txt")
        .tempfile_in(list_dir)?;
    list_file.write_all(concat_list(clips).as_bytes())?;
    list_file.flush()?;

    info!("Concatenating {} clips into {}", clips.len(), output.display());

    let cmd = concat_command(list_file.path(), output);
    runner.run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_concat_list_format() {
        let clips = vec![
            PathBuf::from("/work/run/segment_00.mp4"),
            PathBuf::from("/work/run/segment_01.mp4"),
        ];
        assert_eq!(
            concat_list(&clips),
            "file '/work/run/segment_00.mp4'\nfile '/work/run/segment_01.mp4'\n"
        );
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let clips = vec![PathBuf::from("/tmp/it's here.mp4")];
        assert_eq!(concat_list(&clips), "file '/tmp/it'\\''s here.mp4'\n");
    }

    #[test]
    fn test_concat_command_stream_copies() {
        let args = concat_command(Path::new("list.txt"), Path::new("out.mp4")).build_args();
        let f = args.iter().position(|a| a == "concat").unwrap();
        let i = args.iter().position(|a| a == "-i").unwrap();
        assert!(f < i);
        assert!(args.windows(2).any(|w| w[0] == "-c" && w[1] == "copy"));
        assert!(args.contains(&"+faststart".to_string()));
    }

    #[tokio::test]
    async fn test_concat_rejects_empty_input() {
        let dir = TempDir::new().unwrap();
        let result = concat_clips(&[], dir.path().join("out.mp4"), &FfmpegRunner::new()).await;
        assert!(matches!(result, Err(MediaError::InvalidVideo(_))));
    }

    #[tokio::test]
    async fn test_concat_rejects_missing_clip() {
        let dir = TempDir::new().unwrap();
        let clips = vec![dir.path().join("segment_00.mp4")];
        let result = concat_clips(&clips, dir.path().join("out.mp4"), &FfmpegRunner::new()).await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
