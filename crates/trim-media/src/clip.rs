//! Sub-clip extraction.

use std::path::Path;
use tracing::{debug, info};

use trim_models::{EncodingConfig, Segment};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Build the FFmpeg command that cuts `segment` out of `input`.
///
/// The sub-clip is re-encoded so every clip handed to the concat demuxer
/// has the same codecs and a timestamp origin of zero.
pub fn subclip_command(
    input: &Path,
    output: &Path,
    segment: &Segment,
    encoding: &EncodingConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(input, output)
        .seek(segment.start)
        .duration(segment.duration())
        .output_args(encoding.to_ffmpeg_args())
        .output_args(["-avoid_negative_ts", "make_zero"])
}

/// Extract `[segment.start, segment.end)` from `input` into `output`.
pub async fn extract_subclip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    segment: &Segment,
    encoding: &EncodingConfig,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }
    if segment.duration() <= 0.0 {
        return Err(MediaError::invalid_range(format!("empty segment {}", segment)));
    }

    info!(
        "Extracting sub-clip {}: {} -> {}",
        segment,
        input.display(),
        output.display()
    );

    let cmd = subclip_command(input, output, segment, encoding);
    let total = segment.duration();
    runner
        .run_with_progress(&cmd, move |progress| {
            debug!(
                "Sub-clip progress: {:.0}% ({:.1}s left)",
                progress.fraction_of(total) * 100.0,
                progress.remaining_secs(total).unwrap_or(f64::NAN)
            );
        })
        .await?;

    // FFmpeg can exit cleanly yet write nothing when the range holds no frames
    let written = tokio::fs::metadata(output).await.map(|m| m.len()).unwrap_or(0);
    if written == 0 {
        return Err(MediaError::ffmpeg_failed(
            format!("FFmpeg produced no output for {}", segment),
            None,
            None,
        ));
    }

    debug!("Sub-clip written: {} ({} bytes)", output.display(), written);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subclip_command_reencodes_range() {
        let segment = Segment::new(30.0, 90.0).unwrap();
        let cmd = subclip_command(
            Path::new("source.mp4"),
            Path::new("segment_00.mp4"),
            &segment,
            &EncodingConfig::default(),
        );
        let args = cmd.build_args();

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "30.000");
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "60.000");
        let cv = args.iter().position(|a| a == "-c:v").unwrap();
        assert_eq!(args[cv + 1], "libx264");
        let ca = args.iter().position(|a| a == "-c:a").unwrap();
        assert_eq!(args[ca + 1], "aac");
        assert!(args.contains(&"make_zero".to_string()));
        assert_eq!(args.last().unwrap(), "segment_00.mp4");
    }

    #[tokio::test]
    async fn test_extract_missing_input() {
        let segment = Segment::new(0.0, 5.0).unwrap();
        let result = extract_subclip(
            "/no/such/source.mp4",
            "/tmp/out.mp4",
            &segment,
            &EncodingConfig::default(),
            &FfmpegRunner::new(),
        )
        .await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
