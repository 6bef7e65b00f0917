//! FFmpeg command builder and runner.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};
use crate::progress::{is_progress_line, FfmpegProgress};

/// Log lines kept for error messages.
const STDERR_TAIL_LINES: usize = 20;

/// One `ffmpeg` invocation with a single input and a single output.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    input: PathBuf,
    /// `-` when writing to the null muxer
    output: PathBuf,
    /// Placed before `-i`
    input_args: Vec<String>,
    /// Placed after `-i`
    output_args: Vec<String>,
    log_level: String,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            log_level: "error".to_string(),
        }
    }

    pub fn input_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Input-side seek, so decoding starts near `seconds`.
    pub fn seek(self, seconds: f64) -> Self {
        self.input_args(["-ss".to_string(), format!("{:.3}", seconds)])
    }

    /// Read at most `seconds` of the input.
    pub fn duration(self, seconds: f64) -> Self {
        self.input_args(["-t".to_string(), format!("{:.3}", seconds)])
    }

    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_args(["-vf".to_string(), filter.into()])
    }

    /// Stream copy every stream.
    pub fn codec_copy(self) -> Self {
        self.output_args(["-c", "copy"])
    }

    /// Move the MP4 index to the front of the file.
    pub fn faststart(self) -> Self {
        self.output_args(["-movflags", "+faststart"])
    }

    /// Decode everything and discard the result.
    pub fn null_output(mut self) -> Self {
        self.output = PathBuf::from("-");
        self.output_args(["-f", "null"])
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Full argument list, without the `ffmpeg` program name.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-v".to_string(),
            self.log_level.clone(),
            "-progress".to_string(),
            "pipe:2".to_string(),
        ];
        args.extend(self.input_args.iter().cloned());
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().into_owned());
        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().into_owned());
        args
    }
}

/// Runs [`FfmpegCommand`]s, optionally killing any that exceed a time limit.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner {
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_optional_timeout(mut self, secs: Option<u64>) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.run_with_progress(cmd, |_| {}).await
    }

    /// Run `cmd`, calling `on_progress` once per progress block.
    pub async fn run_with_progress<F>(&self, cmd: &FfmpegCommand, on_progress: F) -> MediaResult<()>
    where
        F: Fn(FfmpegProgress) + Send + 'static,
    {
        self.execute(cmd, on_progress, LogCapture::Tail).await.map(drop)
    }

    /// Run `cmd` and return every log line it wrote to stderr.
    ///
    /// Filters such as `showinfo` report their results through the log.
    pub async fn run_capturing_log(&self, cmd: &FfmpegCommand) -> MediaResult<Vec<String>> {
        self.execute(cmd, |_| {}, LogCapture::All).await
    }

    async fn execute<F>(&self, cmd: &FfmpegCommand, on_progress: F, capture: LogCapture) -> MediaResult<Vec<String>>
    where
        F: Fn(FfmpegProgress) + Send + 'static,
    {
        check_ffmpeg()?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::ffmpeg_failed("FFmpeg stderr was not captured", None, None))?;
        let reader = tokio::spawn(read_stderr(stderr, on_progress, capture));

        let status = self.wait(&mut child).await;
        let log = reader.await.unwrap_or_default();

        match status {
            Ok(()) => Ok(log),
            Err(MediaError::FfmpegFailed { message, exit_code, .. }) => {
                let tail = log[log.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
                Err(MediaError::ffmpeg_failed(
                    message,
                    (!tail.is_empty()).then_some(tail),
                    exit_code,
                ))
            }
            Err(e) => Err(e),
        }
    }

    async fn wait(&self, child: &mut Child) -> MediaResult<()> {
        let status = match self.timeout_secs {
            Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    warn!("FFmpeg timed out after {} seconds, killing process", secs);
                    let _ = child.kill().await;
                    return Err(MediaError::Timeout(secs));
                }
            },
            None => child.wait().await?,
        };

        if status.success() {
            Ok(())
        } else {
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                None,
                status.code(),
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogCapture {
    Tail,
    All,
}

/// Split stderr into progress snapshots and log lines.
async fn read_stderr<F>(stderr: ChildStderr, on_progress: F, capture: LogCapture) -> Vec<String>
where
    F: Fn(FfmpegProgress),
{
    let mut lines = BufReader::new(stderr).lines();
    let mut progress = FfmpegProgress::default();
    let mut log = VecDeque::new();

    while let Ok(Some(line)) = lines.next_line().await {
        if is_progress_line(&line) {
            if let Some(snapshot) = progress.update(&line) {
                on_progress(snapshot);
            }
            continue;
        }
        log.push_back(line);
        if capture == LogCapture::Tail && log.len() > STDERR_TAIL_LINES {
            log.pop_front();
        }
    }

    log.into()
}

/// Locate `ffmpeg` on `PATH`.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Locate `ffprobe` on `PATH`.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}
