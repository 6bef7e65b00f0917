//! Saving the uploaded video to the work directory.

use std::path::Path;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{ApiError, ApiResult};

/// Multipart field carrying the video.
pub const VIDEO_FIELD: &str = "video";

const ACCEPTED_MIME_TYPES: &[&str] = &["video/mp4", "video/quicktime"];
const ACCEPTED_EXTENSIONS: &[&str] = &["mp4", "mov"];

/// An upload on disk. The file is deleted when this is dropped.
#[derive(Debug)]
pub struct SavedUpload {
    file: NamedTempFile,
    pub file_name: Option<String>,
    pub bytes: u64,
}

impl SavedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Whether a part with this MIME type and file name is an accepted video.
///
/// The extension only counts when the client sent no specific type.
pub fn is_accepted_video(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let mime = content_type.map(essence).filter(|m| !m.is_empty());
    match mime.as_deref() {
        Some(m) if ACCEPTED_MIME_TYPES.contains(&m) => true,
        None | Some("application/octet-stream") => file_name
            .and_then(extension)
            .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false),
        Some(_) => false,
    }
}

fn suffix_for(content_type: Option<&str>, file_name: Option<&str>) -> &'static str {
    let from_name = file_name.and_then(extension);
    match (from_name.as_deref(), content_type.map(essence).as_deref()) {
        (Some("mov"), _) | (_, Some("video/quicktime")) => ".mov",
        _ => ".mp4",
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request(e.body_text())
    }
}

/// Stream the `video` field of `multipart` into a temporary file in `work_dir`.
pub async fn save_video_upload(mut multipart: Multipart, work_dir: &Path) -> ApiResult<SavedUpload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }
        return save_field(field, work_dir).await;
    }

    Err(ApiError::bad_request(format!(
        "missing multipart field '{}'",
        VIDEO_FIELD
    )))
}

async fn save_field(mut field: Field<'_>, work_dir: &Path) -> ApiResult<SavedUpload> {
    let content_type = field.content_type().map(str::to_string);
    let file_name = field.file_name().map(str::to_string);

    if !is_accepted_video(content_type.as_deref(), file_name.as_deref()) {
        return Err(ApiError::unsupported_media_type(format!(
            "expected video/mp4 or video/quicktime, got {}",
            content_type.as_deref().unwrap_or("no content type")
        )));
    }

    tokio::fs::create_dir_all(work_dir).await?;
    let file = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(suffix_for(content_type.as_deref(), file_name.as_deref()))
        .tempfile_in(work_dir)?;

    let mut writer = tokio::fs::File::from_std(file.reopen()?);
    let mut bytes = 0u64;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        writer.write_all(&chunk).await?;
        bytes += chunk.len() as u64;
    }
    writer.flush().await?;

    if bytes == 0 {
        return Err(ApiError::bad_request("uploaded file is empty"));
    }

    info!(
        file_name = file_name.as_deref().unwrap_or("-"),
        bytes, "Saved upload to {}",
        file.path().display()
    );

    Ok(SavedUpload {
        file,
        file_name,
        bytes,
    })
}
