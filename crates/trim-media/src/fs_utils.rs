//! Filesystem helpers for publishing finished outputs.

use std::path::Path;
use tokio::fs;

use crate::error::{MediaError, MediaResult};

/// Move `src` onto `dst`, replacing any existing file.
///
/// Tries a rename first. If the two paths are on different filesystems
/// the file is copied next to `dst` and renamed into place, so `dst` never
/// holds a partial file.
pub async fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            tracing::debug!(
                "Cross-device rename, copying instead: {} -> {}",
                src.display(),
                dst.display()
            );
            copy_and_delete(src, dst).await
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

/// EXDEV is 18 on Linux and macOS.
fn is_cross_device_error(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(18)
}

async fn copy_and_delete(src: &Path, dst: &Path) -> MediaResult<()> {
    let tmp_dst = dst.with_extension("partial");

    if let Err(e) = fs::copy(src, &tmp_dst).await {
        let _ = fs::remove_file(&tmp_dst).await;
        tracing::error!("Copy failed: {} -> {}: {}", src.display(), tmp_dst.display(), e);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp_dst, dst).await {
        let _ = fs::remove_file(&tmp_dst).await;
        tracing::error!("Rename failed: {} -> {}: {}", tmp_dst.display(), dst.display(), e);
        return Err(e.into());
    }

    if let Err(e) = fs::remove_file(src).await {
        tracing::warn!("Failed to remove {} after copy: {}", src.display(), e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_move_file_replaces_destination() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("staging.mp4");
        let dst = dir.path().join("merged_summary_clip.mp4");

        fs::write(&src, b"new summary").await.unwrap();
        fs::write(&dst, b"old summary").await.unwrap();

        move_file(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dst).await.unwrap(), b"new summary");
    }

    #[tokio::test]
    async fn test_move_file_creates_parent() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("staging.mp4");
        let dst = dir.path().join("out").join("merged_scene_clip.mp4");

        fs::write(&src, b"x").await.unwrap();
        move_file(&src, &dst).await.unwrap();

        assert!(dst.exists());
    }

    #[tokio::test]
    async fn test_move_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = move_file(dir.path().join("nope.mp4"), dir.path().join("dst.mp4")).await;
        assert!(matches!(result, Err(MediaError::Io(_))));
    }

    #[test]
    fn test_is_cross_device_error() {
        assert!(is_cross_device_error(&std::io::Error::from_raw_os_error(18)));
        assert!(!is_cross_device_error(&std::io::Error::from_raw_os_error(2)));
    }
}
