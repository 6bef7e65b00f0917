//! Health check handlers.

use std::path::Path;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use trim_media::{check_ffmpeg, check_ffprobe, MediaResult};

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub ffmpeg: CheckStatus,
    pub ffprobe: CheckStatus,
    pub output_dir: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CheckStatus {
    fn ok(path: &Path) -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
            path: Some(path.display().to_string()),
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(msg.into()),
            path: None,
        }
    }

    fn from_tool(result: MediaResult<std::path::PathBuf>) -> Self {
        match result {
            Ok(path) => Self::ok(&path),
            Err(e) => Self::error(e.to_string()),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

async fn check_writable(dir: &Path) -> CheckStatus {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        return CheckStatus::error(format!("cannot create directory: {}", e));
    }
    match tempfile::tempfile_in(dir) {
        Ok(_) => CheckStatus::ok(dir),
        Err(e) => CheckStatus::error(format!("not writable: {}", e)),
    }
}

/// Readiness check endpoint (readiness probe).
/// Checks that the media tools resolve and the output directory is writable.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let ffmpeg_check = CheckStatus::from_tool(check_ffmpeg());
    let ffprobe_check = CheckStatus::from_tool(check_ffprobe());
    let output_check = check_writable(&state.pipeline.config().output_dir).await;

    let all_ok = ffmpeg_check.is_ok() && ffprobe_check.is_ok() && output_check.is_ok();

    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "degraded" }.to_string(),
        checks: ReadinessChecks {
            ffmpeg: ffmpeg_check,
            ffprobe: ffprobe_check,
            output_dir: output_check,
        },
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
