//! Summary creation handler.

use std::path::Path as FsPath;
use std::time::Instant;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use trim_models::{RunId, Segment, SkippedSegment, SummaryReport, SummaryVariant};
use trim_pipeline::PipelineResult;

use crate::error::ApiResult;
use crate::handlers::parse_variant;
use crate::metrics;
use crate::state::AppState;
use crate::upload::save_video_upload;

/// Response for a finished summary run.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub run_id: RunId,
    pub variant: SummaryVariant,
    pub source_duration: f64,
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedSegment>,
    pub output_duration: f64,
    pub output_bytes: u64,
    pub download_name: &'static str,
    pub mime_type: &'static str,
    pub preview_url: String,
    pub download_url: String,
}

impl From<SummaryReport> for SummaryResponse {
    fn from(report: SummaryReport) -> Self {
        let variant = report.variant;
        Self {
            run_id: report.run_id,
            variant,
            source_duration: report.source_duration,
            segments: report.segments,
            skipped: report.skipped,
            output_duration: report.output_duration,
            output_bytes: report.output_bytes,
            download_name: variant.download_name(),
            mime_type: variant.mime_type(),
            preview_url: preview_url(variant),
            download_url: download_url(variant),
        }
    }
}

pub fn preview_url(variant: SummaryVariant) -> String {
    format!("/api/summaries/{}/file", variant)
}

pub fn download_url(variant: SummaryVariant) -> String {
    format!("/api/summaries/{}/download", variant)
}

/// Upload a video and build its summary.
///
/// POST /api/summaries/{variant} (multipart field `video`)
pub async fn create_summary(
    State(state): State<AppState>,
    Path(variant): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<SummaryResponse>> {
    let variant = parse_variant(&variant)?;

    let upload = save_video_upload(multipart, &state.pipeline.config().work_dir).await?;
    metrics::record_upload_bytes(upload.bytes);

    // Held until the output file is in place
    let _guard = state.run_lock(variant).lock().await;

    let started = Instant::now();
    let result = run_summary(&state, variant, upload.path()).await;
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.code(),
    };
    metrics::record_summary_run(variant, outcome, started.elapsed().as_secs_f64());

    let report = result?;
    metrics::record_segments_skipped(variant, report.skipped.len());

    info!(
        run_id = %report.run_id,
        variant = %variant,
        segments = report.segments.len(),
        skipped = report.skipped.len(),
        "Summary ready"
    );

    Ok(Json(report.into()))
}

async fn run_summary(state: &AppState, variant: SummaryVariant, upload: &FsPath) -> PipelineResult<SummaryReport> {
    let source = state.pipeline.acquire(upload).await?;
    state.pipeline.run(variant, &source).await
}
