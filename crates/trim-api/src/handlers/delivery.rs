//! Summary delivery handlers.
//!
//! Both endpoints serve the variant's latest output. The preview is inline
//! for a `<video>` element; the download carries an attachment disposition
//! with the variant's fixed file name. Range requests are honoured so the
//! player can seek.

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderValue};
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use trim_models::SummaryVariant;

use crate::error::{ApiError, ApiResult};
use crate::handlers::parse_variant;
use crate::state::AppState;

/// GET /api/summaries/{variant}/file
pub async fn preview_summary(
    State(state): State<AppState>,
    Path(variant): Path<String>,
    request: Request,
) -> ApiResult<Response> {
    let variant = parse_variant(&variant)?;
    serve_output(&state, variant, request, false).await
}

/// GET /api/summaries/{variant}/download
pub async fn download_summary(
    State(state): State<AppState>,
    Path(variant): Path<String>,
    request: Request,
) -> ApiResult<Response> {
    let variant = parse_variant(&variant)?;
    serve_output(&state, variant, request, true).await
}

async fn serve_output(
    state: &AppState,
    variant: SummaryVariant,
    request: Request,
    attachment: bool,
) -> ApiResult<Response> {
    let path = state.pipeline.output_path(variant);
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(ApiError::not_found(format!(
            "No {} summary has been produced yet",
            variant
        )));
    }

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    let mut response = response.map(Body::new);
    let headers = response.headers_mut();

    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(variant.mime_type()));
    // The file is replaced by every run
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    let disposition = if attachment {
        format!("attachment; filename=\"{}\"", variant.download_name())
    } else {
        format!("inline; filename=\"{}\"", variant.download_name())
    };
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}
