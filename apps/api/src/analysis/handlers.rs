//! Axum route handlers for the Analysis API.

use std::time::Duration;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::export::render_export;
use crate::analysis::AnalysisReport;
use crate::errors::AppError;
use crate::extraction::{ExtractedText, ExtractionMethod};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    /// Absent when the caller supplied resume text directly.
    pub extraction_method: Option<ExtractionMethod>,
    /// Human-readable summary of the score band.
    pub verdict: &'static str,
    pub report: AnalysisReport,
    pub export: String,
}

/// Fields of the multipart upload form.
struct ResumeUpload {
    resume: Bytes,
    job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart form: `resume` (PDF file) and `job_description` (text).
/// Extracts the resume text, scores it once, and returns the report with its export.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let analysis_id = Uuid::new_v4();
    info!(%analysis_id, bytes = upload.resume.len(), "Analyzing uploaded resume");

    let extracted = extract_resume(&state, upload.resume).await?;
    let report = run_analysis(&state, extracted.text, upload.job_description).await?;
    let export = render_export(&report);

    info!(%analysis_id, score = report.overall_score, "Analysis complete");
    Ok(Json(AnalyzeResponse {
        analysis_id,
        extraction_method: Some(extracted.method),
        verdict: report.band.message(),
        report,
        export,
    }))
}

/// POST /api/v1/analyze/text
///
/// Scores already-extracted resume text. Useful for previews and for clients that
/// run their own PDF pipeline.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    validate_job_description(&request.job_description)?;

    let analysis_id = Uuid::new_v4();
    let report = run_analysis(&state, request.resume_text, request.job_description).await?;
    let export = render_export(&report);

    info!(%analysis_id, score = report.overall_score, "Text analysis complete");
    Ok(Json(AnalyzeResponse {
        analysis_id,
        extraction_method: None,
        verdict: report.band.message(),
        report,
        export,
    }))
}

/// POST /api/v1/analyze/export
///
/// Same form as `/analyze`; responds with the plain-text report as a download.
pub async fn handle_export(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let extracted = extract_resume(&state, upload.resume).await?;
    let report = run_analysis(&state, extracted.text, upload.job_description).await?;

    let filename = format!("resume_analysis_{}.txt", Utc::now().format("%Y%m%d_%H%M%S"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        render_export(&report),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload(mut multipart: Multipart, limit: usize) -> Result<ResumeUpload, AppError> {
    let mut resume = None;
    let mut job_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                if data.len() > limit {
                    return Err(AppError::PayloadTooLarge { limit });
                }
                resume = Some(data);
            }
            "job_description" => {
                job_description = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            _ => {}
        }
    }

    let resume = resume
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_description = job_description.unwrap_or_default();
    validate_job_description(&job_description)?;

    Ok(ResumeUpload {
        resume,
        job_description,
    })
}

fn multipart_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::Validation(format!("Malformed upload: {e}"))
    }
}

fn validate_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Runs extraction on the blocking pool under the configured timeout.
/// A timed-out OCR subprocess keeps running until it exits; only the request is released.
async fn extract_resume(state: &AppState, pdf_bytes: Bytes) -> Result<ExtractedText, AppError> {
    let extractor = state.extractor.clone();
    let secs = state.config.extraction_timeout_secs;

    let task = tokio::task::spawn_blocking(move || extractor.extract(&pdf_bytes));
    let joined = tokio::time::timeout(Duration::from_secs(secs), task)
        .await
        .map_err(|_| AppError::Timeout(secs))?;

    let extracted = joined.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
    })??;
    Ok(extracted)
}

async fn run_analysis(
    state: &AppState,
    resume_text: String,
    job_description: String,
) -> Result<AnalysisReport, AppError> {
    let analyzer = state.analyzer.clone();
    tokio::task::spawn_blocking(move || analyzer.score(&resume_text, &job_description))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in scoring: {e}")))
}
