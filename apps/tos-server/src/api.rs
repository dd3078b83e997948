//! API handlers for the analysis server
//!
//! Provides REST endpoints for:
//! - Direct text analysis
//! - Document upload with deduplication by content hash
//! - Stored results, export, history and comparison

use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use clause_engine::{content_hash, resolve_persona};
use shared_pdf::{extract_text, DocumentKind};
use shared_types::{AnalysisReport, Persona, RiskLevel};

use crate::error::ServerError;
use crate::store::StoredAnalysis;
use crate::AppState;

/// Entries returned by GET /api/compare
pub const COMPARE_LIMIT: usize = 20;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "tos-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Analyze request body
#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,

    /// Persona name; unknown names fall back to `individual_user`
    pub user_persona: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub report: AnalysisReport,
}

/// Handler: POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ServerError> {
    if req.text.trim().is_empty() {
        return Err(ServerError::InvalidRequest("No text provided".into()));
    }
    let persona = resolve_persona(req.user_persona.as_deref());
    info!(chars = req.text.len(), persona = %persona, "Analyze request");

    let report = run_analysis(&state, req.text, persona).await?;
    Ok(Json(AnalyzeResponse {
        success: true,
        report,
    }))
}

/// Upload request body
#[derive(Deserialize)]
pub struct UploadRequest {
    /// Original file name; the extension selects PDF or plain text
    pub filename: String,

    /// Base64-encoded file contents
    pub content_base64: String,

    pub user_persona: Option<String>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    /// True when the same bytes were analysed before
    pub duplicate: bool,
    pub result: StoredAnalysis,
}

/// Handler: POST /api/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ServerError> {
    let filename = sanitize_filename(&req.filename);
    let kind = DocumentKind::from_filename(&filename).ok_or_else(|| {
        ServerError::InvalidRequest("Please upload a PDF or TXT file only".into())
    })?;
    let bytes = STANDARD
        .decode(req.content_base64.trim())
        .map_err(|e| ServerError::InvalidRequest(format!("Invalid base64 content: {}", e)))?;

    let file_hash = content_hash(&bytes);
    if let Some(existing) = state.store.find_by_hash(&file_hash)? {
        info!(id = %existing.id, "Upload already analysed, returning stored result");
        return Ok(Json(UploadResponse {
            success: true,
            duplicate: true,
            result: existing,
        }));
    }

    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, kind))
        .await
        .map_err(|e| ServerError::Internal(format!("Extraction task panicked: {}", e)))?;
    if text.trim().is_empty() {
        warn!(filename = %filename, "No text extracted from upload");
        return Err(ServerError::ExtractionFailed(
            "No text could be extracted from the file".into(),
        ));
    }

    let persona = resolve_persona(req.user_persona.as_deref());
    info!(filename = %filename, chars = text.len(), persona = %persona, "Upload request");
    let report = run_analysis(&state, text, persona).await?;
    let stored = state.store.save(&filename, &file_hash, report)?;

    Ok(Json(UploadResponse {
        success: true,
        duplicate: false,
        result: stored,
    }))
}

#[derive(Serialize)]
pub struct ResultResponse {
    pub success: bool,
    pub result: StoredAnalysis,
}

/// Handler: GET /api/results/:id
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResultResponse>, ServerError> {
    let stored = lookup(&state, &id)?;
    Ok(Json(ResultResponse {
        success: true,
        result: stored,
    }))
}

/// Downloadable analysis
#[derive(Serialize)]
pub struct ExportResponse {
    pub filename: String,
    pub analysis_date: String,
    pub risk_score: u8,
    pub transparency_score: u8,
    pub analysis_results: AnalysisReport,
}

/// Handler: GET /api/export/:id
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExportResponse>, ServerError> {
    let stored = lookup(&state, &id)?;
    Ok(Json(ExportResponse {
        filename: stored.filename,
        analysis_date: stored.created_at.to_rfc3339(),
        risk_score: stored.risk_score,
        transparency_score: stored.transparency_score,
        analysis_results: stored.report,
    }))
}

#[derive(Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub filename: String,
    pub risk_score: u8,
    pub transparency_score: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub analyses: Vec<HistoryEntry>,
    pub count: usize,
}

/// Handler: GET /api/history
pub async fn handle_history(
    State(state): State<AppState>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let analyses: Vec<HistoryEntry> = state
        .store
        .recent(state.history_limit)?
        .into_iter()
        .map(|s| HistoryEntry {
            id: s.id,
            filename: s.filename,
            risk_score: s.risk_score,
            transparency_score: s.transparency_score,
            created_at: s.created_at,
        })
        .collect();
    let count = analyses.len();

    Ok(Json(HistoryResponse {
        success: true,
        analyses,
        count,
    }))
}

/// Score summary for side-by-side comparison
#[derive(Serialize)]
pub struct CompareEntry {
    pub id: Uuid,
    pub filename: String,
    pub risk_score: u8,
    pub transparency_score: u8,
    pub risk_level: RiskLevel,
    pub total_flags: usize,
    pub company_power_percentage: Option<f64>,
    pub weighted_risk: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct CompareResponse {
    pub success: bool,
    pub analyses: Vec<CompareEntry>,
    pub count: usize,
}

/// Handler: GET /api/compare
pub async fn handle_compare(
    State(state): State<AppState>,
) -> Result<Json<CompareResponse>, ServerError> {
    let analyses: Vec<CompareEntry> = state
        .store
        .recent(COMPARE_LIMIT)?
        .into_iter()
        .map(|s| {
            let power = s.report.power_analysis.as_ref();
            CompareEntry {
                id: s.id,
                filename: s.filename.clone(),
                risk_score: s.risk_score,
                transparency_score: s.transparency_score,
                risk_level: s.report.executive_summary.risk_level,
                total_flags: s.report.total_flags,
                company_power_percentage: power
                    .map(|p| p.power_imbalance.company_power_percentage),
                weighted_risk: power.map(|p| p.weighted_risk.overall_score),
                created_at: s.created_at,
            }
        })
        .collect();
    let count = analyses.len();

    Ok(Json(CompareResponse {
        success: true,
        analyses,
        count,
    }))
}

/// Run the engine off the async runtime, bounded by the configured timeout
async fn run_analysis(
    state: &AppState,
    text: String,
    persona: Persona,
) -> Result<AnalysisReport, ServerError> {
    let engine = state.engine.clone();
    let result = tokio::time::timeout(
        Duration::from_millis(state.timeout_ms),
        tokio::task::spawn_blocking(move || engine.analyze(&text, persona)),
    )
    .await;

    match result {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(join_error)) => Err(ServerError::Internal(format!(
            "Analysis task panicked: {}",
            join_error
        ))),
        Err(_timeout) => {
            warn!(timeout_ms = state.timeout_ms, "Analysis timed out");
            Err(ServerError::Timeout(state.timeout_ms))
        }
    }
}

fn lookup(state: &AppState, id: &str) -> Result<StoredAnalysis, ServerError> {
    let uuid = Uuid::parse_str(id)
        .map_err(|_| ServerError::InvalidRequest(format!("Malformed analysis id '{}'", id)))?;
    state
        .store
        .get(uuid)?
        .ok_or_else(|| ServerError::NotFound(id.to_string()))
}

/// Keep only the final path component of a client-supplied name
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        "upload".to_string()
    } else {
        base.to_string()
    }
}
