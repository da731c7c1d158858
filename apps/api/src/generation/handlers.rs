//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::archive::{self, build_archive};
use crate::generation::format::OutputFormat;
use crate::generation::workflow::{run_generation, BatchReport, GenerateRequest};
use crate::ingest::handlers::load_session;
use crate::models::resolution::ResolutionRow;
use crate::models::template::{ResolutionKind, ResolutionTemplate};
use crate::records;
use crate::state::AppState;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TemplatesQuery {
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolutionsQuery {
    pub document_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    pub filenames: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/uploads/:id/generate
///
/// Generates one resolution per selected trainee of a staged upload, then the
/// batch summary. Per-trainee failures are reported in `results`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(upload_id): Path<Uuid>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let session = load_session(&state, &upload_id).await?;
    let now = Local::now().naive_local();

    let run = run_generation(
        state.templates.as_ref(),
        &state.renderer,
        &session,
        &request,
        &state.config.resolution_prefix,
        now,
    )
    .await?;

    for row in run.resolutions_to_record() {
        if let Err(e) = records::insert_resolution(&state.db, &row).await {
            warn!(
                "Resolution {} generated but not recorded: {e}",
                row.resolution_number
            );
        }
    }

    let report = run.into_report(state.output.as_ref()).await?;

    if let Err(e) = state.sessions.save_results(&upload_id, &report).await {
        warn!("Could not stage results for upload {upload_id}: {e}");
    }

    Ok(Json(report))
}

/// GET /api/v1/uploads/:id/results
pub async fn handle_get_results(
    State(state): State<AppState>,
    Path(upload_id): Path<Uuid>,
) -> Result<Json<BatchReport>, AppError> {
    state
        .sessions
        .load_results(&upload_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!("No hay resultados para la carga {upload_id}"))
        })
}

/// GET /api/v1/templates?kind=TRANSPORTE
pub async fn handle_list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplatesQuery>,
) -> Result<Json<Vec<ResolutionTemplate>>, AppError> {
    let kind = ResolutionKind::from_tag(&query.kind);
    Ok(Json(state.templates.list(&kind).await?))
}

/// GET /api/v1/files/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let content = state.output.read(&filename).await?;
    let content_type =
        OutputFormat::from_filename(&filename).map_or(FALLBACK_CONTENT_TYPE, OutputFormat::content_type);
    Ok(([(header::CONTENT_TYPE, content_type)], content))
}

/// POST /api/v1/files/zip
///
/// Bundles the named generated files into one ZIP attachment.
pub async fn handle_download_archive(
    State(state): State<AppState>,
    Json(request): Json<ArchiveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let content = build_archive(state.output.as_ref(), &request.filenames).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        archive::archive_filename(Local::now().naive_local())
    );
    Ok((
        [
            (header::CONTENT_TYPE, archive::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    ))
}

/// GET /api/v1/resolutions?document_number=123
pub async fn handle_list_resolutions(
    State(state): State<AppState>,
    Query(query): Query<ResolutionsQuery>,
) -> Result<Json<Vec<ResolutionRow>>, AppError> {
    let document_number = query
        .document_number
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    Ok(Json(records::list_resolutions(&state.db, document_number).await?))
}
