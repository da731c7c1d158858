//! Axum route handlers for the Upload API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::roster::parse_roster_file;
use crate::ingest::session::{StagedStatus, StagedTrainee, UploadSession};
use crate::models::resolution::BulkUploadRow;
use crate::models::template::ResolutionKind;
use crate::records;
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub upload_id: Uuid,
    pub kind: ResolutionKind,
    pub loaded: usize,
    pub new_trainees: usize,
    pub existing_trainees: usize,
    pub row_errors: Vec<String>,
}

impl UploadResponse {
    pub fn from_session(session: &UploadSession) -> Self {
        let new_trainees = session
            .trainees
            .iter()
            .filter(|t| t.status == StagedStatus::New)
            .count();
        Self {
            upload_id: session.upload_id,
            kind: session.kind.clone(),
            loaded: session.trainees.len(),
            new_trainees,
            existing_trainees: session.trainees.len() - new_trainees,
            row_errors: session.row_errors.clone(),
        }
    }
}

struct UploadForm {
    file_name: String,
    data: Bytes,
    kind: ResolutionKind,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/uploads
///
/// Multipart form with a `file` (CSV or Excel roster) and the resolution `kind`.
/// Registers every trainee, records the bulk upload and stages the session.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let roster = parse_roster_file(&form.file_name, &form.data)?;
    let mut row_errors = roster.row_errors;

    let bulk_upload_id = records::insert_bulk_upload(
        &state.db,
        &form.file_name,
        form.kind.tag(),
        count_i32(roster.trainees.len() + row_errors.len()),
    )
    .await?;

    let mut trainees = Vec::with_capacity(roster.trainees.len());
    for record in roster.trainees {
        match records::upsert_trainee(&state.db, &record).await {
            Ok((id, inserted)) => trainees.push(StagedTrainee {
                id: Some(id),
                record,
                status: if inserted {
                    StagedStatus::New
                } else {
                    StagedStatus::Existing
                },
            }),
            Err(e) => {
                warn!("Failed to register trainee {}: {e}", record.document_number);
                row_errors.push(format!(
                    "Documento {}: no se pudo registrar el aprendiz",
                    record.document_number
                ));
            }
        }
    }

    records::complete_bulk_upload(
        &state.db,
        bulk_upload_id,
        count_i32(trainees.len()),
        count_i32(row_errors.len()),
    )
    .await?;

    let session = UploadSession {
        upload_id: Uuid::new_v4(),
        file_name: form.file_name,
        kind: form.kind,
        bulk_upload_id: Some(bulk_upload_id),
        trainees,
        row_errors,
        created_at: Utc::now(),
    };
    state.sessions.save(&session).await?;

    info!(
        "Upload {} staged: {} trainees, {} row errors ({})",
        session.upload_id,
        session.trainees.len(),
        session.row_errors.len(),
        session.kind
    );

    Ok(Json(UploadResponse::from_session(&session)))
}

/// GET /api/v1/uploads/:id
///
/// Returns the staged trainees and row errors for review before generating.
pub async fn handle_get_upload(
    State(state): State<AppState>,
    Path(upload_id): Path<Uuid>,
) -> Result<Json<UploadSession>, AppError> {
    Ok(Json(load_session(&state, &upload_id).await?))
}

/// GET /api/v1/bulk-uploads
pub async fn handle_list_bulk_uploads(
    State(state): State<AppState>,
) -> Result<Json<Vec<BulkUploadRow>>, AppError> {
    Ok(Json(records::list_bulk_uploads(&state.db).await?))
}

/// Loads a staged upload; expired and unknown ids are both `NotFound`.
pub async fn load_session(state: &AppState, upload_id: &Uuid) -> Result<UploadSession, AppError> {
    state
        .sessions
        .load(upload_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("La carga {upload_id} no existe o expiró")))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut kind: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().trim().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file field: {e}")))?;
                file = Some((file_name, data));
            }
            "kind" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid kind field: {e}")))?;
                kind = Some(text);
            }
            _ => {}
        }
    }

    let (file_name, data) = file
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| AppError::Validation("No se seleccionó archivo".to_string()))?;
    let kind = kind
        .filter(|k| !k.trim().is_empty())
        .map(|k| ResolutionKind::from_tag(&k))
        .ok_or_else(|| AppError::Validation("Debe seleccionar el tipo de resolución".to_string()))?;

    Ok(UploadForm {
        file_name,
        data,
        kind,
    })
}

fn count_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trainee::TraineeRecord;

    fn staged(document_number: &str, status: StagedStatus) -> StagedTrainee {
        StagedTrainee {
            id: Some(1),
            record: TraineeRecord {
                document_type: "CC".to_string(),
                document_number: document_number.to_string(),
                given_names: "ANA".to_string(),
                family_names: "LOPEZ".to_string(),
                program: "X".to_string(),
                cohort_code: "1".to_string(),
                birth_date: None,
                phone: None,
                email: None,
            },
            status,
        }
    }

    #[test]
    fn test_upload_response_counts_new_and_existing() {
        let session = UploadSession {
            upload_id: Uuid::nil(),
            file_name: "a.csv".to_string(),
            kind: ResolutionKind::Monitorship,
            bulk_upload_id: Some(3),
            trainees: vec![
                staged("1", StagedStatus::New),
                staged("2", StagedStatus::Existing),
                staged("3", StagedStatus::New),
            ],
            row_errors: vec!["Fila 5: campo requerido vacío: ficha".to_string()],
            created_at: Utc::now(),
        };

        let response = UploadResponse::from_session(&session);
        assert_eq!(response.loaded, 3);
        assert_eq!(response.new_trainees, 2);
        assert_eq!(response.existing_trainees, 1);
        assert_eq!(response.row_errors.len(), 1);
    }

    #[test]
    fn test_count_saturates() {
        assert_eq!(count_i32(7), 7);
        assert_eq!(count_i32(usize::MAX), i32::MAX);
    }
}
