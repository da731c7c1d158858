use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::archive::ArchiveError;
use crate::generation::batch::GenerationError;
use crate::ingest::session::SessionError;
use crate::ingest::IngestError;
use crate::storage::StorageError;
use crate::templates::TemplateStoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(name) => {
                AppError::NotFound(format!("Archivo no encontrado: {name}"))
            }
            StorageError::InvalidName(name) => {
                AppError::Validation(format!("Nombre de archivo inválido: {name}"))
            }
            other => AppError::Storage(other),
        }
    }
}

impl From<TemplateStoreError> for AppError {
    fn from(e: TemplateStoreError) -> Self {
        match e {
            TemplateStoreError::NotFound(kind) => AppError::NotFound(format!(
                "No se encontró plantilla para el tipo de resolución: {kind}"
            )),
            TemplateStoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::ValidationGap(msg) => AppError::Validation(msg),
            GenerationError::Templates(e) => e.into(),
            GenerationError::Encode(e) => AppError::Internal(e.into()),
            GenerationError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl From<ArchiveError> for AppError {
    fn from(e: ArchiveError) -> Self {
        let message = e.to_string();
        match e {
            ArchiveError::NoFilenames => AppError::Validation(message),
            ArchiveError::NothingFound => AppError::NotFound(message),
            ArchiveError::Storage(e) => e.into(),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Session(e) => {
                tracing::error!("Session error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SESSION_ERROR",
                    "The upload session could not be accessed".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_gap_is_bad_request() {
        let err: AppError =
            GenerationError::ValidationGap("Debe seleccionar al menos un aprendiz".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let err: AppError = GenerationError::Templates(TemplateStoreError::NotFound(
            "PASANTIA".to_string(),
        ))
        .into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_summary_storage_failure_is_server_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: AppError = GenerationError::Storage(StorageError::Io(io)).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_archive_errors_map_to_client_statuses() {
        let empty: AppError = ArchiveError::NoFilenames.into();
        assert_eq!(empty.into_response().status(), StatusCode::BAD_REQUEST);
        let missing: AppError = ArchiveError::NothingFound.into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
        let traversal: AppError =
            ArchiveError::Storage(StorageError::InvalidName("../x".to_string())).into();
        assert_eq!(traversal.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err: AppError = StorageError::NotFound("x.html".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
