//! Postgres persistence for trainees, bulk uploads and generated resolutions.

use sqlx::PgPool;

use crate::models::resolution::{BulkUploadRow, ResolutionRow};
use crate::models::trainee::TraineeRecord;

pub const RESOLUTION_STATUS_GENERATED: &str = "GENERADA";
pub const UPLOAD_STATUS_PROCESSING: &str = "PROCESANDO";
pub const UPLOAD_STATUS_COMPLETED: &str = "COMPLETADO";

const RECENT_UPLOADS_LIMIT: i64 = 50;
const RESOLUTIONS_LIMIT: i64 = 200;

/// Inserts a trainee unless the document number is already registered.
/// Returns the row id and whether a new row was created.
pub async fn upsert_trainee(pool: &PgPool, trainee: &TraineeRecord) -> Result<(i32, bool), sqlx::Error> {
    sqlx::query_as::<_, (i32, bool)>(
        r#"
        INSERT INTO trainees
            (document_number, document_type, given_names, family_names, program,
             cohort_code, birth_date, phone, email)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (document_number)
            DO UPDATE SET document_number = EXCLUDED.document_number
        RETURNING id, (xmax = 0) AS inserted
        "#,
    )
    .bind(&trainee.document_number)
    .bind(&trainee.document_type)
    .bind(&trainee.given_names)
    .bind(&trainee.family_names)
    .bind(&trainee.program)
    .bind(&trainee.cohort_code)
    .bind(&trainee.birth_date)
    .bind(&trainee.phone)
    .bind(&trainee.email)
    .fetch_one(pool)
    .await
}

pub async fn insert_bulk_upload(
    pool: &PgPool,
    file_name: &str,
    kind: &str,
    total_rows: i32,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO bulk_uploads (file_name, kind, total_rows, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(file_name)
    .bind(kind)
    .bind(total_rows)
    .bind(UPLOAD_STATUS_PROCESSING)
    .fetch_one(pool)
    .await
}

pub async fn complete_bulk_upload(
    pool: &PgPool,
    id: i32,
    succeeded_rows: i32,
    failed_rows: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE bulk_uploads
        SET succeeded_rows = $1, failed_rows = $2, status = $3
        WHERE id = $4
        "#,
    )
    .bind(succeeded_rows)
    .bind(failed_rows)
    .bind(UPLOAD_STATUS_COMPLETED)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub struct NewResolution<'a> {
    pub resolution_number: &'a str,
    pub kind: &'a str,
    pub trainee_id: i32,
    pub body: &'a str,
    pub file_path: &'a str,
}

pub async fn insert_resolution(pool: &PgPool, resolution: &NewResolution<'_>) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO resolutions (resolution_number, kind, trainee_id, body, status, file_path)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(resolution.resolution_number)
    .bind(resolution.kind)
    .bind(resolution.trainee_id)
    .bind(resolution.body)
    .bind(RESOLUTION_STATUS_GENERATED)
    .bind(resolution.file_path)
    .fetch_one(pool)
    .await
}

/// Newest first, optionally restricted to one trainee's document number.
pub async fn list_resolutions(
    pool: &PgPool,
    document_number: Option<&str>,
) -> Result<Vec<ResolutionRow>, sqlx::Error> {
    sqlx::query_as::<_, ResolutionRow>(
        r#"
        SELECT r.* FROM resolutions r
        JOIN trainees t ON t.id = r.trainee_id
        WHERE ($1::TEXT IS NULL OR t.document_number = $1)
        ORDER BY r.generated_at DESC, r.id DESC
        LIMIT $2
        "#,
    )
    .bind(document_number)
    .bind(RESOLUTIONS_LIMIT)
    .fetch_all(pool)
    .await
}

pub async fn list_bulk_uploads(pool: &PgPool) -> Result<Vec<BulkUploadRow>, sqlx::Error> {
    sqlx::query_as::<_, BulkUploadRow>(
        "SELECT * FROM bulk_uploads ORDER BY uploaded_at DESC, id DESC LIMIT $1",
    )
    .bind(RECENT_UPLOADS_LIMIT)
    .fetch_all(pool)
    .await
}
