use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResolutionRow {
    pub id: i32,
    pub resolution_number: String,
    pub kind: String,
    pub trainee_id: i32,
    pub body: String,
    pub generated_at: DateTime<Utc>,
    pub status: String,
    pub file_path: Option<String>,
}

/// One uploaded roster file ("carga masiva").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BulkUploadRow {
    pub id: i32,
    pub file_name: String,
    pub kind: String,
    pub total_rows: i32,
    pub succeeded_rows: i32,
    pub failed_rows: i32,
    pub uploaded_at: DateTime<Utc>,
    pub status: String,
}
