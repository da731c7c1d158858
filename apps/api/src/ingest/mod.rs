// Roster ingestion: CSV / Excel upload → normalized trainees → staged upload session.
// Staged sessions live in Redis; generation reads them back by upload id.

pub mod csv_roster;
pub mod handlers;
pub mod roster;
pub mod session;
pub mod spreadsheet;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Tipo de archivo no permitido: {0}. Use Excel (.xlsx, .xls) o CSV (.csv)")]
    UnsupportedFile(String),

    #[error("Faltan columnas requeridas: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No se pudo leer el archivo CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No se pudo leer el archivo Excel: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("El archivo Excel no contiene hojas")]
    EmptyWorkbook,
}
