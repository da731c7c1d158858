//! Format-independent roster rules: required columns and per-row normalization.
//! The CSV and spreadsheet readers feed header and cell text through here.

use std::path::Path;

use tracing::debug;

use crate::ingest::{csv_roster, spreadsheet, IngestError};
use crate::models::trainee::TraineeRecord;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "numero_documento",
    "tipo_documento",
    "nombres",
    "apellidos",
    "programa",
    "ficha",
];

const DEFAULT_DOCUMENT_TYPE: &str = "CC";

/// Normalized trainees plus one `Fila <n>: <reason>` message per rejected row.
#[derive(Debug, Default)]
pub struct ParsedRoster {
    pub trainees: Vec<TraineeRecord>,
    pub row_errors: Vec<String>,
    /// Rows dropped for lacking a document number or a name.
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Csv,
    /// `.xlsx` and `.xls`; the workbook type is detected from content.
    Spreadsheet,
}

impl RosterFormat {
    /// Judged by extension, in any letter case.
    pub fn from_filename(file_name: &str) -> Result<Self, IngestError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx" | "xls") => Ok(Self::Spreadsheet),
            _ => Err(IngestError::UnsupportedFile(file_name.to_string())),
        }
    }
}

/// Parses an uploaded roster in whichever format its name announces.
///
/// Fails as a whole only when the file type is not allowed, the header row is
/// unreadable or it lacks required columns; every other problem is reported per row.
pub fn parse_roster_file(file_name: &str, data: &[u8]) -> Result<ParsedRoster, IngestError> {
    match RosterFormat::from_filename(file_name)? {
        RosterFormat::Csv => csv_roster::parse_csv(data),
        RosterFormat::Spreadsheet => spreadsheet::parse_spreadsheet(data),
    }
}

/// Applies the roster rules row by row against one header row.
pub struct RowNormalizer {
    headers: Vec<String>,
    roster: ParsedRoster,
}

impl RowNormalizer {
    pub fn new(headers: Vec<String>) -> Result<Self, IngestError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns(missing));
        }
        Ok(Self {
            headers,
            roster: ParsedRoster::default(),
        })
    }

    /// Records a row the reader could not decode.
    pub fn reject(&mut self, row_number: usize, reason: impl std::fmt::Display) {
        self.roster.row_errors.push(format!("Fila {row_number}: {reason}"));
    }

    /// `row_number` is the 1-based spreadsheet row, header included.
    pub fn push_row<S: AsRef<str>>(&mut self, row_number: usize, row: &[S]) {
        let field = |name: &str| -> Option<String> {
            self.headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| row.get(i))
                .map(|v| v.as_ref().trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (Some(document_number), Some(given_names), Some(family_names)) =
            (field("numero_documento"), field("nombres"), field("apellidos"))
        else {
            self.roster.skipped_rows += 1;
            return;
        };

        let (program, cohort_code) = match (field("programa"), field("ficha")) {
            (Some(program), Some(cohort)) => (program, cohort),
            (program, cohort) => {
                let empty: Vec<&str> = [("programa", program), ("ficha", cohort)]
                    .into_iter()
                    .filter(|(_, v)| v.is_none())
                    .map(|(name, _)| name)
                    .collect();
                self.roster.row_errors.push(format!(
                    "Fila {row_number}: campo requerido vacío: {}",
                    empty.join(", ")
                ));
                return;
            }
        };

        let trainee = TraineeRecord {
            document_type: field("tipo_documento")
                .unwrap_or_else(|| DEFAULT_DOCUMENT_TYPE.to_string()),
            document_number,
            given_names: given_names.to_uppercase(),
            family_names: family_names.to_uppercase(),
            program,
            cohort_code,
            birth_date: field("fecha_nacimiento"),
            phone: field("telefono"),
            email: field("email"),
        };
        self.roster.trainees.push(trainee);
    }

    pub fn finish(self) -> ParsedRoster {
        debug!(
            "Parsed roster: {} trainees, {} row errors, {} skipped",
            self.roster.trainees.len(),
            self.roster.row_errors.len(),
            self.roster.skipped_rows
        );
        self.roster
    }
}
