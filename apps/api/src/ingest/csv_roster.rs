//! CSV roster reader.

use crate::ingest::roster::{ParsedRoster, RowNormalizer};
use crate::ingest::IngestError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn parse_csv(data: &[u8]) -> Result<ParsedRoster, IngestError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut normalizer = RowNormalizer::new(headers)?;

    for (idx, result) in reader.records().enumerate() {
        // header is spreadsheet row 1
        let row_number = idx + 2;
        match result {
            Ok(row) => {
                let cells: Vec<&str> = row.iter().collect();
                normalizer.push_row(row_number, &cells);
            }
            Err(e) => normalizer.reject(row_number, e),
        }
    }

    Ok(normalizer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "numero_documento,tipo_documento,nombres,apellidos,programa,ficha,email";

    #[test]
    fn test_rows_are_normalized() {
        let data = format!(
            "{HEADER}\n 1052 ,TI, ana maría ,lópez,Topografía,2567,ana@example.com\n2001,,luis,ruiz,Minería,999,\n"
        );
        let roster = parse_csv(data.as_bytes()).unwrap();

        assert!(roster.row_errors.is_empty());
        assert_eq!(roster.trainees.len(), 2);

        let ana = &roster.trainees[0];
        assert_eq!(ana.document_number, "1052");
        assert_eq!(ana.document_type, "TI");
        assert_eq!(ana.given_names, "ANA MARÍA");
        assert_eq!(ana.family_names, "LÓPEZ");
        assert_eq!(ana.email.as_deref(), Some("ana@example.com"));
        assert_eq!(ana.phone, None);

        let luis = &roster.trainees[1];
        assert_eq!(luis.document_type, "CC");
        assert_eq!(luis.email, None);
    }

    #[test]
    fn test_missing_columns_are_reported_together() {
        let err = parse_csv(b"numero_documento,nombres,apellidos\n1,A,B\n").unwrap_err();
        match err {
            IngestError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["tipo_documento", "programa", "ficha"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_rows_without_identity_are_dropped_silently() {
        let data = format!("{HEADER}\n,CC,ana,lopez,X,1,\n3,CC,,lopez,X,1,\n4,CC,juan,perez,X,1,\n");
        let roster = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(roster.trainees.len(), 1);
        assert_eq!(roster.skipped_rows, 2);
        assert!(roster.row_errors.is_empty());
    }

    #[test]
    fn test_incomplete_rows_are_reported_with_spreadsheet_row() {
        let data = format!("{HEADER}\n1,CC,ana,lopez,X,1,\n2,CC,luis,ruiz,,,\n3,CC,juan\n");
        let roster = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(roster.trainees.len(), 1);
        assert_eq!(roster.row_errors.len(), 2);
        assert_eq!(
            roster.row_errors[0],
            "Fila 3: campo requerido vacío: programa, ficha"
        );
        assert!(roster.row_errors[1].starts_with("Fila 4: "));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let data = format!("\u{feff}{HEADER}\n1,CC,ana,lopez,X,1,\n");
        let roster = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(roster.trainees.len(), 1);
    }
}
