//! Excel roster reader (`.xlsx` / `.xls`). Only the first worksheet is read.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::ingest::roster::{ParsedRoster, RowNormalizer};
use crate::ingest::IngestError;

pub fn parse_spreadsheet(data: &[u8]) -> Result<ParsedRoster, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyWorkbook)??;

    // the used range may start below row 1
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_text(cell).trim().to_string()).collect())
        .unwrap_or_default();
    let mut normalizer = RowNormalizer::new(headers)?;

    for (idx, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        normalizer.push_row(first_row + idx + 2, &cells);
    }

    Ok(normalizer.finish())
}

/// Whole-number floats lose their `.0`, so `1052.0` reads as `1052`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
