//! Batch summary report.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::generation::batch::{GenerationError, GenerationResult};
use crate::generation::document::{Alignment, Block, Document, Paragraph, Run, Table};
use crate::generation::format::OutputFormat;
use crate::storage::{OutputStore, StorageHandle};

const TITLE: &str = "Resumen de Generación de Resoluciones";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchTotals {
    pub fn from_results(results: &[GenerationResult]) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            total,
            succeeded,
            failed: total - succeeded,
        }
    }
}

pub fn summary_filename(now: NaiveDateTime, format: OutputFormat) -> String {
    format!(
        "resumen_generacion_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

pub fn compose_summary(results: &[GenerationResult], now: NaiveDateTime) -> Document {
    let totals = BatchTotals::from_results(results);
    let mut doc = Document::new(TITLE);

    doc.push(Block::Heading {
        level: 0,
        text: TITLE.to_string(),
        alignment: Alignment::Center,
    });

    let lines = [
        format!("Fecha de generación: {}", now.format("%d/%m/%Y %H:%M:%S")),
        format!("Total de resoluciones: {}", totals.total),
        format!("Generadas exitosamente: {}", totals.succeeded),
        format!("Fallidas: {}", totals.failed),
    ];
    for line in lines {
        doc.paragraph(Paragraph::new(Alignment::Left, vec![Run::plain(line)]));
    }

    doc.push(Block::Heading {
        level: 1,
        text: "Detalle de Resoluciones".to_string(),
        alignment: Alignment::Left,
    });

    doc.push(Block::Table(Table {
        header: ["Aprendiz", "Documento", "No. Resolución", "Estado"]
            .map(String::from)
            .to_vec(),
        rows: results
            .iter()
            .map(|r| {
                vec![
                    r.trainee_name.clone(),
                    r.document_number.clone(),
                    r.resolution_number.clone(),
                    r.status().as_str().to_uppercase(),
                ]
            })
            .collect(),
    }));

    doc
}

/// Writes the batch summary. A failure here fails the whole batch operation.
pub async fn render_summary(
    store: &dyn OutputStore,
    results: &[GenerationResult],
    now: NaiveDateTime,
    format: OutputFormat,
) -> Result<StorageHandle, GenerationError> {
    let doc = compose_summary(results, now);
    let content = format.encode(&doc)?;
    let handle = store
        .write(&summary_filename(now, format), content, format.content_type())
        .await?;
    Ok(handle)
}
