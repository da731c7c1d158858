//! One generate request against a staged upload, minus the HTTP and database edges.
//!
//! [`run_generation`] selects, validates, numbers and renders. The caller
//! persists [`GenerationRun::resolutions_to_record`] and then writes the
//! summary with [`GenerationRun::into_report`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::generation::batch::{
    prepare_batch, render_batch, GenerationError, GenerationResult, DEFAULT_START_NUMBER,
};
use crate::generation::format::OutputFormat;
use crate::generation::renderer::ResolutionRenderer;
use crate::generation::summary::{render_summary, BatchTotals};
use crate::ingest::session::{StagedTrainee, UploadSession};
use crate::models::template::ResolutionTemplate;
use crate::models::trainee::TraineeRecord;
use crate::records::NewResolution;
use crate::storage::{OutputStore, StorageHandle};
use crate::templates::TemplateStore;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Trainee database ids or document numbers.
    pub selected: Vec<String>,
    pub start_number: Option<u64>,
    pub prefix: Option<String>,
}

/// One finished batch: per-trainee results plus the summary document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<GenerationResult>,
    pub summary: StorageHandle,
    #[serde(flatten)]
    pub totals: BatchTotals,
}

/// Rendered batch whose summary is not written yet.
#[derive(Debug)]
pub struct GenerationRun<'s> {
    pub template: ResolutionTemplate,
    /// Index-aligned with `results`.
    pub staged: Vec<&'s StagedTrainee>,
    pub results: Vec<GenerationResult>,
    pub now: NaiveDateTime,
    format: OutputFormat,
}

impl GenerationRun<'_> {
    /// A row for every succeeded result whose trainee is registered.
    pub fn resolutions_to_record(&self) -> Vec<NewResolution<'_>> {
        self.staged
            .iter()
            .zip(&self.results)
            .filter_map(|(trainee, result)| {
                Some(NewResolution {
                    resolution_number: &result.resolution_number,
                    kind: self.template.kind.tag(),
                    trainee_id: trainee.id?,
                    body: &self.template.body,
                    file_path: result.output_path()?,
                })
            })
            .collect()
    }

    /// Writes the summary. Fails the batch when the summary cannot be stored.
    pub async fn into_report(self, output: &dyn OutputStore) -> Result<BatchReport, GenerationError> {
        let summary = render_summary(output, &self.results, self.now, self.format).await?;
        Ok(BatchReport {
            totals: BatchTotals::from_results(&self.results),
            results: self.results,
            summary,
        })
    }
}

pub async fn run_generation<'s>(
    templates: &dyn TemplateStore,
    renderer: &ResolutionRenderer,
    session: &'s UploadSession,
    request: &GenerateRequest,
    default_prefix: &str,
    now: NaiveDateTime,
) -> Result<GenerationRun<'s>, GenerationError> {
    let staged = session.select(&request.selected);
    if !request.selected.is_empty() && staged.is_empty() {
        return Err(GenerationError::ValidationGap(
            "No se encontraron los aprendices seleccionados".to_string(),
        ));
    }
    let trainees: Vec<TraineeRecord> = staged.iter().map(|s| s.record.clone()).collect();

    let start_number = request.start_number.unwrap_or(DEFAULT_START_NUMBER);
    let prefix = request.prefix.as_deref().unwrap_or(default_prefix);

    let template = prepare_batch(templates, &session.kind, &trainees, start_number).await?;

    info!(
        "Generating {} {} resolutions for upload {} from {prefix}{start_number}",
        trainees.len(),
        session.kind,
        session.upload_id
    );

    let results = render_batch(renderer, &trainees, &template, start_number, prefix, now).await;

    Ok(GenerationRun {
        template,
        staged,
        results,
        now,
        format: renderer.format(),
    })
}
