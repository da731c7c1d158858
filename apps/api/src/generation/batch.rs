//! Numbers and renders a selection of trainees.
//!
//! Per-trainee failures are converted to data (`GenerationOutcome::Failed`);
//! only the preconditions checked by `prepare_batch` stop a batch, and they do
//! so before anything is written.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::format::EncodeError;
use crate::generation::renderer::ResolutionRenderer;
use crate::models::template::{ResolutionKind, ResolutionTemplate};
use crate::models::trainee::TraineeRecord;
use crate::storage::StorageError;
use crate::templates::{TemplateStore, TemplateStoreError};

pub const DEFAULT_START_NUMBER: u64 = 1;
const SEQUENCE_WIDTH: usize = 5;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// A batch precondition does not hold; nothing was generated.
    #[error("{0}")]
    ValidationGap(String),

    #[error("template store error: {0}")]
    Templates(#[from] TemplateStoreError),

    /// The summary report could not be encoded.
    #[error("summary encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// The summary report could not be written.
    #[error("summary storage failed: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Succeeded,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Succeeded => "succeeded",
            GenerationStatus::Failed => "failed",
        }
    }
}

/// Exactly one of a path or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Succeeded { output_path: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub trainee_name: String,
    pub document_number: String,
    pub resolution_number: String,
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
}

impl GenerationResult {
    pub fn status(&self) -> GenerationStatus {
        match self.outcome {
            GenerationOutcome::Succeeded { .. } => GenerationStatus::Succeeded,
            GenerationOutcome::Failed { .. } => GenerationStatus::Failed,
        }
    }

    pub fn output_path(&self) -> Option<&str> {
        match &self.outcome {
            GenerationOutcome::Succeeded { output_path } => Some(output_path),
            GenerationOutcome::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == GenerationStatus::Succeeded
    }
}

/// `<prefix><sequence zero-padded to 5 digits>`, e.g. `15-00001`.
pub fn resolution_number(prefix: &str, sequence: u64) -> String {
    format!("{prefix}{sequence:0width$}", width = SEQUENCE_WIDTH)
}

/// Sequence number of the `offset`-th trainee, or `None` past `u64::MAX`.
fn sequence_at(start_number: u64, offset: usize) -> Option<u64> {
    u64::try_from(offset)
        .ok()
        .and_then(|offset| start_number.checked_add(offset))
}

/// Checks batch preconditions and resolves the template for `kind`.
pub async fn prepare_batch(
    templates: &dyn TemplateStore,
    kind: &ResolutionKind,
    selected: &[TraineeRecord],
    start_number: u64,
) -> Result<ResolutionTemplate, GenerationError> {
    if selected.is_empty() {
        return Err(GenerationError::ValidationGap(
            "Debe seleccionar al menos un aprendiz".to_string(),
        ));
    }

    // the last trainee takes start_number + len - 1
    if sequence_at(start_number, selected.len() - 1).is_none() {
        return Err(GenerationError::ValidationGap(format!(
            "El número inicial {start_number} no alcanza para {} aprendices",
            selected.len()
        )));
    }

    match templates.lookup(kind).await {
        Ok(template) => Ok(template),
        Err(TemplateStoreError::NotFound(tag)) => Err(GenerationError::ValidationGap(format!(
            "No se encontró plantilla para el tipo de resolución: {tag}"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Renders one resolution per trainee, numbered from `start_number` in list order.
///
/// Always returns one result per trainee, in input order. A trainee whose
/// number would exceed `u64::MAX` gets a failed result instead of a number.
pub async fn render_batch(
    renderer: &ResolutionRenderer,
    trainees: &[TraineeRecord],
    template: &ResolutionTemplate,
    start_number: u64,
    prefix: &str,
    now: NaiveDateTime,
) -> Vec<GenerationResult> {
    let mut results = Vec::with_capacity(trainees.len());

    for (offset, trainee) in trainees.iter().enumerate() {
        let Some(sequence) = sequence_at(start_number, offset) else {
            warn!(
                "No resolution number left for {} after {start_number}",
                trainee.document_number
            );
            results.push(GenerationResult {
                trainee_name: trainee.full_name(),
                document_number: trainee.document_number.clone(),
                resolution_number: String::new(),
                outcome: GenerationOutcome::Failed {
                    error: "número de resolución fuera de rango".to_string(),
                },
            });
            continue;
        };
        let number = resolution_number(prefix, sequence);

        let outcome = match renderer.render_one(trainee, template, &number, now).await {
            Ok(handle) => GenerationOutcome::Succeeded {
                output_path: handle.location,
            },
            Err(e) => {
                warn!(
                    "Resolution {number} for {} failed: {e}",
                    trainee.document_number
                );
                GenerationOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        results.push(GenerationResult {
            trainee_name: trainee.full_name(),
            document_number: trainee.document_number.clone(),
            resolution_number: number,
            outcome,
        });
    }

    let succeeded = results.iter().filter(|r| r.is_success()).count();
    info!(
        "Batch {}: {succeeded} of {} resolutions generated",
        template.kind,
        results.len()
    );

    results
}
