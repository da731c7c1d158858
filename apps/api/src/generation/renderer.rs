//! Renders one trainee's resolution and writes it to the output store.
//!
//! Flow: GenerationContext → substitute → split_clauses → compose_resolution
//!       → OutputFormat::encode → OutputStore::write.

use std::sync::Arc;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::debug;

use crate::generation::clauses::split_clauses;
use crate::generation::composer::compose_resolution;
use crate::generation::document::Document;
use crate::generation::format::{EncodeError, OutputFormat};
use crate::generation::placeholders::{remaining_placeholders, GenerationContext};
use crate::generation::profile::OrganizationProfile;
use crate::models::template::ResolutionTemplate;
use crate::models::trainee::TraineeRecord;
use crate::storage::{OutputStore, StorageError, StorageHandle};

const FILENAME_PREFIX: &str = "resolucion";

/// Failure while producing one document. Recorded per trainee, never fatal to a batch.
#[derive(Debug, Error)]
pub enum RenderFailure {
    #[error("cannot derive an output filename: {0}")]
    Filename(String),

    #[error("encoding failure: {0}")]
    Encode(#[from] EncodeError),

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct ResolutionRenderer {
    profile: Arc<OrganizationProfile>,
    store: Arc<dyn OutputStore>,
    format: OutputFormat,
}

impl ResolutionRenderer {
    /// Writes HTML until [`with_format`](Self::with_format) says otherwise.
    pub fn new(profile: Arc<OrganizationProfile>, store: Arc<dyn OutputStore>) -> Self {
        Self {
            profile,
            store,
            format: OutputFormat::Html,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Renders and stores one resolution, returning where it was written.
    pub async fn render_one(
        &self,
        trainee: &TraineeRecord,
        template: &ResolutionTemplate,
        resolution_number: &str,
        now: NaiveDateTime,
    ) -> Result<StorageHandle, RenderFailure> {
        let filename =
            resolution_filename(resolution_number, &trainee.document_number, self.format)?;
        let doc = self.compose(trainee, template, resolution_number, now);
        let content = self.format.encode(&doc)?;

        debug!(
            "Rendered resolution {resolution_number} for {} ({} bytes)",
            trainee.document_number,
            content.len()
        );

        let handle = self
            .store
            .write(&filename, content, self.format.content_type())
            .await?;
        Ok(handle)
    }

    fn compose(
        &self,
        trainee: &TraineeRecord,
        template: &ResolutionTemplate,
        resolution_number: &str,
        now: NaiveDateTime,
    ) -> Document {
        let context = GenerationContext::build(trainee, resolution_number, now, &self.profile.city);
        let body = context.substitute(&template.body);
        let unresolved = remaining_placeholders(&body);
        if !unresolved.is_empty() {
            debug!("Template {} left unresolved placeholders: {unresolved:?}", template.name);
        }
        let clauses = split_clauses(&body);
        compose_resolution(&self.profile, template, &context, &clauses)
    }
}

/// `resolucion_<number>_<document>.<ext>`, with separators replaced by `_`.
pub fn resolution_filename(
    resolution_number: &str,
    document_number: &str,
    format: OutputFormat,
) -> Result<String, RenderFailure> {
    let number = flatten_segment(resolution_number);
    let document = flatten_segment(document_number);
    if number.is_empty() || document.is_empty() {
        return Err(RenderFailure::Filename(format!(
            "resolution number {resolution_number:?} / document number {document_number:?}"
        )));
    }
    Ok(format!(
        "{FILENAME_PREFIX}_{number}_{document}.{}",
        format.extension()
    ))
}

/// Maps every character that is not alphanumeric to `_` after trimming.
fn flatten_segment(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
