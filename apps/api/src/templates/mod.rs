//! Resolution templates, keyed by kind.
//!
//! Batches resolve their template through `TemplateStore::lookup`; `AppState`
//! carries an `Arc<dyn TemplateStore>` (Postgres in production).

pub mod defaults;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::template::{ResolutionKind, ResolutionTemplate};

#[derive(Debug, Error)]
pub enum TemplateStoreError {
    #[error("no active template for kind {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// First active template of `kind`.
    async fn lookup(&self, kind: &ResolutionKind) -> Result<ResolutionTemplate, TemplateStoreError>;

    /// Every active template of `kind`, oldest first.
    async fn list(&self, kind: &ResolutionKind)
        -> Result<Vec<ResolutionTemplate>, TemplateStoreError>;
}

/// Fixed in-memory template set.
#[cfg(test)]
pub struct StaticTemplateStore {
    templates: Vec<ResolutionTemplate>,
}

#[cfg(test)]
impl StaticTemplateStore {
    pub fn new(templates: Vec<ResolutionTemplate>) -> Self {
        Self { templates }
    }
}

#[cfg(test)]
#[async_trait]
impl TemplateStore for StaticTemplateStore {
    async fn lookup(&self, kind: &ResolutionKind) -> Result<ResolutionTemplate, TemplateStoreError> {
        self.templates
            .iter()
            .find(|t| &t.kind == kind)
            .cloned()
            .ok_or_else(|| TemplateStoreError::NotFound(kind.to_string()))
    }

    async fn list(
        &self,
        kind: &ResolutionKind,
    ) -> Result<Vec<ResolutionTemplate>, TemplateStoreError> {
        Ok(self
            .templates
            .iter()
            .filter(|t| &t.kind == kind)
            .cloned()
            .collect())
    }
}
