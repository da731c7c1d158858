use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::generation::renderer::ResolutionRenderer;
use crate::ingest::session::SessionStore;
use crate::storage::OutputStore;
use crate::templates::TemplateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Staged uploads and batch results (Redis).
    pub sessions: SessionStore,
    /// Pluggable template source. Default: PgTemplateStore.
    pub templates: Arc<dyn TemplateStore>,
    /// Local directory or S3, chosen at startup from `S3_BUCKET`.
    pub output: Arc<dyn OutputStore>,
    pub renderer: ResolutionRenderer,
    pub config: Config,
}
