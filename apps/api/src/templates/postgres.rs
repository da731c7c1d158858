use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::template::{ResolutionKind, ResolutionTemplate, TemplateRow};
use crate::templates::{TemplateStore, TemplateStoreError};

pub struct PgTemplateStore {
    pool: PgPool,
}

impl PgTemplateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn lookup(&self, kind: &ResolutionKind) -> Result<ResolutionTemplate, TemplateStoreError> {
        let row = sqlx::query_as::<_, TemplateRow>(
            "SELECT * FROM resolution_templates WHERE kind = $1 AND active = TRUE ORDER BY id LIMIT 1",
        )
        .bind(kind.tag())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ResolutionTemplate::from)
            .ok_or_else(|| TemplateStoreError::NotFound(kind.to_string()))
    }

    async fn list(
        &self,
        kind: &ResolutionKind,
    ) -> Result<Vec<ResolutionTemplate>, TemplateStoreError> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            "SELECT * FROM resolution_templates WHERE kind = $1 AND active = TRUE ORDER BY id",
        )
        .bind(kind.tag())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ResolutionTemplate::from).collect())
    }
}
