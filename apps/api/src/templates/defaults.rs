//! Built-in templates, inserted on first start when the table is empty.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::models::template::{ResolutionKind, ResolutionTemplate};

const SEEDED_BY: &str = "SISTEMA";

const SUSTENANCE_BODY: &str = "ARTÍCULO 1°: Otorgar apoyo de sostenimiento FIC al aprendiz {nombres} {apellidos}, identificado con {tipo_documento} No. {numero_documento}, quien se encuentra matriculado en el programa de formación {programa}, ficha {ficha}, del Centro Minero SENA Regional Boyacá.

ARTÍCULO 2°: El presente apoyo se otorga por el período académico correspondiente al programa de formación matriculado, de conformidad con la normatividad vigente y los recursos presupuestales disponibles.

ARTÍCULO 3°: La presente resolución rige a partir de la fecha de su expedición.";

const TRANSPORT_BODY: &str = "ARTÍCULO 1°: Otorgar apoyo de transporte al aprendiz {nombres} {apellidos}, identificado con {tipo_documento} No. {numero_documento}, matriculado en el programa {programa}, ficha {ficha}.

ARTÍCULO 2°: El apoyo se otorga para facilitar el desplazamiento desde su lugar de residencia hasta el Centro de Formación y viceversa, durante el período de formación.

ARTÍCULO 3°: La presente resolución rige a partir de la fecha de su expedición.";

const MONITORSHIP_BODY: &str = "ARTÍCULO 1°: Designar como monitor académico al aprendiz {nombres} {apellidos}, identificado con {tipo_documento} No. {numero_documento}, del programa {programa}, ficha {ficha}.

ARTÍCULO 2°: Las actividades de monitoria se desarrollarán bajo la supervisión del Coordinador Académico y tendrán una duración de cuatro (4) meses.

ARTÍCULO 3°: El monitor recibirá un estímulo económico mensual equivalente al 50% del salario mínimo legal vigente.

ARTÍCULO 4°: La presente resolución rige a partir de la fecha de su expedición.";

const BASE_VARIABLES: &[&str] = &[
    "numero_resolucion",
    "nombres",
    "apellidos",
    "tipo_documento",
    "numero_documento",
    "programa",
    "ficha",
];

fn variables(extra: &[&str]) -> Vec<String> {
    BASE_VARIABLES
        .iter()
        .chain(extra)
        .map(|v| v.to_string())
        .collect()
}

pub fn default_templates() -> Vec<ResolutionTemplate> {
    vec![
        ResolutionTemplate {
            name: "Resolución de Apoyo de Sostenimiento FIC".to_string(),
            kind: ResolutionKind::Sustenance,
            description: "Resolución para otorgar apoyo de sostenimiento del Fondo de la Industria de la Construcción".to_string(),
            body: SUSTENANCE_BODY.to_string(),
            variables: variables(&["ciudad", "dia", "mes", "año"]),
        },
        ResolutionTemplate {
            name: "Resolución de Apoyo de Transporte".to_string(),
            kind: ResolutionKind::Transport,
            description: "Resolución para otorgar apoyo de transporte a aprendices".to_string(),
            body: TRANSPORT_BODY.to_string(),
            variables: variables(&[]),
        },
        ResolutionTemplate {
            name: "Resolución de Monitoria Académica".to_string(),
            kind: ResolutionKind::Monitorship,
            description: "Resolución para designar monitores académicos por excelencia".to_string(),
            body: MONITORSHIP_BODY.to_string(),
            variables: variables(&[]),
        },
    ]
}

/// Inserts the default templates if `resolution_templates` is empty.
/// Returns how many were inserted.
pub async fn seed_default_templates(pool: &PgPool) -> Result<usize> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resolution_templates")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let templates = default_templates();
    let mut tx = pool.begin().await?;
    for template in &templates {
        sqlx::query(
            r#"
            INSERT INTO resolution_templates (name, kind, description, body, variables, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&template.name)
        .bind(template.kind.tag())
        .bind(&template.description)
        .bind(&template.body)
        .bind(&template.variables)
        .bind(SEEDED_BY)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!("Inserted {} default resolution templates", templates.len());
    Ok(templates.len())
}
