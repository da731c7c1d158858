use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Resolution type tag. Unknown tags are carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResolutionKind {
    /// `APOYO_SOSTENIMIENTO`
    Sustenance,
    /// `TRANSPORTE`
    Transport,
    /// `MONITORIA`
    Monitorship,
    Other(String),
}

impl ResolutionKind {
    pub const SUSTENANCE_TAG: &'static str = "APOYO_SOSTENIMIENTO";
    pub const TRANSPORT_TAG: &'static str = "TRANSPORTE";
    pub const MONITORSHIP_TAG: &'static str = "MONITORIA";

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            Self::SUSTENANCE_TAG => Self::Sustenance,
            Self::TRANSPORT_TAG => Self::Transport,
            Self::MONITORSHIP_TAG => Self::Monitorship,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Sustenance => Self::SUSTENANCE_TAG,
            Self::Transport => Self::TRANSPORT_TAG,
            Self::Monitorship => Self::MONITORSHIP_TAG,
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ResolutionKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<ResolutionKind> for String {
    fn from(kind: ResolutionKind) -> Self {
        kind.tag().to_string()
    }
}

impl std::fmt::Display for ResolutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A resolution template as handed to the generation core.
///
/// `variables` is informational: substitution neither requires nor checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionTemplate {
    pub name: String,
    pub kind: ResolutionKind,
    pub description: String,
    pub body: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateRow {
    pub id: i32,
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
    pub body: String,
    pub variables: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl From<TemplateRow> for ResolutionTemplate {
    fn from(row: TemplateRow) -> Self {
        Self {
            name: row.name,
            kind: ResolutionKind::from_tag(&row.kind),
            description: row.description.unwrap_or_default(),
            body: row.body,
            variables: row.variables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_parse_to_named_variants() {
        assert_eq!(
            ResolutionKind::from_tag("APOYO_SOSTENIMIENTO"),
            ResolutionKind::Sustenance
        );
        assert_eq!(ResolutionKind::from_tag("TRANSPORTE"), ResolutionKind::Transport);
        assert_eq!(ResolutionKind::from_tag(" MONITORIA "), ResolutionKind::Monitorship);
    }

    #[test]
    fn test_unknown_tag_is_kept_verbatim() {
        let kind = ResolutionKind::from_tag("PASANTIA");
        assert_eq!(kind, ResolutionKind::Other("PASANTIA".to_string()));
        assert_eq!(kind.tag(), "PASANTIA");
    }

    #[test]
    fn test_kind_serializes_as_plain_tag() {
        let json = serde_json::to_string(&ResolutionKind::Transport).unwrap();
        assert_eq!(json, "\"TRANSPORTE\"");
        let back: ResolutionKind = serde_json::from_str("\"MONITORIA\"").unwrap();
        assert_eq!(back, ResolutionKind::Monitorship);
    }

    #[test]
    fn test_row_without_description_maps_to_empty_string() {
        let row = TemplateRow {
            id: 1,
            name: "Otra".to_string(),
            kind: "PASANTIA".to_string(),
            description: None,
            body: "ARTÍCULO 1°: Texto.".to_string(),
            variables: vec![],
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        };
        let template = ResolutionTemplate::from(row);
        assert_eq!(template.description, "");
        assert_eq!(template.kind, ResolutionKind::Other("PASANTIA".to_string()));
    }
}
