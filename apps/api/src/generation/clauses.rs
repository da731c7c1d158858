//! Splits a substituted resolution body into numbered articles.

use serde::{Deserialize, Serialize};

/// Literal word that opens every operative article.
pub const ARTICLE_MARKER: &str = "ARTÍCULO";

/// One operative article: a bold label (`ARTÍCULO 1°:`) and a justified body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub label: String,
    pub body: String,
}

impl Clause {
    fn from_text(text: &str) -> Self {
        match text.split_once(':') {
            Some((head, tail)) => Clause {
                label: format!("{}:", head.trim()),
                body: tail.trim().to_string(),
            },
            None => Clause {
                label: text.trim().to_string(),
                body: String::new(),
            },
        }
    }
}

/// Splits `text` on every occurrence of [`ARTICLE_MARKER`].
///
/// Text before the first marker is kept as its own clause (with the marker
/// prepended) so nothing is dropped. Whitespace-only segments produce no clause.
pub fn split_clauses(text: &str) -> Vec<Clause> {
    let mut clauses = Vec::new();

    for (i, segment) in text.split(ARTICLE_MARKER).enumerate() {
        if segment.trim().is_empty() {
            continue;
        }
        let raw = if i == 0 {
            format!("{ARTICLE_MARKER} {}", segment.trim())
        } else {
            format!("{ARTICLE_MARKER}{segment}")
        };
        clauses.push(Clause::from_text(&raw));
    }

    clauses
}
