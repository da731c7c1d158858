//! Output formats a composed [`Document`] can be written as.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::document::Document;
use crate::generation::{docx, html};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("docx encoding failed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Docx,
    Html,
}

impl OutputFormat {
    /// Case-insensitive `docx` / `html`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    /// Format of a stored file, judged by its extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        Self::from_name(extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => docx::EXTENSION,
            Self::Html => html::EXTENSION,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Docx => docx::CONTENT_TYPE,
            Self::Html => html::CONTENT_TYPE,
        }
    }

    pub fn encode(self, doc: &Document) -> Result<Bytes, EncodeError> {
        match self {
            Self::Docx => docx::encode(doc).map(Bytes::from),
            Self::Html => Ok(Bytes::from(html::encode(doc))),
        }
    }
}
