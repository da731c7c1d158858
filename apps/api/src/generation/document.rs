//! Block model for rendered documents. Composition builds a `Document`; the
//! encoders in `html.rs` and `docx.rs` are the only places that know an output format.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// A span of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub size_pt: Option<u8>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            size_pt: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn sized(mut self, size_pt: u8) -> Self {
        self.size_pt = Some(size_pt);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Alignment,
    pub space_after_pt: Option<u8>,
}

impl Paragraph {
    pub fn new(alignment: Alignment, runs: Vec<Run>) -> Self {
        Self {
            runs,
            alignment,
            space_after_pt: None,
        }
    }

    pub fn spaced(mut self, space_after_pt: u8) -> Self {
        self.space_after_pt = Some(space_after_pt);
        self
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Level 0 is the document title.
    Heading {
        level: u8,
        text: String,
        alignment: Alignment,
    },
    Paragraph(Paragraph),
    /// Vertical spacing, `lines` empty lines tall.
    Blank { lines: u8 },
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn blank(&mut self) {
        self.blank_lines(1);
    }

    pub fn blank_lines(&mut self, lines: u8) {
        self.blocks.push(Block::Blank { lines });
    }

    #[cfg(test)]
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }
}
