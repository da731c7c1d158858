//! Encodes a [`Document`] as a Word (`.docx`) package.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, LineSpacing, Paragraph as DocxParagraph, Run as DocxRun,
    Table as DocxTable, TableCell, TableRow,
};

use crate::generation::document::{Alignment, Block, Document, Paragraph, Run, Table};
use crate::generation::format::EncodeError;

pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const EXTENSION: &str = "docx";

/// Title, section and sub-section heading sizes.
const HEADING_SIZES_PT: [usize; 3] = [16, 14, 12];
const BODY_SIZE_PT: usize = 11;

pub fn encode(doc: &Document) -> Result<Vec<u8>, EncodeError> {
    let mut docx = Docx::new();

    for block in &doc.blocks {
        docx = match block {
            Block::Heading {
                level,
                text,
                alignment,
            } => {
                let size = HEADING_SIZES_PT[usize::from(*level).min(HEADING_SIZES_PT.len() - 1)];
                docx.add_paragraph(
                    DocxParagraph::new()
                        .add_run(text_run(text).bold().size(size * 2))
                        .align(align(*alignment)),
                )
            }
            Block::Paragraph(p) => docx.add_paragraph(paragraph(p)),
            Block::Blank { lines } => {
                (0..*lines).fold(docx, |docx, _| docx.add_paragraph(DocxParagraph::new()))
            }
            Block::Table(t) => docx.add_table(table(t)),
        };
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| EncodeError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}

fn paragraph(p: &Paragraph) -> DocxParagraph {
    let mut out = p
        .runs
        .iter()
        .fold(DocxParagraph::new(), |out, r| out.add_run(run(r)))
        .align(align(p.alignment));
    if let Some(space) = p.space_after_pt {
        // twentieths of a point
        out = out.line_spacing(LineSpacing::new().after(u32::from(space) * 20));
    }
    out
}

fn run(r: &Run) -> DocxRun {
    let size = r.size_pt.map_or(BODY_SIZE_PT, usize::from);
    let out = text_run(&r.text).size(size * 2);
    if r.bold {
        out.bold()
    } else {
        out
    }
}

/// One run, with embedded newlines as line breaks.
fn text_run(text: &str) -> DocxRun {
    text.split('\n')
        .enumerate()
        .fold(DocxRun::new(), |out, (i, line)| {
            let out = if i > 0 {
                out.add_break(BreakType::TextWrapping)
            } else {
                out
            };
            out.add_text(line)
        })
}

fn table(t: &Table) -> DocxTable {
    let cell = |text: &str, bold: bool| {
        let r = text_run(text).size(BODY_SIZE_PT * 2);
        let r = if bold { r.bold() } else { r };
        TableCell::new().add_paragraph(DocxParagraph::new().add_run(r))
    };

    let mut rows = vec![TableRow::new(
        t.header.iter().map(|h| cell(h, true)).collect(),
    )];
    rows.extend(
        t.rows
            .iter()
            .map(|row| TableRow::new(row.iter().map(|c| cell(c, false)).collect())),
    );
    DocxTable::new(rows)
}

fn align(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}
