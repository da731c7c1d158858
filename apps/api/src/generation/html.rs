//! Encodes a [`Document`] as a standalone, printable HTML page.

use std::fmt::Write;

use crate::generation::document::{Alignment, Block, Document, Paragraph, Run, Table};

pub const CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const EXTENSION: &str = "html";

const STYLE: &str = "@page { margin: 1in 1in 1in 1.2in; }\n\
body { font-family: Arial, Helvetica, sans-serif; font-size: 11pt; line-height: 1.35; }\n\
p { margin: 0; }\n\
table { border-collapse: collapse; width: 100%; }\n\
th, td { border: 1px solid #000; padding: 4px 6px; text-align: left; }";

pub fn encode(doc: &Document) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(&doc.title));
    let _ = writeln!(html, "<style>\n{STYLE}\n</style>\n</head>\n<body>");

    for block in &doc.blocks {
        match block {
            Block::Heading {
                level,
                text,
                alignment,
            } => {
                let tag = level.saturating_add(1).min(6);
                let _ = writeln!(
                    html,
                    "<h{tag} style=\"text-align: {}\">{}</h{tag}>",
                    align_css(*alignment),
                    escape(text)
                );
            }
            Block::Paragraph(p) => write_paragraph(&mut html, p),
            Block::Blank { lines } => {
                for _ in 0..*lines {
                    html.push_str("<p>&nbsp;</p>\n");
                }
            }
            Block::Table(t) => write_table(&mut html, t),
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn write_paragraph(html: &mut String, p: &Paragraph) {
    let mut style = format!("text-align: {}", align_css(p.alignment));
    if let Some(space) = p.space_after_pt {
        let _ = write!(style, "; margin-bottom: {space}pt");
    }
    let _ = write!(html, "<p style=\"{style}\">");
    for run in &p.runs {
        write_run(html, run);
    }
    html.push_str("</p>\n");
}

fn write_run(html: &mut String, run: &Run) {
    let text = escape(&run.text);
    let text = match run.size_pt {
        Some(size) => format!("<span style=\"font-size: {size}pt\">{text}</span>"),
        None => text,
    };
    if run.bold {
        let _ = write!(html, "<strong>{text}</strong>");
    } else {
        html.push_str(&text);
    }
}

fn write_table(html: &mut String, t: &Table) {
    html.push_str("<table>\n<thead><tr>");
    for cell in &t.header {
        let _ = write!(html, "<th>{}</th>", escape(cell));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &t.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}

fn align_css(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "justify",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_run_and_alignment() {
        let mut doc = Document::new("Prueba");
        doc.paragraph(
            Paragraph::new(
                Alignment::Justify,
                vec![Run::bold("ARTÍCULO 1°:"), Run::plain(" Otorgar.")],
            )
            .spaced(12),
        );
        let html = encode(&doc);
        assert!(html.contains(
            "<p style=\"text-align: justify; margin-bottom: 12pt\"><strong>ARTÍCULO 1°:</strong> Otorgar.</p>"
        ));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = Document::new("A & B");
        doc.paragraph(Paragraph::new(
            Alignment::Left,
            vec![Run::plain("<script>\"x\"</script>")],
        ));
        let html = encode(&doc);
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("&lt;script&gt;&quot;x&quot;&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_table_and_heading() {
        let mut doc = Document::new("Resumen");
        doc.push(Block::Heading {
            level: 0,
            text: "Resumen".to_string(),
            alignment: Alignment::Center,
        });
        doc.push(Block::Table(Table {
            header: vec!["Aprendiz".to_string(), "Estado".to_string()],
            rows: vec![vec!["ANA LOPEZ".to_string(), "FAILED".to_string()]],
        }));
        let html = encode(&doc);
        assert!(html.contains("<h1 style=\"text-align: center\">Resumen</h1>"));
        assert!(html.contains("<tr><td>ANA LOPEZ</td><td>FAILED</td></tr>"));
    }
}
