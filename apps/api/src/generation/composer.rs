//! Assembles the full resolution document, section by section.
//!
//! Block order is fixed: letterhead, title, subtitle, format code, issuing
//! authority, legal grounds, CONSIDERANDO, RESUELVE, articles, closing block.

use crate::generation::clauses::Clause;
use crate::generation::document::{Alignment, Document, Paragraph, Run};
use crate::generation::placeholders::GenerationContext;
use crate::generation::profile::OrganizationProfile;
use crate::models::template::{ResolutionKind, ResolutionTemplate};

const FALLBACK_SUBTITLE: &str = "Resolución administrativa";
const SIGNATURE_LINE_WIDTH: usize = 50;

/// Subtitle lead and extra considerations of a known kind.
struct KindWording {
    subtitle_lead: &'static str,
    considerations: [&'static str; 2],
}

fn kind_wording(kind: &ResolutionKind) -> Option<KindWording> {
    match kind {
        ResolutionKind::Sustenance => Some(KindWording {
            subtitle_lead: "Por la cual se otorga apoyo de sostenimiento al aprendiz",
            considerations: [
                "Que el aprendiz cumple con los requisitos establecidos para el otorgamiento del apoyo de sostenimiento.",
                "Que existe disponibilidad presupuestal para atender la solicitud.",
            ],
        }),
        ResolutionKind::Transport => Some(KindWording {
            subtitle_lead: "Por la cual se otorga apoyo de transporte al aprendiz",
            considerations: [
                "Que se requiere facilitar el desplazamiento del aprendiz hacia el centro de formación.",
                "Que el apoyo de transporte contribuye a la permanencia en el programa formativo.",
            ],
        }),
        ResolutionKind::Monitorship => Some(KindWording {
            subtitle_lead: "Por la cual se designa como monitor académico al aprendiz",
            considerations: [
                "Que el aprendiz ha demostrado excelencia académica y competencias para ejercer monitoria.",
                "Que la monitoria académica fortalece el proceso de formación integral.",
            ],
        }),
        ResolutionKind::Other(_) => None,
    }
}

/// Subtitle line. Unknown kinds fall back to the template description.
pub fn subtitle(template: &ResolutionTemplate, full_name: &str) -> String {
    match kind_wording(&template.kind) {
        Some(wording) => format!("{} {full_name}", wording.subtitle_lead),
        None if !template.description.trim().is_empty() => template.description.clone(),
        None => FALLBACK_SUBTITLE.to_string(),
    }
}

/// Base considerations followed by the kind-specific ones (none for unknown kinds).
pub fn considerations(profile: &OrganizationProfile, kind: &ResolutionKind) -> Vec<String> {
    let mut all = profile.base_considerations.clone();
    if let Some(wording) = kind_wording(kind) {
        all.extend(wording.considerations.iter().map(|s| s.to_string()));
    }
    all
}

pub fn compose_resolution(
    profile: &OrganizationProfile,
    template: &ResolutionTemplate,
    context: &GenerationContext,
    clauses: &[Clause],
) -> Document {
    let full_name = context.full_name();
    let title = format!(
        "RESOLUCIÓN No. {} DE {}",
        context.resolution_number, context.year
    );
    let mut doc = Document::new(title.clone());

    // Letterhead
    doc.paragraph(centered(Run::bold(&profile.organization_name).sized(14)));
    doc.paragraph(centered(Run::bold(&profile.center_line).sized(12)));
    doc.blank();

    doc.paragraph(centered(Run::bold(title).sized(14)));
    doc.paragraph(centered(
        Run::plain(subtitle(template, &full_name)).sized(11),
    ));

    doc.blank();
    doc.paragraph(Paragraph::new(
        Alignment::Right,
        vec![Run::plain(&profile.format_code).sized(10)],
    ));

    doc.paragraph(centered(Run::bold(&profile.issuing_authority).sized(12)));

    doc.blank();
    doc.paragraph(justified(vec![Run::plain(&profile.legal_grounds)]));

    doc.blank();
    doc.paragraph(Paragraph::new(
        Alignment::Left,
        vec![Run::bold("CONSIDERANDO:").sized(12)],
    ));
    for consideration in considerations(profile, &template.kind) {
        doc.paragraph(justified(vec![Run::plain(consideration)]).spaced(6));
    }

    doc.blank();
    doc.paragraph(Paragraph::new(
        Alignment::Left,
        vec![Run::bold("RESUELVE:").sized(12)],
    ));
    for clause in clauses {
        let mut runs = vec![Run::bold(&clause.label)];
        if !clause.body.is_empty() {
            runs.push(Run::plain(format!(" {}", clause.body)));
        }
        doc.paragraph(justified(runs).spaced(12));
    }

    push_closing(&mut doc, profile, context);
    doc
}

fn push_closing(doc: &mut Document, profile: &OrganizationProfile, context: &GenerationContext) {
    doc.blank();
    doc.paragraph(centered(Run::bold("COMUNÍQUESE Y CÚMPLASE").sized(12)));
    doc.paragraph(centered(Run::plain(format!(
        "Dado en {}, a los {} días del mes de {} de {}",
        context.city, context.day, context.month, context.year,
    ))));

    doc.blank_lines(3);
    doc.paragraph(centered(Run::plain("_".repeat(SIGNATURE_LINE_WIDTH))));
    doc.paragraph(centered(Run::bold(&profile.signatory_name)));
    doc.paragraph(centered(Run::plain(&profile.signatory_title)));

    doc.blank_lines(2);
    for reviewer in &profile.reviewers {
        doc.paragraph(Paragraph::new(Alignment::Left, vec![Run::plain(reviewer)]).spaced(6));
    }
}

fn centered(run: Run) -> Paragraph {
    Paragraph::new(Alignment::Center, vec![run])
}

fn justified(runs: Vec<Run>) -> Paragraph {
    Paragraph::new(Alignment::Justify, runs)
}
