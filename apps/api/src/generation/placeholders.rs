//! Builds the substitution context for one trainee and
//! replaces `{key}` tokens in template text.
//!
//! Substitution is a single left-to-right pass: substituted values are never
//! re-scanned, and tokens whose key is not in the context are left verbatim.

use chrono::{Datelike, NaiveDateTime};

use crate::models::trainee::TraineeRecord;

/// Spanish month names, indexed 1–12. Index 0 is reserved and never valid.
const MONTHS: [&str; 13] = [
    "",
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Returns the Spanish month name for `month` in 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    match month {
        1..=12 => Some(MONTHS[month as usize]),
        _ => None,
    }
}

/// Resolved values for one trainee/resolution pair.
///
/// Template text reaches these through `{key}` tokens (see [`GenerationContext::get`]);
/// the composer reads the fields directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    pub resolution_number: String,
    pub given_names: String,
    pub family_names: String,
    pub document_type: String,
    pub document_number: String,
    pub program: String,
    pub cohort_code: String,
    pub city: String,
    pub day: String,
    pub month: &'static str,
    pub year: String,
    pub full_date: String,
}

impl GenerationContext {
    /// Every key `get` resolves.
    pub const KEYS: [&'static str; 12] = [
        "numero_resolucion",
        "nombres",
        "apellidos",
        "tipo_documento",
        "numero_documento",
        "programa",
        "ficha",
        "ciudad",
        "dia",
        "mes",
        "año",
        "fecha_completa",
    ];

    pub fn build(
        trainee: &TraineeRecord,
        resolution_number: &str,
        now: NaiveDateTime,
        city: &str,
    ) -> Self {
        // chrono guarantees month() in 1..=12
        let month = month_name(now.month()).unwrap_or_default();
        let day = now.day().to_string();
        let year = now.year().to_string();
        let full_date = format!("{day} de {month} de {year}");

        Self {
            resolution_number: resolution_number.to_string(),
            given_names: trainee.given_names.clone(),
            family_names: trainee.family_names.clone(),
            document_type: trainee.document_type.clone(),
            document_number: trainee.document_number.clone(),
            program: trainee.program.clone(),
            cohort_code: trainee.cohort_code.clone(),
            city: city.to_string(),
            day,
            month,
            year,
            full_date,
        }
    }

    /// Value for a template token key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "numero_resolucion" => &self.resolution_number,
            "nombres" => &self.given_names,
            "apellidos" => &self.family_names,
            "tipo_documento" => &self.document_type,
            "numero_documento" => &self.document_number,
            "programa" => &self.program,
            "ficha" => &self.cohort_code,
            "ciudad" => &self.city,
            "dia" => &self.day,
            "mes" => self.month,
            "año" => &self.year,
            "fecha_completa" => &self.full_date,
            _ => return None,
        };
        Some(value)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_names, self.family_names)
    }

    /// Replaces every `{key}` whose key is present in the context.
    pub fn substitute(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => match self.get(&after[..close]) {
                    Some(value) => {
                        out.push_str(value);
                        rest = &after[close + 1..];
                    }
                    None => {
                        // keep the brace and rescan from the next char: "{{x}}" still resolves x
                        out.push('{');
                        rest = after;
                    }
                },
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Keys of every `{…}` token still present in `text`.
pub fn remaining_placeholders(text: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                if !key.contains('{') {
                    keys.push(key);
                }
                rest = after;
            }
            None => break,
        }
    }
    keys
}
