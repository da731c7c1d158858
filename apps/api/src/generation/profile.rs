//! Organization profile: the fixed text a resolution carries besides the
//! template body (letterhead, legal grounds, signatory, reviewers).
//!
//! Loaded once at startup and shared read-only through `AppState`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationProfile {
    pub organization_name: String,
    pub center_line: String,
    pub format_code: String,
    pub issuing_authority: String,
    pub legal_grounds: String,
    /// Considerations printed for every resolution kind, before the kind-specific ones.
    pub base_considerations: Vec<String>,
    pub city: String,
    pub signatory_name: String,
    pub signatory_title: String,
    pub reviewers: Vec<String>,
}

impl Default for OrganizationProfile {
    fn default() -> Self {
        Self {
            organization_name: "SERVICIO NACIONAL DE APRENDIZAJE - SENA".to_string(),
            center_line: "REGIONAL BOYACÁ - CENTRO MINERO".to_string(),
            format_code: "GD-F-010 V05 Pag # 1".to_string(),
            issuing_authority:
                "EL SUBDIRECTOR (E) DEL CENTRO MINERO DEL SERVICIO NACIONAL DE APRENDIZAJE – SENA"
                    .to_string(),
            legal_grounds: "En uso de sus facultades legales y reglamentarias, en especial las \
                conferidas por los numerales 29 y 32 del artículo 27° del Decreto 249 de 2004 y el \
                artículo 1 de la Resolución 00621 de 2013 y las conferidas por el director general \
                de la Entidad, mediante Resolución 1-00618- del 17 de abril del año 2023, Acta de \
                posesión No. 120 del 17 de abril de 2023."
                .to_string(),
            base_considerations: vec![
                "Que el artículo 6º del Decreto 2375 de 1974 establece la creación del Fondo \
                 Nacional de Formación Profesional de la Industria de la Construcción."
                    .to_string(),
                "Que el SENA tiene la responsabilidad de administrar los recursos destinados al \
                 bienestar de los aprendices."
                    .to_string(),
                "Que es necesario garantizar el apoyo a los aprendices durante su proceso de \
                 formación."
                    .to_string(),
            ],
            city: "Sogamoso".to_string(),
            signatory_name: "Harvey Yadiver Dimaté Rodríguez".to_string(),
            signatory_title: "Subdirector (E) Centro Minero".to_string(),
            reviewers: vec![
                "VoBo: Julieth Alejandra Viancha Torres: Jurídica Subdirección.".to_string(),
                "Revisó: Blanca Katherin Gómez Viancha – Coordinadora de Formación.".to_string(),
                "Revisó: Eliana Cruz Mora - Líder de Bienestar.".to_string(),
                "Elaboró: Claudia Patricia Rincón Vija - Apoyo socioeconómico.".to_string(),
            ],
        }
    }
}

impl OrganizationProfile {
    /// Reads a JSON profile; omitted fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read organization profile {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid organization profile {}", path.display()))
    }

    /// Applies single-field overrides (`CITY`, `SIGNATORY_NAME`, `SIGNATORY_TITLE`).
    pub fn with_overrides(
        mut self,
        city: Option<String>,
        signatory_name: Option<String>,
        signatory_title: Option<String>,
    ) -> Self {
        if let Some(city) = city {
            self.city = city;
        }
        if let Some(name) = signatory_name {
            self.signatory_name = name;
        }
        if let Some(title) = signatory_title {
            self.signatory_title = title;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_profile_shape() {
        let profile = OrganizationProfile::default();
        assert_eq!(profile.base_considerations.len(), 3);
        assert_eq!(profile.reviewers.len(), 4);
        assert_eq!(profile.city, "Sogamoso");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"city": "Duitama", "reviewers": ["Revisó: Otra Persona."]}}"#).unwrap();

        let profile = OrganizationProfile::from_json_file(file.path()).unwrap();
        assert_eq!(profile.city, "Duitama");
        assert_eq!(profile.reviewers, vec!["Revisó: Otra Persona.".to_string()]);
        assert_eq!(profile.signatory_title, "Subdirector (E) Centro Minero");
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let profile = OrganizationProfile::default().with_overrides(
            None,
            Some("Otra Firmante".to_string()),
            None,
        );
        assert_eq!(profile.signatory_name, "Otra Firmante");
        assert_eq!(profile.city, "Sogamoso");
    }
}
