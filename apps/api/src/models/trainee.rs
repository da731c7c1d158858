use serde::{Deserialize, Serialize};

/// One normalized roster row. Names are already upper-cased by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraineeRecord {
    pub document_type: String,
    pub document_number: String,
    pub given_names: String,
    pub family_names: String,
    pub program: String,
    /// Cohort code ("ficha").
    pub cohort_code: String,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl TraineeRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_names, self.family_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_joins_given_and_family() {
        let trainee = TraineeRecord {
            document_type: "CC".to_string(),
            document_number: "123".to_string(),
            given_names: "ANA MARIA".to_string(),
            family_names: "LOPEZ PEREZ".to_string(),
            program: "Minería".to_string(),
            cohort_code: "999".to_string(),
            birth_date: None,
            phone: None,
            email: None,
        };
        assert_eq!(trainee.full_name(), "ANA MARIA LOPEZ PEREZ");
    }
}
