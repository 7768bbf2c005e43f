use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::columns::{CLEANING_DATE_COLUMN, ERROR_COLUMN, MODEL_USED_COLUMN};
use crate::domain::error::{AppError, Result};

/// The thirteen fields the model must produce for every row.
///
/// Decoding is strict: unknown keys are rejected, and the classification
/// code is validated against its 1-6 range after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanedFields {
    pub cleaned_court: String,
    pub cleaned_date: String,
    pub legal_identifier: String,
    pub cleaned_firm_name: String,
    pub cleaned_location: String,
    pub cleaned_owners: String,
    pub cleaned_managers: String,
    pub cleaned_notes_hu: String,
    pub notes_english: String,
    pub event_classification: u8,
    pub names_incoming: String,
    pub names_outgoing: String,
    pub gazette_references: String,
}

impl CleanedFields {
    pub fn validate(&self) -> Result<()> {
        if !(1..=6).contains(&self.event_classification) {
            return Err(AppError::DecodeError(format!(
                "event_classification {} outside the 1-6 range",
                self.event_classification
            )));
        }
        Ok(())
    }
}

/// The structured result for one row: either the full set of cleaned fields
/// or a failure message. Both variants carry the model identifier and the
/// timestamp of the call, and are distinguishable by key presence alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanedRecord {
    Cleaned {
        fields: CleanedFields,
        model_used: String,
        cleaning_date: String,
    },
    Failed {
        error: String,
        model_used: String,
        cleaning_date: String,
    },
}

impl CleanedRecord {
    pub fn is_failed(&self) -> bool {
        matches!(self, CleanedRecord::Failed { .. })
    }

    pub fn model_used(&self) -> &str {
        match self {
            CleanedRecord::Cleaned { model_used, .. } => model_used,
            CleanedRecord::Failed { model_used, .. } => model_used,
        }
    }

    pub fn cleaning_date(&self) -> &str {
        match self {
            CleanedRecord::Cleaned { cleaning_date, .. } => cleaning_date,
            CleanedRecord::Failed { cleaning_date, .. } => cleaning_date,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CleanedRecord::Failed { error, .. } => Some(error),
            CleanedRecord::Cleaned { .. } => None,
        }
    }

    /// Column name / value pairs to merge back into a dataset row.
    pub fn column_values(&self) -> Vec<(&'static str, String)> {
        match self {
            CleanedRecord::Cleaned {
                fields,
                model_used,
                cleaning_date,
            } => vec![
                ("cleaned_court", fields.cleaned_court.clone()),
                ("cleaned_date", fields.cleaned_date.clone()),
                ("legal_identifier", fields.legal_identifier.clone()),
                ("cleaned_firm_name", fields.cleaned_firm_name.clone()),
                ("cleaned_location", fields.cleaned_location.clone()),
                ("cleaned_owners", fields.cleaned_owners.clone()),
                ("cleaned_managers", fields.cleaned_managers.clone()),
                ("cleaned_notes_hu", fields.cleaned_notes_hu.clone()),
                ("notes_english", fields.notes_english.clone()),
                (
                    "event_classification",
                    fields.event_classification.to_string(),
                ),
                ("names_incoming", fields.names_incoming.clone()),
                ("names_outgoing", fields.names_outgoing.clone()),
                ("gazette_references", fields.gazette_references.clone()),
                (MODEL_USED_COLUMN, model_used.clone()),
                (CLEANING_DATE_COLUMN, cleaning_date.clone()),
            ],
            CleanedRecord::Failed {
                error,
                model_used,
                cleaning_date,
            } => vec![
                (ERROR_COLUMN, error.clone()),
                (MODEL_USED_COLUMN, model_used.clone()),
                (CLEANING_DATE_COLUMN, cleaning_date.clone()),
            ],
        }
    }

    /// Flat JSON object for display and per-row export.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CleanedRecord::Cleaned {
                fields,
                model_used,
                cleaning_date,
            } => {
                let mut value = json!(fields);
                if let Some(map) = value.as_object_mut() {
                    map.insert(MODEL_USED_COLUMN.to_string(), json!(model_used));
                    map.insert(CLEANING_DATE_COLUMN.to_string(), json!(cleaning_date));
                }
                value
            }
            CleanedRecord::Failed {
                error,
                model_used,
                cleaning_date,
            } => json!({
                ERROR_COLUMN: error,
                MODEL_USED_COLUMN: model_used,
                CLEANING_DATE_COLUMN: cleaning_date,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_fields() -> CleanedFields {
        CleanedFields {
            cleaned_court: "Budapesti Törvényszék".to_string(),
            cleaned_date: "1896.05.12.".to_string(),
            legal_identifier: "1234/96".to_string(),
            cleaned_firm_name: "Weisz és Társa".to_string(),
            cleaned_location: "Pozsony".to_string(),
            cleaned_owners: "Weisz Mór".to_string(),
            cleaned_managers: "Kovács János".to_string(),
            cleaned_notes_hu: "A cég megszűnt.".to_string(),
            notes_english: "The firm was dissolved.".to_string(),
            event_classification: 2,
            names_incoming: "".to_string(),
            names_outgoing: "Weisz Mór".to_string(),
            gazette_references: "KE 1896/21".to_string(),
        }
    }

    #[test]
    fn strict_decode_rejects_unknown_keys() {
        let text = r#"{"cleaned_court": "x", "bogus": 1}"#;
        assert!(serde_json::from_str::<CleanedFields>(text).is_err());
    }

    #[test]
    fn classification_out_of_range_fails_validation() {
        let mut fields = sample_fields();
        fields.event_classification = 7;
        assert!(matches!(
            fields.validate(),
            Err(AppError::DecodeError(_))
        ));
        fields.event_classification = 6;
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn variants_are_distinguishable_by_keys() {
        let cleaned = CleanedRecord::Cleaned {
            fields: sample_fields(),
            model_used: "gpt-4o-mini".to_string(),
            cleaning_date: "2026-08-27T10:00:00".to_string(),
        };
        let failed = CleanedRecord::Failed {
            error: "timeout".to_string(),
            model_used: "gpt-4o-mini".to_string(),
            cleaning_date: "2026-08-27T10:00:00".to_string(),
        };

        let cleaned_keys: Vec<&str> = cleaned.column_values().iter().map(|(k, _)| *k).collect();
        let failed_keys: Vec<&str> = failed.column_values().iter().map(|(k, _)| *k).collect();

        assert_eq!(cleaned_keys.len(), 15);
        assert!(!cleaned_keys.contains(&ERROR_COLUMN));
        assert_eq!(
            failed_keys,
            vec![ERROR_COLUMN, MODEL_USED_COLUMN, CLEANING_DATE_COLUMN]
        );
    }

    #[test]
    fn both_variants_carry_metadata() {
        let failed = CleanedRecord::Failed {
            error: "boom".to_string(),
            model_used: "gpt-4o".to_string(),
            cleaning_date: "2026-08-27T10:00:00".to_string(),
        };
        assert_eq!(failed.model_used(), "gpt-4o");
        assert!(!failed.cleaning_date().is_empty());
        let json = failed.to_json();
        assert_eq!(json["model_used"], "gpt-4o");
        assert_eq!(json["error"], "boom");
    }
}
