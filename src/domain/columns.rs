//! Column vocabulary for the firm registry dataset.
//!
//! Input fields are read from fixed positions in the source sheet (offset 6
//! is an ignored filler column). Output columns are appended to the dataset
//! at load time and are the only columns a cleaned record may write back.

/// Input field names and the sheet column offset each is read from.
pub const INPUT_FIELDS: [(&str, usize); 8] = [
    ("court", 0),
    ("date_and_legal_id", 1),
    ("firm_name", 2),
    ("firm_location", 3),
    ("owner", 4),
    ("managers", 5),
    ("notes", 7),
    ("source", 8),
];

pub const MODEL_USED_COLUMN: &str = "model_used";
pub const CLEANING_DATE_COLUMN: &str = "cleaning_date";
pub const ERROR_COLUMN: &str = "error";

/// Columns written back into the dataset, in stable output order.
pub const OUTPUT_COLUMNS: [&str; 16] = [
    "cleaned_court",
    "cleaned_date",
    "legal_identifier",
    "cleaned_firm_name",
    "cleaned_location",
    "cleaned_owners",
    "cleaned_managers",
    "cleaned_notes_hu",
    "notes_english",
    "event_classification",
    "names_incoming",
    "names_outgoing",
    "gazette_references",
    MODEL_USED_COLUMN,
    CLEANING_DATE_COLUMN,
    ERROR_COLUMN,
];

pub fn is_output_column(name: &str) -> bool {
    OUTPUT_COLUMNS.contains(&name)
}

/// Human-readable label for an event classification code.
pub fn event_type_label(classification: u8) -> &'static str {
    match classification {
        1 => "Firm birth (registration)",
        2 => "Firm death (dissolution)",
        3 => "Ownership change",
        4 => "Management change",
        5 => "Change in legal status",
        6 => "Other",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_columns_include_metadata_and_error() {
        assert!(is_output_column(MODEL_USED_COLUMN));
        assert!(is_output_column(CLEANING_DATE_COLUMN));
        assert!(is_output_column(ERROR_COLUMN));
        assert!(!is_output_column("court"));
    }

    #[test]
    fn input_offsets_skip_the_filler_column() {
        assert!(INPUT_FIELDS.iter().all(|(_, offset)| *offset != 6));
    }
}
