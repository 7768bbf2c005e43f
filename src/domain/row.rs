use crate::domain::columns::INPUT_FIELDS;

/// One entry of the registry dataset, keyed by column name.
///
/// Values are always text. Access is by column name; positional access is
/// kept for the fixed input-field offsets of the source sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<String>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<String>) -> Self {
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|pos| self.values.get(pos))
            .map(String::as_str)
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// The eight raw textual attributes sent to the generation service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFields {
    pub court: String,
    pub date_and_legal_id: String,
    pub firm_name: String,
    pub firm_location: String,
    pub owner: String,
    pub managers: String,
    pub notes: String,
    pub source: String,
}

impl InputFields {
    /// Extract input fields from a row, preferring the canonical column name
    /// and falling back to the fixed sheet offset. Missing fields become "".
    pub fn from_row(row: &Row) -> Self {
        let field = |name: &str, offset: usize| -> String {
            row.get(name)
                .or_else(|| row.value_at(offset))
                .unwrap_or("")
                .to_string()
        };

        let mut fields = InputFields::default();
        for (name, offset) in INPUT_FIELDS {
            let value = field(name, offset);
            match name {
                "court" => fields.court = value,
                "date_and_legal_id" => fields.date_and_legal_id = value,
                "firm_name" => fields.firm_name = value,
                "firm_location" => fields.firm_location = value,
                "owner" => fields.owner = value,
                "managers" => fields.managers = value,
                "notes" => fields.notes = value,
                "source" => fields.source = value,
                _ => {}
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional_row() -> Row {
        let columns = (0..9).map(|i| format!("col_{}", i)).collect();
        let values = vec![
            "Budapesti Tvsz.".to_string(),
            "1896.05.12. 1234/96".to_string(),
            "Weisz es Tarsa".to_string(),
            "P o z s o n y".to_string(),
            "Weisz Mor".to_string(),
            "Kovacs Janos".to_string(),
            "filler".to_string(),
            "A ceg megszunt".to_string(),
            "KE 1896/21".to_string(),
        ];
        Row::new(columns, values)
    }

    #[test]
    fn extracts_fields_by_offset_and_skips_filler() {
        let fields = InputFields::from_row(&positional_row());
        assert_eq!(fields.court, "Budapesti Tvsz.");
        assert_eq!(fields.firm_location, "P o z s o n y");
        assert_eq!(fields.notes, "A ceg megszunt");
        assert_eq!(fields.source, "KE 1896/21");
    }

    #[test]
    fn named_columns_take_precedence_over_offsets() {
        let row = Row::new(
            vec!["notes".to_string(), "court".to_string()],
            vec!["the notes".to_string(), "the court".to_string()],
        );
        let fields = InputFields::from_row(&row);
        assert_eq!(fields.notes, "the notes");
        assert_eq!(fields.court, "the court");
    }

    #[test]
    fn short_rows_default_to_empty_fields() {
        let row = Row::new(vec!["col_0".to_string()], vec!["only court".to_string()]);
        let fields = InputFields::from_row(&row);
        assert_eq!(fields.court, "only court");
        assert_eq!(fields.source, "");
    }
}
