//! Prompt construction for firm registry cleaning.
//!
//! Maps the eight input fields onto a fixed request template and pairs it
//! with the strict JSON schema the generation service must decode against.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::domain::row::InputFields;

/// Fixed domain framing sent as the system message of every request.
pub const SYSTEM_PROMPT: &str = r#"You are an expert in Hungarian historical documents, specifically the "Központi Értesítő" (Central Gazette) from turn of the 19th-20th century Hungary. Your task is to clean OCR errors from scanned firm registry documents and extract structured information.

Key responsibilities:
1. Fix OCR errors (spelling mistakes, layout issues like "P o z s o n y" → "Pozsony")
2. Handle "macskaköröm" (") which means "same as above entry"
3. Extract and structure firm information
4. Recognize Hungarian entity names (locations, firms, people)
5. Classify registry events
6. Translate Hungarian notes to English

Be precise and maintain historical accuracy. If information is unclear or missing, indicate this in your response."#;

/// Strict decoding constraint: exactly the thirteen named fields, all
/// required, no additional properties, classification bounded to 1-6.
pub static RESPONSE_FORMAT: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "firm_registry_entry",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "cleaned_court": {"type": "string"},
                    "cleaned_date": {"type": "string"},
                    "legal_identifier": {"type": "string"},
                    "cleaned_firm_name": {"type": "string"},
                    "cleaned_location": {"type": "string"},
                    "cleaned_owners": {"type": "string"},
                    "cleaned_managers": {"type": "string"},
                    "cleaned_notes_hu": {"type": "string"},
                    "notes_english": {"type": "string"},
                    "event_classification": {"type": "integer", "minimum": 1, "maximum": 6},
                    "names_incoming": {"type": "string"},
                    "names_outgoing": {"type": "string"},
                    "gazette_references": {"type": "string"}
                },
                "required": [
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
                    "gazette_references"
                ],
                "additionalProperties": false
            }
        }
    })
});

/// One fully built request: system framing, interpolated user message, and
/// the response schema the service must honor.
pub struct PromptBundle {
    pub system: &'static str,
    pub user: String,
    pub response_format: &'static Value,
}

/// Build the request for one row. Pure; no I/O.
pub fn build(fields: &InputFields) -> PromptBundle {
    PromptBundle {
        system: SYSTEM_PROMPT,
        user: user_prompt(fields),
        response_format: &RESPONSE_FORMAT,
    }
}

/// Interpolates the input fields and restates the full output contract, so
/// the service sees its required keys and format hints with every request.
fn user_prompt(fields: &InputFields) -> String {
    format!(
        r#"Please process the following Hungarian firm registry entry and return a JSON object with cleaned and structured data.

Input data:
- Court: {court}
- Date and Legal ID: {date_and_legal_id}
- Firm Name: {firm_name}
- Firm Location: {firm_location}
- Owner: {owner}
- Managers: {managers}
- Notes (Hungarian): {notes}
- Source: {source}

Please return a JSON object with the following fields:
{{
    "cleaned_court": "Cleaned court name (if " symbol, indicate 'same as above')",
    "cleaned_date": "Date in YYYY.MM.DD. format",
    "legal_identifier": "Legal identifier extracted from date field",
    "cleaned_firm_name": "Cleaned firm name with OCR errors fixed",
    "cleaned_location": "Cleaned location name",
    "cleaned_owners": "Cleaned owner name(s), semicolon-separated if multiple",
    "cleaned_managers": "Cleaned manager name(s), semicolon-separated if multiple",
    "cleaned_notes_hu": "Cleaned Hungarian text of notes with OCR errors fixed",
    "notes_english": "English summary/translation of the notes",
    "event_classification": 1-6 (1=firm birth, 2=firm death, 3=ownership change, 4=management change, 5=legal status change, 6=other),
    "names_incoming": "Names entering ownership/management (from notes), semicolon-separated",
    "names_outgoing": "Names leaving ownership/management (from notes), semicolon-separated",
    "gazette_references": "Any references to other Central Gazette issues from notes"
}}

Important notes:
- Fix spacing issues in names (e.g., "P o z s o n y" → "Pozsony")
- Preserve Hungarian characters (á, é, í, ó, ö, ő, ú, ü, ű)
- Be precise with dates - follow Hungarian date format
- For event classification, choose the most appropriate category
- If multiple people are involved, separate with semicolons
- Return ONLY valid JSON, no additional text"#,
        court = fields.court,
        date_and_legal_id = fields.date_and_legal_id,
        firm_name = fields.firm_name,
        firm_location = fields.firm_location,
        owner = fields.owner,
        managers = fields.managers,
        notes = fields.notes,
        source = fields.source,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_interpolates_all_fields() {
        let fields = InputFields {
            court: "Budapesti Tvsz.".to_string(),
            date_and_legal_id: "1896.05.12. 1234/96".to_string(),
            firm_name: "Weisz és Társa".to_string(),
            firm_location: "P o z s o n y".to_string(),
            owner: "Weisz Mór".to_string(),
            managers: "Kovács János".to_string(),
            notes: "A cég megszűnt".to_string(),
            source: "KE 1896/21".to_string(),
        };
        let bundle = build(&fields);
        assert_eq!(bundle.system, SYSTEM_PROMPT);
        for value in [
            "Budapesti Tvsz.",
            "1896.05.12. 1234/96",
            "Weisz és Társa",
            "P o z s o n y",
            "Weisz Mór",
            "Kovács János",
            "A cég megszűnt",
            "KE 1896/21",
        ] {
            assert!(bundle.user.contains(value), "missing {}", value);
        }
    }

    #[test]
    fn schema_requires_all_thirteen_fields_and_nothing_else() {
        let schema = &RESPONSE_FORMAT["json_schema"]["schema"];
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 13);
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"].as_object().unwrap().len(), 13);
        assert_eq!(
            schema["properties"]["event_classification"],
            json!({"type": "integer", "minimum": 1, "maximum": 6})
        );
        assert_eq!(RESPONSE_FORMAT["json_schema"]["strict"], json!(true));
    }
}
