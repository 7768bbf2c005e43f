//! Cleaning client: one generation-service call per row.
//!
//! `process_row` never fails outward; every transport or decode problem is
//! folded into the failure variant of the record so a batch can keep going.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::application::use_cases::prompt_builder;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, AVAILABLE_MODELS};
use crate::domain::record::{CleanedFields, CleanedRecord};
use crate::domain::row::{InputFields, Row};
use crate::infrastructure::llm_clients::GenerationClient;

pub struct CleaningService {
    client: Arc<dyn GenerationClient>,
    config: LLMConfig,
    model: RwLock<String>,
}

impl CleaningService {
    /// Fails fast with `CredentialError` when no API key is configured,
    /// before any row is processed.
    pub fn new(client: Arc<dyn GenerationClient>, config: LLMConfig) -> Result<Self> {
        match &config.api_key {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(AppError::CredentialError(
                    "OpenAI API key not found. Set OPENAI_API_KEY in the environment or .env file"
                        .to_string(),
                ))
            }
        }
        let model = config.model.clone();
        Ok(Self {
            client,
            config,
            model: RwLock::new(model),
        })
    }

    pub fn from_env(client: Arc<dyn GenerationClient>) -> Result<Self> {
        Self::new(client, LLMConfig::from_env())
    }

    /// Model identifier used for subsequent calls; takes effect on the next
    /// `process_row`, never retroactively.
    pub fn set_model(&self, model: &str) {
        let mut current = self.model.write().unwrap_or_else(|e| e.into_inner());
        *current = model.to_string();
    }

    pub fn model(&self) -> String {
        self.model
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn available_models() -> &'static [&'static str] {
        &AVAILABLE_MODELS
    }

    /// Clean one row. Always returns a record carrying `model_used` and
    /// `cleaning_date`; failures surface as the error variant.
    pub async fn process_row(&self, row: &Row) -> CleanedRecord {
        let model = self.model();
        let config = LLMConfig {
            model: model.clone(),
            ..self.config.clone()
        };

        match self.call_and_decode(&config, row).await {
            Ok(fields) => {
                debug!(model = %model, "Row cleaned");
                CleanedRecord::Cleaned {
                    fields,
                    model_used: model,
                    cleaning_date: now_iso8601(),
                }
            }
            Err(e) => {
                warn!(model = %model, error = %e, "Row cleaning failed");
                CleanedRecord::Failed {
                    error: e.to_string(),
                    model_used: model,
                    cleaning_date: now_iso8601(),
                }
            }
        }
    }

    async fn call_and_decode(&self, config: &LLMConfig, row: &Row) -> Result<CleanedFields> {
        let fields = InputFields::from_row(row);
        let bundle = prompt_builder::build(&fields);

        let reply = self
            .client
            .generate(config, bundle.system, &bundle.user, bundle.response_format)
            .await?;

        let decoded: CleanedFields = serde_json::from_str(&reply).map_err(|e| {
            AppError::DecodeError(format!("Failed to parse model reply as JSON: {}", e))
        })?;
        decoded.validate()?;
        Ok(decoded)
    }
}

fn now_iso8601() -> String {
    chrono::Local::now().to_rfc3339()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Replays a scripted sequence of replies, one per call.
    pub(crate) struct ScriptedClient {
        replies: Mutex<Vec<Result<String>>>,
        pub seen_models: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        pub(crate) fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen_models: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedClient {
        async fn generate(
            &self,
            config: &LLMConfig,
            _system: &str,
            _user: &str,
            _response_format: &Value,
        ) -> Result<String> {
            self.seen_models.lock().unwrap().push(config.model.clone());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(AppError::GenerationError("script exhausted".to_string()));
            }
            replies.remove(0)
        }

        async fn list_models(&self, _config: &LLMConfig) -> Result<Vec<String>> {
            Ok(vec!["gpt-4o-mini".to_string()])
        }
    }

    pub(crate) fn valid_reply(classification: u8) -> String {
        json!({
            "cleaned_court": "Budapest",
            "cleaned_date": "1896.05.12.",
            "legal_identifier": "1234/96",
            "cleaned_firm_name": "Weisz és Társa",
            "cleaned_location": "Pozsony",
            "cleaned_owners": "Weisz Mór",
            "cleaned_managers": "Kovács János",
            "cleaned_notes_hu": "A cég megszűnt.",
            "notes_english": "The firm was dissolved.",
            "event_classification": classification,
            "names_incoming": "",
            "names_outgoing": "",
            "gazette_references": ""
        })
        .to_string()
    }

    fn config_with_key() -> LLMConfig {
        LLMConfig {
            api_key: Some("test-key".to_string()),
            ..LLMConfig::default()
        }
    }

    fn empty_row() -> Row {
        Row::new(vec!["court".to_string()], vec!["Budapest".to_string()])
    }

    #[test]
    fn missing_credential_fails_construction() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        assert!(matches!(
            CleaningService::new(client, LLMConfig::default()),
            Err(AppError::CredentialError(_))
        ));

        let client = Arc::new(ScriptedClient::new(vec![]));
        let config = LLMConfig {
            api_key: Some("   ".to_string()),
            ..LLMConfig::default()
        };
        assert!(CleaningService::new(client, config).is_err());
    }

    #[tokio::test]
    async fn success_attaches_metadata() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(valid_reply(3))]));
        let service = CleaningService::new(client, config_with_key()).unwrap();

        let record = service.process_row(&empty_row()).await;
        match &record {
            CleanedRecord::Cleaned { fields, .. } => {
                assert_eq!(fields.event_classification, 3);
                assert_eq!(fields.cleaned_location, "Pozsony");
            }
            CleanedRecord::Failed { error, .. } => panic!("unexpected failure: {}", error),
        }
        assert_eq!(record.model_used(), "gpt-4o-mini");
        assert!(!record.cleaning_date().is_empty());
    }

    #[tokio::test]
    async fn malformed_reply_becomes_error_variant() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("not json at all".to_string())]));
        let service = CleaningService::new(client, config_with_key()).unwrap();

        let record = service.process_row(&empty_row()).await;
        assert!(record.is_failed());
        let error = record.error().unwrap();
        assert!(!error.is_empty());
        assert!(error.starts_with("Decode error"));
        assert!(!record.cleaning_date().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_classification_is_a_decode_failure() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(valid_reply(9))]));
        let service = CleaningService::new(client, config_with_key()).unwrap();

        let record = service.process_row(&empty_row()).await;
        assert!(record.is_failed());
        assert!(record.error().unwrap().contains("event_classification"));
    }

    #[tokio::test]
    async fn transport_failure_becomes_error_variant() {
        let client = Arc::new(ScriptedClient::new(vec![Err(AppError::GenerationError(
            "connection refused".to_string(),
        ))]));
        let service = CleaningService::new(client, config_with_key()).unwrap();

        let record = service.process_row(&empty_row()).await;
        assert!(record.is_failed());
        assert!(record.error().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn set_model_takes_effect_on_next_call() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(valid_reply(1)),
            Ok(valid_reply(1)),
        ]));
        let service = CleaningService::new(client.clone(), config_with_key()).unwrap();

        let first = service.process_row(&empty_row()).await;
        service.set_model("gpt-4o");
        let second = service.process_row(&empty_row()).await;

        assert_eq!(first.model_used(), "gpt-4o-mini");
        assert_eq!(second.model_used(), "gpt-4o");
        assert_eq!(
            *client.seen_models.lock().unwrap(),
            vec!["gpt-4o-mini".to_string(), "gpt-4o".to_string()]
        );
    }
}
