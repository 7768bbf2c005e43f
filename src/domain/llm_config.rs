use serde::{Deserialize, Serialize};

/// Model identifiers offered for selection.
pub const AVAILABLE_MODELS: [&str; 4] = ["gpt-4o-mini", "gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"];

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Low temperature so repeated cleanings of the same row stay consistent.
pub const CLEANING_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LLMConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            max_tokens: Some(2048),
            temperature: Some(CLEANING_TEMPERATURE),
        }
    }
}

impl LLMConfig {
    /// Default configuration with the credential taken from `OPENAI_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            ..Self::default()
        }
    }
}
