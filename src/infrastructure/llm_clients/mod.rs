pub mod openai;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;

/// Seam to the text-generation provider. One request per row; the response
/// format is passed as a hard decoding constraint, not a hint.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        config: &LLMConfig,
        system: &str,
        user: &str,
        response_format: &Value,
    ) -> Result<String>;

    async fn list_models(&self, config: &LLMConfig) -> Result<Vec<String>>;
}
