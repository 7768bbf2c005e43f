pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::use_cases::batch_controller::{
    BatchController, BatchHooks, BatchOutcome, RunState, SilentHooks,
};
pub use application::use_cases::cleaning_service::CleaningService;
pub use domain::error::{AppError, Result};
pub use domain::llm_config::LLMConfig;
pub use domain::record::{CleanedFields, CleanedRecord};
pub use domain::row::{InputFields, Row};
pub use infrastructure::llm_clients::{openai::OpenAIClient, GenerationClient};
pub use infrastructure::row_store::RowStore;
