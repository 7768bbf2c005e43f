pub mod columns;
pub mod error;
pub mod llm_config;
pub mod record;
pub mod row;
