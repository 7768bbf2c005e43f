pub mod llm_clients;
pub mod row_store;
pub mod storage;
