pub mod batch_controller;
pub mod cleaning_service;
pub mod prompt_builder;
