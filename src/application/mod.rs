pub mod use_cases;

pub use use_cases::batch_controller::{BatchController, BatchHooks, BatchOutcome, RunState};
pub use use_cases::cleaning_service::CleaningService;
