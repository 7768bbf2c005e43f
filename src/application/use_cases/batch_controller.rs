//! Batch controller: drives row processing across a range.
//!
//! State machine `Idle -> Processing -> (Idle | Stopping -> Idle)`. Only one
//! run may be active; cancellation is cooperative and observed at row
//! boundaries, never mid-flight. Per-row failures are written back to the
//! dataset and handed to the presentation hooks as a continue/abort choice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::application::use_cases::cleaning_service::CleaningService;
use crate::domain::error::{AppError, Result};
use crate::domain::record::CleanedRecord;
use crate::infrastructure::row_store::RowStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    Processing,
    Stopping,
}

/// How an auto-run ended. `processed` counts rows whose result, success or
/// failure, was committed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed { processed: usize },
    Stopped { processed: usize },
    Aborted { processed: usize, failed_row: usize },
}

/// Outward notifications to the presentation layer. All fire-and-forget
/// except `confirm_continue`, which blocks the run on a yes/no decision.
/// Implementations marshal onto their own thread or event loop as needed.
#[async_trait]
pub trait BatchHooks: Send + Sync {
    fn row_selected(&self, _index: usize) {}
    fn progress(&self, _done: usize, _total: usize, _message: &str) {}
    fn row_failed(&self, _index: usize, _error: &str) {}
    /// Gates controls such as model switching while a run is active.
    fn processing_mode(&self, _active: bool) {}
    /// Asked after each per-row failure; `false` aborts the remaining range.
    async fn confirm_continue(&self, _index: usize, _error: &str) -> bool {
        false
    }
}

/// No-op hooks for headless callers.
pub struct SilentHooks;

#[async_trait]
impl BatchHooks for SilentHooks {}

pub struct BatchController {
    cleaner: Arc<CleaningService>,
    state: Mutex<RunState>,
    stop_requested: AtomicBool,
}

impl BatchController {
    pub fn new(cleaner: Arc<CleaningService>) -> Self {
        Self {
            cleaner,
            state: Mutex::new(RunState::Idle),
            stop_requested: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Request cooperative cancellation of the active run. The flag is
    /// observed before the next row starts; the in-flight row completes.
    pub fn request_stop(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match *state {
            RunState::Processing | RunState::Stopping => {
                self.stop_requested.store(true, Ordering::SeqCst);
                *state = RunState::Stopping;
                info!("Stop requested; finishing current row");
                Ok(())
            }
            RunState::Idle => Err(AppError::Busy("no processing run to stop".to_string())),
        }
    }

    /// Process a single row and merge the result back. Valid only from Idle.
    pub async fn process_one(
        &self,
        store: &mut RowStore,
        index: usize,
        hooks: &dyn BatchHooks,
    ) -> Result<CleanedRecord> {
        let _guard = self.begin()?;

        let row = store.row(index)?;
        let record = self.cleaner.process_row(&row).await;
        store.update_row(index, &record)?;

        match record.error() {
            Some(error) => {
                hooks.row_failed(index, error);
                hooks.progress(1, 1, &format!("Error processing row {}", index));
            }
            None => hooks.progress(1, 1, &format!("Processed row {}", index)),
        }
        Ok(record)
    }

    /// Auto-process rows from `from` through the end of the dataset. Valid
    /// only from Idle; a second call while active is rejected with `Busy`.
    pub async fn start_auto(
        &self,
        store: &mut RowStore,
        from: usize,
        hooks: &dyn BatchHooks,
    ) -> Result<BatchOutcome> {
        let _guard = self.begin()?;

        hooks.processing_mode(true);
        info!(from, total = store.row_count(), "Auto-processing started");
        let outcome = self.run_range(store, from, hooks).await;
        hooks.processing_mode(false);

        match &outcome {
            Ok(BatchOutcome::Completed { processed }) => {
                info!(processed, "Auto-processing completed")
            }
            Ok(BatchOutcome::Stopped { processed }) => {
                info!(processed, "Auto-processing stopped by request")
            }
            Ok(BatchOutcome::Aborted {
                processed,
                failed_row,
            }) => warn!(processed, failed_row, "Auto-processing aborted"),
            Err(e) => warn!(error = %e, "Auto-processing failed"),
        }
        outcome
    }

    async fn run_range(
        &self,
        store: &mut RowStore,
        from: usize,
        hooks: &dyn BatchHooks,
    ) -> Result<BatchOutcome> {
        let total = store.row_count();
        let mut processed = 0;

        for index in from..total {
            // Cancellation is only honored here, between rows.
            if self.stop_requested.load(Ordering::SeqCst) {
                return Ok(BatchOutcome::Stopped { processed });
            }

            hooks.row_selected(index);
            let row = store.row(index)?;
            let record = self.cleaner.process_row(&row).await;
            store.update_row(index, &record)?;
            processed += 1;
            hooks.progress(
                index + 1,
                total,
                &format!("Processed row {}/{}", index + 1, total),
            );

            if let Some(error) = record.error() {
                hooks.row_failed(index, error);
                if !hooks.confirm_continue(index, error).await {
                    return Ok(BatchOutcome::Aborted {
                        processed,
                        failed_row: index,
                    });
                }
            }
        }
        Ok(BatchOutcome::Completed { processed })
    }

    fn begin(&self) -> Result<RunGuard<'_>> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state != RunState::Idle {
            return Err(AppError::Busy(
                "a processing run is already active".to_string(),
            ));
        }
        *state = RunState::Processing;
        self.stop_requested.store(false, Ordering::SeqCst);
        Ok(RunGuard { controller: self })
    }
}

/// Restores Idle and clears the stop flag on every exit path.
struct RunGuard<'a> {
    controller: &'a BatchController,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut state = self
            .controller
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *state = RunState::Idle;
        self.controller.stop_requested.store(false, Ordering::SeqCst);
    }
}
