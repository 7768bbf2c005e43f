//! Headless command-line interface over the cleaning pipeline.
//!
//! Implements the presentation hooks on a terminal: progress goes to the
//! log, per-row failures become an interactive continue/abort prompt, and
//! Ctrl-C records a stop request without interrupting the in-flight row.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::application::use_cases::batch_controller::{BatchController, BatchHooks};
use crate::application::use_cases::cleaning_service::CleaningService;
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::{openai::OpenAIClient, GenerationClient};
use crate::infrastructure::row_store::RowStore;

#[derive(Parser)]
#[command(
    name = "registry-cleaner",
    about = "LLM-assisted cleaner for historical Hungarian firm registry spreadsheets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a spreadsheet and clean one row or an auto-run range
    Clean {
        /// Input spreadsheet (.xlsx or .xls)
        #[arg(long)]
        input: PathBuf,
        /// Clean a single row instead of auto-running
        #[arg(long, conflicts_with = "from")]
        row: Option<usize>,
        /// First row of the auto-run range (runs through the last row)
        #[arg(long, default_value_t = 0)]
        from: usize,
        /// Model identifier to use
        #[arg(long)]
        model: Option<String>,
        /// Override the service base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Write the cleaned dataset back to xlsx
        #[arg(long)]
        save_excel: bool,
        /// Write the cleaned dataset as a JSON array
        #[arg(long)]
        save_json: bool,
        /// Continue past per-row failures without prompting
        #[arg(long)]
        yes: bool,
    },
    /// List model identifiers
    Models {
        /// Query the generation service instead of the built-in list
        #[arg(long)]
        remote: bool,
        #[arg(long)]
        base_url: Option<String>,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Clean {
            input,
            row,
            from,
            model,
            base_url,
            save_excel,
            save_json,
            yes,
        } => {
            let config = build_config(model, base_url);
            let client = Arc::new(OpenAIClient::new());
            let cleaner = Arc::new(CleaningService::new(client, config)?);
            let controller = Arc::new(BatchController::new(cleaner));

            let mut store = RowStore::new();
            let count = store.load(&input)?;
            info!(rows = count, input = %input.display(), "Spreadsheet loaded");

            // Ctrl-C records a stop request; the current row still finishes.
            let stopper = controller.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = stopper.request_stop();
                }
            });

            let hooks = ConsoleHooks { auto_continue: yes };
            match row {
                Some(index) => {
                    let record = controller.process_one(&mut store, index, &hooks).await?;
                    let json = serde_json::to_string_pretty(&record.to_json())
                        .unwrap_or_else(|_| "{}".to_string());
                    println!("{}", json);
                    // full updated row, input columns included
                    println!("{}", store.row_json(index)?);
                }
                None => {
                    let outcome = controller.start_auto(&mut store, from, &hooks).await?;
                    info!(?outcome, "Run finished");
                }
            }

            if save_excel {
                let path = store.save_excel(None)?;
                println!("Excel saved to {}", path.display());
            }
            if save_json {
                let path = store.save_json(None)?;
                println!("JSON saved to {}", path.display());
            }
            if !save_excel && !save_json {
                warn!("Results were not persisted; pass --save-excel or --save-json");
            }
            Ok(())
        }
        Command::Models { remote, base_url } => {
            if remote {
                let config = build_config(None, base_url);
                let client = OpenAIClient::new();
                for model in client.list_models(&config).await? {
                    println!("{}", model);
                }
            } else {
                for model in CleaningService::available_models() {
                    println!("{}", model);
                }
            }
            Ok(())
        }
    }
}

fn build_config(model: Option<String>, base_url: Option<String>) -> LLMConfig {
    let mut config = LLMConfig::from_env();
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    config
}

struct ConsoleHooks {
    auto_continue: bool,
}

#[async_trait]
impl BatchHooks for ConsoleHooks {
    fn row_selected(&self, index: usize) {
        info!(row = index, "Processing row");
    }

    fn progress(&self, done: usize, total: usize, message: &str) {
        info!(done, total, "{}", message);
    }

    fn row_failed(&self, index: usize, error: &str) {
        warn!(row = index, error = %error, "Row failed");
    }

    fn processing_mode(&self, active: bool) {
        if active {
            info!("Auto-processing started; press Ctrl-C to stop after the current row");
        } else {
            info!("Auto-processing finished");
        }
    }

    async fn confirm_continue(&self, index: usize, error: &str) -> bool {
        if self.auto_continue {
            warn!(row = index, "Continuing past failure (--yes)");
            return true;
        }
        let prompt = format!("Error at row {}: {}\nContinue processing? [y/N] ", index, error);
        tokio::task::spawn_blocking(move || {
            print!("{}", prompt);
            let _ = std::io::stdout().flush();
            let mut answer = String::new();
            if std::io::stdin().read_line(&mut answer).is_err() {
                return false;
            }
            matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
        })
        .await
        .unwrap_or(false)
    }
}
