use clap::Parser;
use tracing::error;

use registry_cleaner::interfaces::cli::{self, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli).await {
        error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
