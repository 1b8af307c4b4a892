mod cli;

use crate::cli::app::App;
use crate::cli::{Cli, Command};
use clap::Parser;
use docrepo::StoreConfig;
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)?,
        None => StoreConfig::new("shop"),
    };

    let app = App::new(&config)?;
    match cli.command {
        Command::Transaction { fail_step } => {
            app.run_transaction(fail_step).await?;
        }
        Command::Seed => app.seed().await?,
    }
    Ok(())
}
