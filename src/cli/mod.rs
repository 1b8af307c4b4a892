pub mod app;
pub mod seed;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "docrepo", about = "Generic document repository demo", version)]
pub struct Cli {
    /// JSON configuration file with a `StoreSettings` section
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a user and a product and push a review, all in one transaction
    Transaction {
        /// Make one step fail to exercise the abort path
        #[arg(long, value_enum)]
        fail_step: Option<Step>,
    },

    /// Bulk-insert the sample users and products
    Seed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Step {
    CreateUser,
    CreateProduct,
    AddReview,
}
