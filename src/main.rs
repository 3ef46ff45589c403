use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod models;
mod popup;
mod queue;
mod session;
mod tower;
mod utils;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tower(args) => commands::tower::execute(args).await,
        Commands::Classify(args) => commands::classify::execute(args).await,
    }
}
