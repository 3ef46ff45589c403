use clap::{Parser, Subcommand};

use crate::commands::{classify, tower};

#[derive(Parser)]
#[command(name = "steerq")]
#[command(about = "Steer or queue messages for a busy agent")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI against the simulated backend
    Tower(tower::Args),

    /// Show how a submission would be routed
    Classify(classify::Args),
}
