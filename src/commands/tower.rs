use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, RoutingPolicy};
use crate::session::SimulatedBackend;
use crate::tower::TowerApp;

#[derive(ClapArgs)]
pub struct Args {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds the simulated backend stays busy per prompt
    #[arg(long)]
    pub task_secs: Option<u64>,
}

pub async fn execute(args: Args) -> Result<()> {
    let config = Config::load(args.config)?.with_task_secs(args.task_secs);
    let _guard = init_file_logging(&config.log_dir())?;

    let policy = RoutingPolicy::from_env(&config.routing, |key| std::env::var(key).ok());
    tracing::info!(
        disabled = policy.disabled,
        limited_terminal = policy.limited_terminal,
        task_secs = config.backend.task_secs,
        "starting tower"
    );

    let (handle, events, backend_task) =
        SimulatedBackend::spawn(Duration::from_secs(config.backend.task_secs));

    let mut app = TowerApp::new(&config, policy, handle);
    let result = app.run(events).await;

    if let Err(e) = backend_task.await {
        tracing::warn!("simulated backend task failed: {}", e);
    }

    result
}

/// The terminal is in raw mode for the whole run, so logs go to a daily file.
fn init_file_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

    let appender = tracing_appender::rolling::daily(log_dir, "steerq.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;

    Ok(guard)
}
