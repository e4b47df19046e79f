mod noninteractive;
mod output;
mod repl;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::core::analysis::Platform;
use crate::core::config::AppConfig;
use crate::core::error::SynsightError;
use crate::core::notifier::{ChannelNotifier, Notice};
use crate::orchestrator::{OrchestratorSettings, SessionOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "synsight", version, about = "Social media sentiment analysis from the terminal")]
pub(crate) struct Cli {
    /// Non-interactive mode: run a single query and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Directory to look for synsight.json in
    #[arg(short = 'c', long = "cwd")]
    working_dir: Option<PathBuf>,

    /// Output format for non-interactive mode
    #[arg(short = 'f', long, default_value = "text")]
    output_format: OutputFormat,

    /// Suppress progress indicators
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Resume a previous session by ID
    #[arg(long)]
    session: Option<String>,

    /// Platform to analyze (overrides config)
    #[arg(long, env = "SYNSIGHT_PLATFORM")]
    platform: Option<Platform>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct App {
    pub orchestrator: Arc<SessionOrchestrator>,
    pub config: AppConfig,
    pub notices: mpsc::UnboundedReceiver<Notice>,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut config = crate::core::config::load_config(cli.working_dir.clone())?;
    if let Some(platform) = cli.platform {
        config.analysis.platform = platform;
    }

    let level = if cli.debug || config.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let app = build_app(config)?;

    if let Some(session_id) = &cli.session {
        if let Err(e) = app.orchestrator.load(session_id).await {
            tracing::debug!(session_id, error = %e, "resume failed; starting a new session");
        }
    }

    if let Some(prompt) = cli.prompt {
        noninteractive::run(app, prompt, cli.output_format, cli.quiet).await
    } else {
        repl::run(app, cli.quiet).await
    }
}

fn build_app(config: AppConfig) -> Result<App, SynsightError> {
    let gateways = crate::gateway::create_gateways(&config)?;
    let (notifier, notices) = ChannelNotifier::new();

    let orchestrator = SessionOrchestrator::new(
        gateways.sessions,
        gateways.analysis,
        Arc::new(notifier),
        OrchestratorSettings::from_config(&config),
    );
    tracing::debug!(api_url = %config.api_url, platform = %config.analysis.platform, "app ready");

    Ok(App {
        orchestrator: Arc::new(orchestrator),
        config,
        notices,
    })
}
