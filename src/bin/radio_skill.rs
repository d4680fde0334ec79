//! CLI binary for the radio skill.

use clap::{Parser, Subcommand};
use radio_skill::{
    ProfileForwarder, RequestEnvelope, SkillConfig, SkillDispatcher, radio_skill, server,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

/// Voice-assistant radio skill.
#[derive(Parser)]
#[command(name = "radio-skill", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Serve request envelopes over HTTP.
    Serve,

    /// Answer one request envelope read from a file (`-` for stdin).
    Invoke {
        /// Envelope JSON file.
        input: PathBuf,
    },

    /// Write the default configuration to a file.
    WriteConfig {
        /// Destination path.
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries envelope JSON for `invoke`; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("radio_skill=info")),
        )
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);

    if let Command::WriteConfig { path } = &command {
        SkillConfig::default().save_to_file(path)?;
        tracing::info!(path = %path.display(), "default config written");
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    config.validate()?;

    let forwarder = ProfileForwarder::from_config(&config.profile, config.skill.user_agent.as_deref())?
        .map(Arc::new);
    if forwarder.is_none() {
        tracing::info!("profile forwarding disabled");
    }
    let dispatcher = Arc::new(radio_skill(&config, forwarder.clone()));

    let result = match command {
        Command::Serve => {
            server::run_server(config.server.clone(), dispatcher, shutdown_signal()).await
        }
        Command::Invoke { input } => invoke(&dispatcher, &input).await,
        Command::WriteConfig { .. } => Ok(()),
    };

    if let Some(forwarder) = forwarder {
        forwarder.shutdown().await;
    }
    result
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SkillConfig> {
    if let Some(path) = path {
        return Ok(SkillConfig::from_file(path)?);
    }
    let default_path = SkillConfig::default_config_path();
    if default_path.exists() {
        tracing::info!(path = %default_path.display(), "loading config");
        Ok(SkillConfig::from_file(&default_path)?)
    } else {
        Ok(SkillConfig::default())
    }
}

async fn invoke(dispatcher: &SkillDispatcher, input: &Path) -> anyhow::Result<()> {
    let raw = if input == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(input).await?
    };

    let envelope: RequestEnvelope = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid request envelope: {e}"))?;
    let response = dispatcher.handle(&envelope);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
