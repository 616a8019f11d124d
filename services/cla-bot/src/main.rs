//! CLA Label Bot
//!
//! Delivers a single webhook payload to the cla plugin. The webhook server
//! in front of it decides which subcommand to run.
//!
//! ## Usage
//! ```bash
//! # status webhook
//! cla-bot status --event payload.json
//!
//! # normalized comment event (stdin)
//! cat comment.json | cla-bot comment --event -
//!
//! # plugin help
//! cla-bot plugin-help
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cla_bot::cla;
use cla_bot::config::{GitHubConfig, LogFormat, RetryConfig};
use cla_bot::github::{GenericCommentEvent, StatusEvent};

#[derive(Parser, Debug)]
#[command(name = "cla-bot")]
#[command(about = "Mirror the EasyCLA status into cncf-cla labels", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    github: GitHubConfig,

    #[command(flatten)]
    retry: RetryConfig,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, env = "LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Handle a `status` webhook payload
    Status {
        /// Path to the JSON payload, or `-` for stdin
        #[arg(long)]
        event: PathBuf,
    },

    /// Handle a generic comment event
    Comment {
        /// Path to the JSON payload, or `-` for stdin
        #[arg(long)]
        event: PathBuf,
    },

    /// Print the plugin help as JSON
    PluginHelp,
}

fn init_logging(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn read_event<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file: {}", path.display()))?
    };

    serde_json::from_str(&raw).context("Failed to parse event payload")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    if let Commands::PluginHelp = cli.command {
        println!("{}", serde_json::to_string_pretty(&cla::help())?);
        return Ok(());
    }

    let client = Arc::new(cli.github.client().await?);
    let plugin = cla::plugin(client, cli.retry.policy());

    match &cli.command {
        Commands::Status { event } => {
            let event: StatusEvent = read_event(event)?;
            info!(
                repo = %event.repo.full_name(),
                sha = %event.sha,
                context = %event.context,
                "Handling status event"
            );
            plugin.dispatch_status(&event).await?;
        }
        Commands::Comment { event } => {
            let event: GenericCommentEvent = read_event(event)?;
            info!(
                repo = %event.repo.full_name(),
                pr = event.number,
                "Handling comment event"
            );
            plugin.dispatch_comment(&event).await?;
        }
        Commands::PluginHelp => {}
    }

    Ok(())
}
