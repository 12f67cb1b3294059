//! zoowatch
//!
//! Runs the guess-the-mascot moderator outside a chat gateway: classify
//! single messages, or watch a stream of messages on stdin.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use zoowatch_classifiers::{Classifier, ClassifierConfig};
use zoowatch_core::{Author, IncomingMessage};
use zoowatch_event::GuessEventHandler;

mod config;
mod webhook;

use config::{BotConfig, Overrides};
use webhook::{RelayActions, WebhookRelay};

#[derive(Parser, Debug)]
#[command(name = "zoowatch", version)]
#[command(about = "Guess-the-mascot chat moderator", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "zoowatch.yaml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Event mascot
    #[arg(long, global = true)]
    mascot: Option<String>,

    /// Monitored channel id
    #[arg(long, global = true)]
    channel: Option<String>,

    /// Webhook URL that receives log reports
    #[arg(long, global = true, env = "ZOOWATCH_WEBHOOK_URL")]
    webhook: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one message and print the result as JSON
    Classify {
        /// Message text
        #[arg(required = true)]
        text: Vec<String>,

        /// Skip the knowledge-base lookup
        #[arg(long)]
        offline: bool,
    },

    /// Moderate messages read from stdin, one per line
    Watch {
        /// Log channel id for reports
        #[arg(long)]
        log_channel: Option<String>,

        /// Skip the knowledge-base lookup
        #[arg(long)]
        offline: bool,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let (log_channel, offline) = match &self.command {
            Command::Classify { offline, .. } => (None, *offline),
            Command::Watch {
                log_channel,
                offline,
            } => (log_channel.clone(), *offline),
        };
        Overrides {
            mascot: self.mascot.clone(),
            channel: self.channel.clone(),
            log_channel,
            webhook: self.webhook.clone(),
            offline,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let config = BotConfig::load(Some(cli.config.as_path()), &cli.overrides())?;
    info!(path = %cli.config.display(), "Configuration loaded");

    match &cli.command {
        Command::Classify { text, .. } => classify(&config.classifiers, &text.join(" ")).await,
        Command::Watch { .. } => watch(config).await,
    }
}

async fn classify(config: &ClassifierConfig, text: &str) -> Result<()> {
    let stack = config.build().context("Failed to build classifiers")?;
    let (result, trace) = stack.classifier.classify_traced(text).await;
    info!(
        classifier = stack.classifier.name(),
        remote = stack.classifier.tier().is_remote(),
        stage = ?trace.stage,
        lookups = trace.lookups_attempted,
        failed = trace.lookups_failed,
        "Classified"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn watch(config: BotConfig) -> Result<()> {
    let stack = config
        .classifiers
        .build()
        .context("Failed to build classifiers")?;

    let relay = config
        .webhook
        .as_ref()
        .map(WebhookRelay::from_config)
        .transpose()
        .context("Failed to set up webhook relay")?;
    let actions = Arc::new(RelayActions::new(relay));

    let handler = match GuessEventHandler::from_stack(config.event.clone(), &stack, actions) {
        Ok(handler) => handler,
        Err(e) => {
            warn!(error = %e, "Guess event not started");
            return Ok(());
        }
    };
    info!(channel = handler.channel_id(), "Guess the Mascot event: monitoring channel");

    let input = BufReader::new(tokio::io::stdin());
    moderate_lines(&handler, input, shutdown_signal()).await?;

    let snapshot = handler.metrics().snapshot();
    info!(
        seen = snapshot.messages_seen,
        accepted = snapshot.accepted,
        removed = snapshot.removed,
        correct_guesses = snapshot.correct_guesses,
        action_failures = snapshot.action_failures,
        lookup_failures = snapshot.lookup_failures,
        "Event summary"
    );
    Ok(())
}

/// Moderate each input line until EOF or `shutdown`, then wait for pending
/// notice retractions. Returns how many retractions ran.
async fn moderate_lines<R, S>(handler: &GuessEventHandler, input: R, shutdown: S) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut received = 0u64;
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = &mut shutdown => {
                warn!("Shutdown signal received, stopping");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        received += 1;
        let Some(message) = parse_line(&line, handler.channel_id(), received) else {
            continue;
        };
        let verdict = handler.handle(&message).await;
        println!("{}", serde_json::to_string(&verdict)?);
    }

    let retracted = handler.drain_notices().await;
    if retracted > 0 {
        info!(retracted, "Pending notices retracted");
    }
    Ok(retracted)
}

/// JSON lines are full messages, anything else is text in the monitored channel
fn parse_line(line: &str, channel_id: &str, sequence: u64) -> Option<IncomingMessage> {
    if line.trim_start().starts_with('{') {
        return match serde_json::from_str(line) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(error = %e, "Skipping malformed message");
                None
            }
        };
    }

    let author = Author {
        tag: "stdin".to_string(),
        ..Default::default()
    };
    Some(IncomingMessage::new(
        format!("stdin-{}", sequence),
        channel_id,
        author,
        line,
    ))
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging on stderr, keeping stdout for results
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("zoowatch=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zoowatch=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
