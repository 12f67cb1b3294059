//! Bot configuration
//!
//! Layers, later wins: the YAML file, `ZOOWATCH__*` environment variables
//! (`__` separates nesting, e.g. `ZOOWATCH__EVENT__MASCOT`), then flags.

use anyhow::Context;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use zoowatch_classifiers::ClassifierConfig;
use zoowatch_event::EventConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ZOOWATCH";

/// Log channel assumed when reports only go to the webhook
pub const WEBHOOK_LOG_CHANNEL: &str = "webhook";

/// Whole bot configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Event channel, mascot, and notice settings
    #[serde(default)]
    pub event: EventConfig,

    /// Classifier stack settings
    #[serde(default)]
    pub classifiers: ClassifierConfig,

    /// Where log reports are relayed
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

/// Webhook relay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Incoming webhook URL of the log channel
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_webhook_timeout_secs")]
    pub timeout_secs: u64,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mascot: Option<String>,
    pub channel: Option<String>,
    pub log_channel: Option<String>,
    pub webhook: Option<String>,
    pub offline: bool,
}

impl BotConfig {
    /// Load configuration from file, environment, and CLI overrides
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<Self> {
        let builder = file_layer(Config::builder(), path)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));
        Self::finish(builder, overrides)
    }

    /// Load without reading the environment
    pub fn load_file(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<Self> {
        Self::finish(file_layer(Config::builder(), path), overrides)
    }

    fn finish(
        builder: ConfigBuilder<DefaultState>,
        overrides: &Overrides,
    ) -> anyhow::Result<Self> {
        let mut config: BotConfig = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.apply(overrides);
        config
            .classifiers
            .validate()
            .context("Invalid classifier configuration")?;
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(mascot) = &overrides.mascot {
            self.event.mascot = mascot.clone();
        }
        if let Some(channel) = &overrides.channel {
            self.event.channel_id = Some(channel.clone());
        }
        if let Some(log_channel) = &overrides.log_channel {
            self.event.log_channel_id = Some(log_channel.clone());
        }
        if let Some(url) = &overrides.webhook {
            let timeout_secs = self
                .webhook
                .as_ref()
                .map_or_else(default_webhook_timeout_secs, |w| w.timeout_secs);
            self.webhook = Some(WebhookConfig {
                url: url.clone(),
                timeout_secs,
            });
        }
        if overrides.offline {
            self.classifiers.lookup.enabled = false;
        }
        if self.webhook.is_some() && self.event.log_channel_id.is_none() {
            self.event.log_channel_id = Some(WEBHOOK_LOG_CHANNEL.to_string());
        }
    }
}

fn file_layer(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> ConfigBuilder<DefaultState> {
    match path.and_then(Path::to_str) {
        Some(path) => builder.add_source(File::new(path, FileFormat::Yaml).required(false)),
        None => builder,
    }
}

fn default_webhook_timeout_secs() -> u64 {
    10
}
