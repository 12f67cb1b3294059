//! Event configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use zoowatch_core::{Error, Result};

/// Placeholder replaced by the author mention in the removal notice
pub const MENTION_PLACEHOLDER: &str = "{mention}";

/// Settings for one guess-the-mascot event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Channel whose messages are moderated
    #[serde(default)]
    pub channel_id: Option<String>,

    /// Channel that receives log reports; unset disables reporting
    #[serde(default)]
    pub log_channel_id: Option<String>,

    /// The animal participants are trying to guess
    #[serde(default)]
    pub mascot: String,

    /// Reaction added to every accepted message
    #[serde(default = "default_reaction_emoji")]
    pub reaction_emoji: String,

    /// Seconds before the removal notice is retracted
    #[serde(default = "default_notice_ttl_secs")]
    pub notice_ttl_secs: u64,

    /// Removal notice text, `{mention}` becomes the author mention
    #[serde(default = "default_notice_template")]
    pub notice_template: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_id: None,
            log_channel_id: None,
            mascot: String::new(),
            reaction_emoji: default_reaction_emoji(),
            notice_ttl_secs: default_notice_ttl_secs(),
            notice_template: default_notice_template(),
        }
    }
}

impl EventConfig {
    /// Config for a monitored channel with defaults elsewhere
    pub fn for_channel(channel_id: impl Into<String>, mascot: impl Into<String>) -> Self {
        Self {
            channel_id: Some(channel_id.into()),
            mascot: mascot.into(),
            ..Default::default()
        }
    }

    /// The monitored channel, or a config error when none is set
    pub fn monitored_channel(&self) -> Result<&str> {
        match self.channel_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(Error::config("no monitored channel id configured")),
        }
    }

    /// How long a removal notice stays up
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }

    /// Removal notice addressed to `mention`
    pub fn notice_text(&self, mention: &str) -> String {
        self.notice_template.replace(MENTION_PLACEHOLDER, mention)
    }
}

fn default_reaction_emoji() -> String {
    "<:gnome:1342508917560971325>".to_string()
}

fn default_notice_ttl_secs() -> u64 {
    5
}

fn default_notice_template() -> String {
    "{mention}, your message was deleted because it did not contain any animal keywords. \
     Try to guess what the mascot animal is!"
        .to_string()
}
