//! Log delivery over an incoming webhook

use crate::config::WebhookConfig;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;
use zoowatch_core::{Error, IncomingMessage, Result};
use zoowatch_event::{LogReport, ModerationActions, NoticeId};

/// Posts log reports to a chat webhook
#[derive(Debug, Clone)]
pub struct WebhookRelay {
    http: reqwest::Client,
    url: Url,
}

impl WebhookRelay {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url =
            Url::parse(url).map_err(|e| Error::config(format!("Invalid webhook URL: {}", e)))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("zoowatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, url })
    }

    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        Self::new(&config.url, Duration::from_secs(config.timeout_secs))
    }

    /// Deliver one report
    pub async fn post(&self, report: &LogReport) -> Result<()> {
        let response = self
            .http
            .post(self.url.clone())
            .json(&report.to_webhook_payload())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::delivery(format!("webhook returned {}", status)));
        }

        debug!(title = %report.title, "Log report delivered");
        Ok(())
    }
}

/// Moderation actions for running without a chat gateway.
///
/// Reports go to the webhook when one is configured. Everything else is
/// only traced, since there is no live message to touch.
pub struct RelayActions {
    relay: Option<WebhookRelay>,
    next_notice: AtomicU64,
}

impl RelayActions {
    pub fn new(relay: Option<WebhookRelay>) -> Self {
        Self {
            relay,
            next_notice: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl ModerationActions for RelayActions {
    async fn react(&self, message: &IncomingMessage, emoji: &str) -> Result<()> {
        info!(message_id = %message.id, emoji, "React");
        Ok(())
    }

    async fn delete(&self, message: &IncomingMessage) -> Result<()> {
        info!(message_id = %message.id, author = %message.author.tag, "Delete");
        Ok(())
    }

    async fn notify(&self, channel_id: &str, text: &str) -> Result<NoticeId> {
        let id = self.next_notice.fetch_add(1, Ordering::Relaxed);
        info!(channel = channel_id, notice = id, text, "Notice");
        Ok(NoticeId::new(id.to_string()))
    }

    async fn retract_notice(&self, channel_id: &str, notice: &NoticeId) -> Result<()> {
        debug!(channel = channel_id, notice = notice.as_str(), "Retract notice");
        Ok(())
    }

    async fn send_log(&self, log_channel_id: &str, report: &LogReport) -> Result<()> {
        match &self.relay {
            Some(relay) => relay.post(report).await,
            None => {
                info!(
                    log_channel = log_channel_id,
                    title = %report.title,
                    url = %report.url,
                    "Log report"
                );
                Ok(())
            }
        }
    }
}
