//! Chat side effects of moderation

use crate::report::LogReport;
use async_trait::async_trait;
use zoowatch_core::{IncomingMessage, Result};

/// Handle to a posted notice, used to retract it later
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoticeId(pub String);

impl NoticeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Moderation primitives the event handler needs from the chat platform
#[async_trait]
pub trait ModerationActions: Send + Sync {
    /// Add a reaction to `message`
    async fn react(&self, message: &IncomingMessage, emoji: &str) -> Result<()>;

    /// Delete `message`
    async fn delete(&self, message: &IncomingMessage) -> Result<()>;

    /// Post `text` in `channel_id`
    async fn notify(&self, channel_id: &str, text: &str) -> Result<NoticeId>;

    /// Remove a notice posted with [`ModerationActions::notify`]
    async fn retract_notice(&self, channel_id: &str, notice: &NoticeId) -> Result<()>;

    /// Deliver a report to the log channel
    async fn send_log(&self, log_channel_id: &str, report: &LogReport) -> Result<()>;
}
