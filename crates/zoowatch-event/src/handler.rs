//! Guess event message handler

use crate::actions::{ModerationActions, NoticeId};
use crate::config::EventConfig;
use crate::mascot::MascotMatcher;
use crate::metrics::EventMetrics;
use crate::report::LogReport;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use zoowatch_classifiers::{AnimalClassifier, ClassifierStack, FactFetcher};
use zoowatch_core::{ClassificationResult, IncomingMessage, Result};

/// What the handler did with a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Bot author or another channel
    Ignored,

    /// Names an animal; the message stays
    Accepted {
        animal: String,
        correct_guess: bool,
        residual_words: Vec<String>,
    },

    /// Names no animal; `deleted` is false when the delete itself failed
    Removed { deleted: bool },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

/// Moderates the monitored channel of a guess-the-mascot event
pub struct GuessEventHandler {
    channel_id: String,
    config: EventConfig,
    mascot: MascotMatcher,
    classifier: Arc<AnimalClassifier>,
    facts: Arc<FactFetcher>,
    actions: Arc<dyn ModerationActions>,
    metrics: EventMetrics,
    pending_notices: Mutex<JoinSet<()>>,
}

impl GuessEventHandler {
    /// Create a handler; fails when `config` has no monitored channel
    pub fn new(
        config: EventConfig,
        classifier: Arc<AnimalClassifier>,
        facts: Arc<FactFetcher>,
        actions: Arc<dyn ModerationActions>,
    ) -> Result<Self> {
        let channel_id = config.monitored_channel()?.to_string();
        let mascot = MascotMatcher::new(&config.mascot);
        if mascot.mascot().is_empty() {
            warn!("No mascot configured, no guess will count as correct");
        }
        if config.log_channel_id.is_none() {
            debug!("No log channel configured, accepted messages are not reported");
        }

        Ok(Self {
            channel_id,
            mascot,
            config,
            classifier,
            facts,
            actions,
            metrics: EventMetrics::new(),
            pending_notices: Mutex::new(JoinSet::new()),
        })
    }

    /// Create a handler around a built classifier stack
    pub fn from_stack(
        config: EventConfig,
        stack: &ClassifierStack,
        actions: Arc<dyn ModerationActions>,
    ) -> Result<Self> {
        Self::new(
            config,
            Arc::clone(&stack.classifier),
            Arc::clone(&stack.facts),
            actions,
        )
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn metrics(&self) -> &EventMetrics {
        &self.metrics
    }

    /// Moderate one message
    pub async fn handle(&self, message: &IncomingMessage) -> Verdict {
        if message.author.bot || message.channel_id != self.channel_id {
            return Verdict::Ignored;
        }
        self.metrics.record_message();

        let (result, trace) = self.classifier.classify_traced(&message.content).await;
        if trace.lookups_failed > 0 {
            self.metrics.record_lookup_failures(trace.lookups_failed as u64);
        }
        debug!(
            message_id = %message.id,
            stage = ?trace.stage,
            lookups = trace.lookups_attempted,
            "Message classified"
        );

        match result.animal_name() {
            Some(animal) => self.accept(message, animal, &result).await,
            None => self.remove(message).await,
        }
    }

    /// Wait for every scheduled notice retraction to finish; returns how many ran
    pub async fn drain_notices(&self) -> usize {
        let mut pending = std::mem::take(&mut *self.pending_notices.lock().await);
        let mut finished = 0;
        while let Some(joined) = pending.join_next().await {
            match joined {
                Ok(()) => finished += 1,
                Err(e) => warn!(error = %e, "Notice retraction task failed"),
            }
        }
        finished
    }

    async fn accept(
        &self,
        message: &IncomingMessage,
        animal: &str,
        result: &ClassificationResult,
    ) -> Verdict {
        let correct_guess = self.mascot.is_correct_guess(&message.content);
        self.metrics.record_accepted(correct_guess);

        if let Err(e) = self
            .actions
            .react(message, &self.config.reaction_emoji)
            .await
        {
            self.metrics.record_action_failure();
            error!(message_id = %message.id, error = %e, "Failed to react to animal message");
        }

        if let Some(log_channel) = &self.config.log_channel_id {
            let fact = self.facts.fetch(animal).await;
            let report = LogReport::build(
                message,
                animal,
                &fact,
                correct_guess,
                &result.residual_words,
            );
            if let Err(e) = self.actions.send_log(log_channel, &report).await {
                self.metrics.record_action_failure();
                error!(message_id = %message.id, error = %e, "Failed to send log report");
            }
        }

        if correct_guess {
            info!(
                author = %message.author.tag,
                content = %message.content,
                "Correct mascot guess"
            );
        } else if result.has_residual_words() {
            info!(
                animal,
                non_animal = %result.residual_words.join(", "),
                content = %message.content,
                "Mixed content message"
            );
        }

        Verdict::Accepted {
            animal: animal.to_string(),
            correct_guess,
            residual_words: result.residual_words.clone(),
        }
    }

    async fn remove(&self, message: &IncomingMessage) -> Verdict {
        self.metrics.record_removed();

        if let Err(e) = self.actions.delete(message).await {
            self.metrics.record_action_failure();
            error!(message_id = %message.id, error = %e, "Failed to delete message");
            return Verdict::Removed { deleted: false };
        }

        let text = self.config.notice_text(&message.author.mention());
        match self.actions.notify(&message.channel_id, &text).await {
            Ok(notice) => {
                self.schedule_retraction(message.channel_id.clone(), notice)
                    .await
            }
            Err(e) => {
                self.metrics.record_action_failure();
                error!(channel = %message.channel_id, error = %e, "Failed to post removal notice");
            }
        }

        Verdict::Removed { deleted: true }
    }

    async fn schedule_retraction(&self, channel_id: String, notice: NoticeId) {
        let actions = Arc::clone(&self.actions);
        let metrics = self.metrics.clone();
        let ttl: Duration = self.config.notice_ttl();

        let mut pending = self.pending_notices.lock().await;
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = actions.retract_notice(&channel_id, &notice).await {
                metrics.record_action_failure();
                error!(notice = notice.as_str(), error = %e, "Failed to retract notice");
            }
        });
    }
}
