//! Classifier trait and common types

use async_trait::async_trait;
use zoowatch_core::{ClassificationResult, Result};

/// Trait for all message classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given message text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Get the tier (where the classifier gets its answers from)
    fn tier(&self) -> ClassifierTier;
}

/// Classifier tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierTier {
    /// Answers from in-process data only
    Local,
    /// May call out to a remote knowledge base
    Network,
}

impl ClassifierTier {
    /// Whether classifying can block on network I/O
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network)
    }
}
