//! Animal-phrase classifier
//!
//! Combines the knowledge-base lookup with the local lexicon. Strategies are
//! tried in a fixed order and the first success wins:
//!
//! 1. negative assertion ("not an animal") short-circuits to a negative result
//! 2. lookup of each candidate phrase from [`CandidateGenerator`]
//! 3. the [`LexiconMatcher`] on the full message
//!
//! A failed lookup only rules out that one candidate. When the knowledge base
//! is down entirely the result is whatever the lexicon says.

use crate::candidates::{CandidateGenerator, CandidateKind, CandidatePolicy};
use crate::classifier::{Classifier, ClassifierTier};
use crate::lexicon::LexiconMatcher;
use crate::lookup::PhraseLookup;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use zoowatch_core::{ClassificationResult, Result};

/// Which strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    /// Negative-assertion phrase found
    NegativeAssertion,
    /// Knowledge base accepted a candidate of this kind
    Lookup(CandidateKind),
    /// Lexicon fallback found a name
    Lexicon,
    /// Nothing matched
    NoMatch,
}

/// Per-call account of how a result was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTrace {
    /// Stage that decided the result
    pub stage: MatchStage,

    /// Lookups issued
    pub lookups_attempted: usize,

    /// Lookups that errored
    pub lookups_failed: usize,
}

impl ClassificationTrace {
    fn new() -> Self {
        Self {
            stage: MatchStage::NoMatch,
            lookups_attempted: 0,
            lookups_failed: 0,
        }
    }

    /// Whether every lookup issued for the message errored
    pub fn lookup_unavailable(&self) -> bool {
        self.lookups_attempted > 0 && self.lookups_failed == self.lookups_attempted
    }
}

/// Classifier deciding whether a chat message names an animal
#[derive(Clone)]
pub struct AnimalClassifier {
    lexicon: LexiconMatcher,
    lookup: Option<Arc<dyn PhraseLookup>>,
    candidates: CandidateGenerator,
}

impl AnimalClassifier {
    /// Create a lexicon-only classifier
    pub fn new(lexicon: LexiconMatcher) -> Self {
        let policy = CandidatePolicy {
            residual_min_len: lexicon.residual_min_len(),
            ..Default::default()
        };
        Self {
            lexicon,
            lookup: None,
            candidates: CandidateGenerator::new(policy),
        }
    }

    /// Consult `lookup` before falling back to the lexicon
    pub fn with_lookup(mut self, lookup: Arc<dyn PhraseLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Replace the candidate policy; its residual length also applies to the lexicon
    pub fn with_candidate_policy(mut self, policy: CandidatePolicy) -> Self {
        self.lexicon = self.lexicon.with_residual_min_len(policy.residual_min_len);
        self.candidates = CandidateGenerator::new(policy);
        self
    }

    /// The lexicon fallback
    pub fn lexicon(&self) -> &LexiconMatcher {
        &self.lexicon
    }

    /// Whether a knowledge-base lookup is configured
    pub fn has_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    /// Classify a message; never fails on lookup errors
    pub async fn classify_message(&self, text: &str) -> ClassificationResult {
        self.classify_traced(text).await.0
    }

    /// Classify a message and report which stage decided
    pub async fn classify_traced(&self, text: &str) -> (ClassificationResult, ClassificationTrace) {
        let mut trace = ClassificationTrace::new();

        if let Some(negative) = self.lexicon.negation(text) {
            trace.stage = MatchStage::NegativeAssertion;
            return (negative, trace);
        }

        if let Some(lookup) = &self.lookup {
            let mut tried = HashSet::new();

            for candidate in self.candidates.generate(text) {
                if !tried.insert(candidate.text.clone()) {
                    continue;
                }
                trace.lookups_attempted += 1;

                match lookup.lookup(&candidate.text).await {
                    Ok(true) => {
                        debug!(phrase = %candidate.text, kind = ?candidate.kind, "Lookup matched");
                        trace.stage = MatchStage::Lookup(candidate.kind);
                        let residual = self.candidates.residual_words(&candidate, text);
                        return (ClassificationResult::animal(candidate.text, residual), trace);
                    }
                    Ok(false) => {}
                    Err(e) => {
                        trace.lookups_failed += 1;
                        warn!(
                            phrase = %candidate.text,
                            error = %e,
                            transient = e.is_transient(),
                            "Lookup failed, skipping candidate"
                        );
                    }
                }
            }

            if trace.lookup_unavailable() {
                warn!(
                    failed = trace.lookups_failed,
                    "Knowledge base unavailable, using lexicon only"
                );
            }
        }

        let result = self.lexicon.match_text(text);
        trace.stage = if result.is_animal {
            MatchStage::Lexicon
        } else {
            MatchStage::NoMatch
        };
        (result, trace)
    }
}

#[async_trait::async_trait]
impl Classifier for AnimalClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        Ok(self.classify_message(text).await)
    }

    fn name(&self) -> &str {
        "animal"
    }

    fn tier(&self) -> ClassifierTier {
        if self.lookup.is_some() {
            ClassifierTier::Network
        } else {
            ClassifierTier::Local
        }
    }
}
