//! Configuration for the animal classifier stack

use crate::animal::AnimalClassifier;
use crate::candidates::CandidatePolicy;
use crate::facts::FactFetcher;
use crate::lexicon::{Lexicon, LexiconMatcher, NegativeAssertions, DEFAULT_NEGATIVE_PHRASES};
use crate::lookup::{LookupClassifier, LookupPolicy, DEFAULT_INDICATOR_TERMS};
use crate::wikipedia::{WikipediaClient, DEFAULT_SEARCH_URL, DEFAULT_SUMMARY_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use zoowatch_core::{Error, Result};

/// Configuration for the whole classifier stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Where the animal lexicon comes from
    #[serde(default)]
    pub lexicon: LexiconSource,

    /// Phrases that deny naming an animal
    #[serde(default = "default_negative_phrases")]
    pub negative_phrases: Vec<String>,

    /// Candidate generation and residual word limits
    #[serde(default)]
    pub candidates: CandidatePolicy,

    /// Knowledge-base lookup settings
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// Lexicon source specification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LexiconSource {
    /// The list bundled with the crate
    #[default]
    Builtin,

    /// A list or YAML file on disk
    File { path: PathBuf },

    /// Names given inline
    Inline { entries: Vec<String> },
}

/// Knowledge-base lookup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Consult the knowledge base at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Search API endpoint
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Page summary endpoint
    #[serde(default = "default_summary_url")]
    pub summary_url: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Leading results examined per search
    #[serde(default = "default_top_results")]
    pub top_results: usize,

    /// Distinct indicator terms needed in one snippet
    #[serde(default = "default_min_indicator_terms")]
    pub min_indicator_terms: usize,

    /// Taxonomy indicator terms
    #[serde(default = "default_indicator_terms")]
    pub indicator_terms: Vec<String>,

    /// Request timeout; unset means the HTTP client default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            search_url: default_search_url(),
            summary_url: default_summary_url(),
            user_agent: default_user_agent(),
            top_results: default_top_results(),
            min_indicator_terms: default_min_indicator_terms(),
            indicator_terms: default_indicator_terms(),
            timeout_secs: None,
        }
    }
}

impl LookupConfig {
    /// Scoring policy described by this config
    pub fn policy(&self) -> LookupPolicy {
        LookupPolicy {
            top_results: self.top_results,
            min_indicator_terms: self.min_indicator_terms,
            indicator_terms: self
                .indicator_terms
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    /// Wikipedia client for the configured endpoints
    pub fn client(&self) -> Result<WikipediaClient> {
        WikipediaClient::new(
            self.search_url.clone(),
            &self.summary_url,
            &self.user_agent,
            self.timeout_secs.map(Duration::from_secs),
        )
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            lexicon: LexiconSource::default(),
            negative_phrases: default_negative_phrases(),
            candidates: CandidatePolicy::default(),
            lookup: LookupConfig::default(),
        }
    }
}

/// Classifier and fact fetcher sharing one lexicon and one HTTP client
#[derive(Clone)]
pub struct ClassifierStack {
    /// Message classifier
    pub classifier: Arc<AnimalClassifier>,

    /// Fact source for log reports
    pub facts: Arc<FactFetcher>,
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Invalid classifier config: {}", e)))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.lookup.enabled && self.lookup.top_results == 0 {
            return Err(Error::config("lookup.top_results must be at least 1"));
        }
        if self.lookup.enabled && self.lookup.indicator_terms.is_empty() {
            return Err(Error::config("lookup.indicator_terms must not be empty"));
        }
        if self.candidates.min_word_len == 0 {
            return Err(Error::config("candidates.min_word_len must be at least 1"));
        }
        Ok(())
    }

    /// Load the configured lexicon
    pub fn load_lexicon(&self) -> Result<Lexicon> {
        match &self.lexicon {
            LexiconSource::Builtin => Lexicon::builtin(),
            LexiconSource::File { path } => Lexicon::from_file(path),
            LexiconSource::Inline { entries } => Lexicon::new(entries),
        }
    }

    /// Build the classifier and fact fetcher
    pub fn build(&self) -> Result<ClassifierStack> {
        self.validate()?;

        let lexicon = Arc::new(self.load_lexicon()?);
        info!(names = lexicon.len(), "Loaded animal lexicon");

        let negatives = NegativeAssertions::new(&self.negative_phrases)?;
        debug!(phrases = negatives.phrases().len(), "Loaded negative phrases");
        let matcher = LexiconMatcher::new(Arc::clone(&lexicon)).with_negatives(negatives);
        let mut classifier =
            AnimalClassifier::new(matcher).with_candidate_policy(self.candidates.clone());
        let mut facts = FactFetcher::new().with_lexicon(lexicon);

        if self.lookup.enabled {
            let client = Arc::new(self.lookup.client()?);
            let lookup = Arc::new(
                LookupClassifier::new(client.clone()).with_policy(self.lookup.policy()),
            );
            classifier = classifier.with_lookup(lookup.clone());
            facts = facts.with_lookup(lookup).with_summaries(client);
            info!(endpoint = %self.lookup.search_url, "Knowledge-base lookup enabled");
        } else {
            info!("Knowledge-base lookup disabled, classifying with the lexicon only");
        }

        Ok(ClassifierStack {
            classifier: Arc::new(classifier),
            facts: Arc::new(facts),
        })
    }
}

fn default_negative_phrases() -> Vec<String> {
    DEFAULT_NEGATIVE_PHRASES.iter().map(|p| p.to_string()).collect()
}

fn default_indicator_terms() -> Vec<String> {
    DEFAULT_INDICATOR_TERMS.iter().map(|t| t.to_string()).collect()
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_summary_url() -> String {
    DEFAULT_SUMMARY_URL.to_string()
}

fn default_user_agent() -> String {
    format!("zoowatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_top_results() -> usize {
    3
}

fn default_min_indicator_terms() -> usize {
    2
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::WindowOrder;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = ClassifierConfig::from_yaml("{}").unwrap();

        assert_eq!(config, ClassifierConfig::default());
        assert_eq!(config.lookup.min_indicator_terms, 2);
        assert_eq!(config.lookup.top_results, 3);
        assert_eq!(config.candidates.residual_min_len, 3);
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
lexicon:
  source: inline
  entries: ["Red Panda", "owl"]
candidates:
  window_order: longest_first
  residual_min_len: 4
lookup:
  enabled: false
  min_indicator_terms: 3
"#;
        let config = ClassifierConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.candidates.window_order, WindowOrder::LongestFirst);
        assert_eq!(config.candidates.min_word_len, 3);
        assert!(!config.lookup.enabled);
        assert_eq!(config.lookup.policy().min_indicator_terms, 3);
        assert_eq!(config.load_lexicon().unwrap().len(), 2);
    }

    #[test]
    fn test_file_lexicon_source() {
        let yaml = "lexicon:\n  source: file\n  path: /srv/zoo/animals.txt\n";
        let config = ClassifierConfig::from_yaml(yaml).unwrap();

        assert_eq!(
            config.lexicon,
            LexiconSource::File {
                path: PathBuf::from("/srv/zoo/animals.txt")
            }
        );
    }

    #[test]
    fn test_validate_rejects_zero_top_results() {
        let mut config = ClassifierConfig::default();
        config.lookup.top_results = 0;

        assert!(config.validate().is_err());
        assert!(config.build().is_err());
    }

    #[tokio::test]
    async fn test_offline_build_classifies_from_lexicon() {
        let mut config = ClassifierConfig::default();
        config.lookup.enabled = false;

        let stack = config.build().unwrap();
        assert!(!stack.classifier.has_lookup());

        let result = stack.classifier.classify_message("I saw a red panda today").await;
        assert_eq!(result.matched_phrase.as_deref(), Some("red panda"));
    }

    #[test]
    fn test_online_build() {
        let stack = ClassifierConfig::default().build().unwrap();
        assert!(stack.classifier.has_lookup());
    }
}
