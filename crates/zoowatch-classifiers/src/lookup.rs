//! Knowledge-base lookup classifier
//!
//! Decides whether a single phrase names an animal by searching a remote
//! knowledge base and counting taxonomy terms in the top result snippets.
//! Only results whose title contains the phrase are scored.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use zoowatch_core::{Result, SearchHit};

/// Words that suggest a search result describes an animal
pub const DEFAULT_INDICATOR_TERMS: &[&str] = &[
    "species", "genus", "family", "order", "class", "phylum", "kingdom", "mammal", "bird",
    "reptile", "amphibian", "fish", "insect", "arachnid", "taxonomy", "zoology", "wildlife",
    "fauna",
];

/// A knowledge-base search endpoint
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Search for `query`, best results first
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Get the client name
    fn name(&self) -> &str;
}

/// Yes/no judgement on whether a phrase names an animal
#[async_trait]
pub trait PhraseLookup: Send + Sync {
    /// Judge `phrase`; errors mean the judgement could not be made
    async fn lookup(&self, phrase: &str) -> Result<bool>;
}

/// Scoring policy for search evidence
#[derive(Debug, Clone)]
pub struct LookupPolicy {
    /// How many leading results are examined
    pub top_results: usize,

    /// Distinct indicator terms one snippet needs
    pub min_indicator_terms: usize,

    /// Lowercase indicator terms
    pub indicator_terms: Vec<String>,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self {
            top_results: 3,
            min_indicator_terms: 2,
            indicator_terms: DEFAULT_INDICATOR_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl LookupPolicy {
    /// Count distinct indicator terms in `snippet`
    pub fn indicator_count(&self, snippet: &str) -> usize {
        let snippet = snippet.to_lowercase();
        self.indicator_terms
            .iter()
            .filter(|term| snippet.contains(term.as_str()))
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Search results gathered for one phrase
#[derive(Debug, Clone)]
pub struct LookupEvidence {
    /// The phrase that was searched, lowercased
    pub phrase: String,

    /// Leading search results
    pub hits: Vec<SearchHit>,
}

impl LookupEvidence {
    /// Indicator counts for results whose title contains the phrase
    pub fn qualifying_counts<'a>(
        &'a self,
        policy: &'a LookupPolicy,
    ) -> impl Iterator<Item = usize> + 'a {
        self.hits
            .iter()
            .filter(|hit| hit.title.to_lowercase().contains(&self.phrase))
            .map(|hit| policy.indicator_count(&hit.snippet))
    }

    /// Whether any qualifying result meets the policy threshold
    pub fn names_animal(&self, policy: &LookupPolicy) -> bool {
        self.qualifying_counts(policy)
            .any(|count| count >= policy.min_indicator_terms)
    }
}

/// Classifier backed by a [`SearchClient`]
#[derive(Clone)]
pub struct LookupClassifier {
    client: Arc<dyn SearchClient>,
    policy: LookupPolicy,
}

impl LookupClassifier {
    /// Create a lookup classifier with the default policy
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self {
            client,
            policy: LookupPolicy::default(),
        }
    }

    /// Replace the scoring policy
    pub fn with_policy(mut self, policy: LookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The scoring policy in effect
    pub fn policy(&self) -> &LookupPolicy {
        &self.policy
    }

    /// Search for `phrase` and keep the leading results
    pub async fn gather(&self, phrase: &str) -> Result<LookupEvidence> {
        let phrase = phrase.to_lowercase();
        let mut hits = self.client.search(&phrase).await?;
        hits.truncate(self.policy.top_results);

        Ok(LookupEvidence { phrase, hits })
    }

    /// Judge `phrase`, treating any failure as "not an animal"
    pub async fn classify_via_lookup(&self, phrase: &str) -> bool {
        match self.lookup(phrase).await {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    client = self.client.name(),
                    phrase,
                    error = %e,
                    "Knowledge-base lookup failed"
                );
                false
            }
        }
    }
}

#[async_trait]
impl PhraseLookup for LookupClassifier {
    async fn lookup(&self, phrase: &str) -> Result<bool> {
        let evidence = self.gather(phrase).await?;
        let found = evidence.names_animal(&self.policy);

        debug!(
            phrase = %evidence.phrase,
            hits = evidence.hits.len(),
            found,
            "Scored knowledge-base evidence"
        );

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zoowatch_core::Error;

    struct FixedSearch {
        hits: Vec<SearchHit>,
    }

    #[async_trait]
    impl SearchClient for FixedSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>> {
            Ok(self.hits.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenSearch;

    #[async_trait]
    impl SearchClient for BrokenSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>> {
            Err(Error::http("connection refused"))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn classifier(hits: Vec<SearchHit>) -> LookupClassifier {
        LookupClassifier::new(Arc::new(FixedSearch { hits }))
    }

    #[test]
    fn test_indicator_count_is_distinct() {
        let policy = LookupPolicy::default();

        assert_eq!(policy.indicator_count("A species of species"), 1);
        assert_eq!(policy.indicator_count("Mammal SPECIES in the genus Ailurus"), 3);
        assert_eq!(policy.indicator_count("a web browser"), 0);
    }

    #[tokio::test]
    async fn test_two_terms_classify_as_animal() {
        let lookup = classifier(vec![SearchHit::new(
            "Red panda",
            "The red panda is a small mammal species native to the Himalayas",
        )]);

        assert!(lookup.classify_via_lookup("Red Panda").await);
    }

    #[tokio::test]
    async fn test_single_term_is_not_enough() {
        let lookup = classifier(vec![SearchHit::new(
            "Python",
            "Python is a programming language used by every species of developer",
        )]);

        assert!(!lookup.classify_via_lookup("python").await);
    }

    #[tokio::test]
    async fn test_title_must_contain_phrase() {
        let lookup = classifier(vec![SearchHit::new(
            "Ailurus fulgens",
            "A mammal species in the family Ailuridae",
        )]);

        assert!(!lookup.classify_via_lookup("red panda").await);
    }

    #[tokio::test]
    async fn test_only_top_results_are_scored() {
        let mut hits = vec![
            SearchHit::new("Fox (band)", "A band"),
            SearchHit::new("Fox Broadcasting", "A network"),
            SearchHit::new("Fox News", "A channel"),
        ];
        hits.push(SearchHit::new("Red fox", "A mammal species of the order Carnivora"));

        let lookup = classifier(hits.clone());
        assert!(!lookup.classify_via_lookup("fox").await);

        let policy = LookupPolicy {
            top_results: 4,
            ..Default::default()
        };
        let lookup = classifier(hits).with_policy(policy);
        assert!(lookup.classify_via_lookup("fox").await);
    }

    #[tokio::test]
    async fn test_threshold_is_configurable() {
        let hit = SearchHit::new("Axolotl", "The axolotl is an amphibian");
        let policy = LookupPolicy {
            min_indicator_terms: 1,
            ..Default::default()
        };

        assert!(!classifier(vec![hit.clone()]).classify_via_lookup("axolotl").await);
        assert!(
            classifier(vec![hit])
                .with_policy(policy)
                .classify_via_lookup("axolotl")
                .await
        );
    }

    #[tokio::test]
    async fn test_failures_are_soft() {
        let lookup = LookupClassifier::new(Arc::new(BrokenSearch));

        assert!(!lookup.classify_via_lookup("owl").await);
        assert!(lookup.lookup("owl").await.is_err());
    }
}
