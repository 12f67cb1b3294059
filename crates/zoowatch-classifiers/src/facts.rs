//! Animal facts for event log reports

use crate::lexicon::Lexicon;
use crate::lookup::PhraseLookup;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use zoowatch_core::Result;

/// Summary of a knowledge-base page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    /// Canonical page title
    pub title: String,

    /// Introductory extract
    pub extract: String,

    /// Link to the page
    pub page_url: Option<String>,
}

/// Source of page summaries
#[async_trait]
pub trait SummaryClient: Send + Sync {
    /// Summary for the page titled `title`, `None` if there is no such page
    async fn summary(&self, title: &str) -> Result<Option<PageSummary>>;
}

/// A fact to show alongside an animal guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalFact {
    /// The animal the fact is about
    pub animal: String,

    /// Fact text
    pub fact: String,

    /// Where the fact came from
    pub source_url: Option<String>,
}

impl AnimalFact {
    /// Stock fact used when nothing better is available
    pub fn generic(animal: &str) -> Self {
        Self {
            animal: animal.to_string(),
            fact: format!(
                "The {} is a fascinating creature in the animal kingdom!",
                animal
            ),
            source_url: None,
        }
    }
}

/// Fetches facts for animals named in guesses
#[derive(Clone, Default)]
pub struct FactFetcher {
    lexicon: Option<Arc<Lexicon>>,
    lookup: Option<Arc<dyn PhraseLookup>>,
    summaries: Option<Arc<dyn SummaryClient>>,
}

impl FactFetcher {
    /// A fetcher that only hands out the stock fact
    pub fn new() -> Self {
        Self::default()
    }

    /// Names in `lexicon` count as confirmed animals
    pub fn with_lexicon(mut self, lexicon: Arc<Lexicon>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Confirm unknown names through `lookup`
    pub fn with_lookup(mut self, lookup: Arc<dyn PhraseLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Read facts from `summaries`
    pub fn with_summaries(mut self, summaries: Arc<dyn SummaryClient>) -> Self {
        self.summaries = Some(summaries);
        self
    }

    async fn confirmed(&self, animal: &str) -> bool {
        if self.lexicon.as_ref().is_some_and(|l| l.contains(animal)) {
            return true;
        }
        let Some(lookup) = &self.lookup else {
            return false;
        };
        match lookup.lookup(animal).await {
            Ok(found) => found,
            Err(e) => {
                warn!(animal, error = %e, "Could not confirm animal for fact");
                false
            }
        }
    }

    /// Fact for `animal`; falls back to the stock fact on any problem
    pub async fn fetch(&self, animal: &str) -> AnimalFact {
        let Some(summaries) = &self.summaries else {
            return AnimalFact::generic(animal);
        };
        if !self.confirmed(animal).await {
            debug!(animal, "Not a confirmed animal, using stock fact");
            return AnimalFact::generic(animal);
        }

        match summaries.summary(animal).await {
            Ok(Some(summary)) if !summary.extract.trim().is_empty() => AnimalFact {
                animal: animal.to_string(),
                fact: summary.extract,
                source_url: summary.page_url,
            },
            Ok(_) => AnimalFact::generic(animal),
            Err(e) => {
                warn!(animal, error = %e, "Failed to fetch page summary");
                AnimalFact::generic(animal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use zoowatch_core::Error;

    struct StaticSummary {
        summary: Option<PageSummary>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SummaryClient for StaticSummary {
        async fn summary(&self, _title: &str) -> Result<Option<PageSummary>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.summary.clone())
        }
    }

    struct FailingSummary;

    #[async_trait]
    impl SummaryClient for FailingSummary {
        async fn summary(&self, _title: &str) -> Result<Option<PageSummary>> {
            Err(Error::Timeout)
        }
    }

    struct Always(bool);

    #[async_trait]
    impl PhraseLookup for Always {
        async fn lookup(&self, _phrase: &str) -> Result<bool> {
            Ok(self.0)
        }
    }

    fn owl_summary() -> Arc<StaticSummary> {
        Arc::new(StaticSummary {
            summary: Some(PageSummary {
                title: "Owl".to_string(),
                extract: "Owls are birds from the order Strigiformes.".to_string(),
                page_url: Some("https://en.wikipedia.org/wiki/Owl".to_string()),
            }),
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_confirmed_animal_gets_summary() {
        let fetcher = FactFetcher::new()
            .with_lookup(Arc::new(Always(true)))
            .with_summaries(owl_summary());

        let fact = fetcher.fetch("owl").await;
        assert_eq!(fact.fact, "Owls are birds from the order Strigiformes.");
        assert!(fact.source_url.is_some());
    }

    #[tokio::test]
    async fn test_lexicon_confirms_without_lookup() {
        let lexicon = Arc::new(Lexicon::new(["owl"]).unwrap());
        let summaries = owl_summary();
        let fetcher = FactFetcher::new()
            .with_lexicon(lexicon)
            .with_lookup(Arc::new(Always(false)))
            .with_summaries(summaries.clone());

        let fact = fetcher.fetch("owl").await;
        assert_ne!(fact, AnimalFact::generic("owl"));
        assert_eq!(summaries.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_unconfirmed_animal_gets_stock_fact() {
        let summaries = owl_summary();
        let fetcher = FactFetcher::new()
            .with_lookup(Arc::new(Always(false)))
            .with_summaries(summaries.clone());

        assert_eq!(fetcher.fetch("owl").await, AnimalFact::generic("owl"));
        assert_eq!(summaries.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_summary_failure_gets_stock_fact() {
        let fetcher = FactFetcher::new()
            .with_lookup(Arc::new(Always(true)))
            .with_summaries(Arc::new(FailingSummary));

        let fact = fetcher.fetch("red panda").await;
        assert_eq!(
            fact.fact,
            "The red panda is a fascinating creature in the animal kingdom!"
        );
    }

    #[tokio::test]
    async fn test_no_sources_gets_stock_fact() {
        assert_eq!(
            FactFetcher::new().fetch("yak").await,
            AnimalFact::generic("yak")
        );
    }
}
