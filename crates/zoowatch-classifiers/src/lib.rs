//! zoowatch Classifiers
//!
//! Decides whether a chat message names an animal.
//!
//! Classification is layered:
//! - Lexicon: whole-word and multi-word matching against a local list of names
//! - Lookup: knowledge-base search scored by taxonomy terms in the snippets
//! - Animal: candidate phrases tried against the lookup, lexicon as fallback
//!
//! The knowledge base sits behind [`SearchClient`], so every layer can be
//! exercised offline with a stub.

pub mod animal;
pub mod candidates;
pub mod classifier;
pub mod config;
pub mod facts;
pub mod lexicon;
pub mod lookup;
pub mod text;
pub mod wikipedia;

pub use animal::{AnimalClassifier, ClassificationTrace, MatchStage};
pub use candidates::{
    CandidateGenerator, CandidateKind, CandidatePhrase, CandidatePolicy, WindowOrder,
};
pub use classifier::{Classifier, ClassifierTier};
pub use config::{ClassifierConfig, ClassifierStack, LexiconSource, LookupConfig};
pub use facts::{AnimalFact, FactFetcher, PageSummary, SummaryClient};
pub use lexicon::{Lexicon, LexiconMatcher, NegativeAssertions};
pub use lookup::{LookupClassifier, LookupEvidence, LookupPolicy, PhraseLookup, SearchClient};
pub use wikipedia::WikipediaClient;
pub use zoowatch_core::ClassificationResult;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::animal::AnimalClassifier;
    pub use crate::classifier::Classifier;
    pub use crate::lexicon::{Lexicon, LexiconMatcher};
    pub use crate::lookup::{LookupClassifier, PhraseLookup, SearchClient};
    pub use zoowatch_core::ClassificationResult;
}
