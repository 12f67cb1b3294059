//! Local animal lexicon and the offline matcher built on it

use crate::classifier::{Classifier, ClassifierTier};
use crate::text::{at_word_boundary, contains_word, residual_words, tokenize};
use aho_corasick::AhoCorasick;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use zoowatch_core::{ClassificationResult, Error, Result};

const BUILTIN_LIST: &str = include_str!("../data/animals.txt");

/// Phrases that mean "this message is not naming an animal"
pub const DEFAULT_NEGATIVE_PHRASES: &[&str] = &[
    "not an animal",
    "isn't an animal",
    "is not an animal",
    "no animal",
];

/// Immutable set of lowercase animal names
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Multi-word names, longest first
    multi_word: Vec<String>,

    /// Single-word names, in list order
    single_word: Vec<String>,

    single_matcher: AhoCorasick,
}

impl Lexicon {
    /// Build a lexicon from raw entries
    ///
    /// Entries are lowercased and trimmed; inner whitespace collapses to one
    /// space. Blank entries and repeats are dropped.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut multi_word = Vec::new();
        let mut single_word = Vec::new();

        for entry in entries {
            let words: Vec<_> = entry
                .as_ref()
                .split_whitespace()
                .map(str::to_lowercase)
                .collect();
            if words.is_empty() {
                continue;
            }
            let name = words.join(" ");
            if !seen.insert(name.clone()) {
                continue;
            }
            if words.len() > 1 {
                multi_word.push(name);
            } else {
                single_word.push(name);
            }
        }

        // Stable: equal lengths keep list order.
        multi_word.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));

        let single_matcher = AhoCorasick::new(&single_word)
            .map_err(|e| Error::config(format!("Failed to build lexicon matcher: {}", e)))?;

        Ok(Self {
            multi_word,
            single_word,
            single_matcher,
        })
    }

    /// The lexicon bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::parse_list(BUILTIN_LIST)
    }

    /// Parse a newline-separated list; `#` starts a comment line
    pub fn parse_list(text: &str) -> Result<Self> {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load from a file: a YAML sequence for `.yaml`/`.yml`, a plain list otherwise
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");

        if is_yaml {
            let entries: Vec<String> = serde_yaml::from_str(&content).map_err(|e| {
                Error::config(format!("Invalid lexicon file {}: {}", path.display(), e))
            })?;
            Self::new(entries)
        } else {
            Self::parse_list(&content)
        }
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.multi_word.len() + self.single_word.len()
    }

    /// Whether the lexicon has no names
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact (case-insensitive) membership
    pub fn contains(&self, name: &str) -> bool {
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        self.multi_word.contains(&name) || self.single_word.contains(&name)
    }

    /// Multi-word names, longest first
    pub fn multi_word(&self) -> &[String] {
        &self.multi_word
    }

    /// Single-word names, in list order
    pub fn single_word(&self) -> &[String] {
        &self.single_word
    }

    /// First multi-word name found in `text` (already lowercased)
    ///
    /// A name matches when it appears verbatim, or when each of its words
    /// appears somewhere in the text as a whole word.
    fn find_multi_word(&self, text: &str) -> Option<&str> {
        self.multi_word
            .iter()
            .find(|name| {
                text.contains(name.as_str())
                    || name.split(' ').all(|word| contains_word(text, word))
            })
            .map(String::as_str)
    }

    /// Earliest-listed single-word name found in `text` as a whole word
    fn find_single_word(&self, text: &str) -> Option<&str> {
        self.single_matcher
            .find_overlapping_iter(text)
            .filter(|m| at_word_boundary(text, m.start(), m.end()))
            .map(|m| m.pattern().as_usize())
            .min()
            .map(|index| self.single_word[index].as_str())
    }
}

/// Detector for phrases denying that a message names an animal
#[derive(Debug, Clone)]
pub struct NegativeAssertions {
    phrases: Vec<String>,
    matcher: AhoCorasick,
}

impl NegativeAssertions {
    /// Build from a list of phrases
    pub fn new<I, S>(phrases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        let matcher = AhoCorasick::new(&phrases).map_err(|e| {
            Error::config(format!("Failed to build negative phrase matcher: {}", e))
        })?;

        Ok(Self { phrases, matcher })
    }

    /// The configured phrases
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Whether `text` (already lowercased) contains any negative phrase
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

impl Default for NegativeAssertions {
    fn default() -> Self {
        Self::new(DEFAULT_NEGATIVE_PHRASES).expect("default negative phrases are valid")
    }
}

/// Offline classifier that matches message text against a [`Lexicon`]
#[derive(Debug, Clone)]
pub struct LexiconMatcher {
    lexicon: Arc<Lexicon>,
    negatives: NegativeAssertions,
    residual_min_len: usize,
}

impl LexiconMatcher {
    /// Create a matcher with the default negative phrases
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            negatives: NegativeAssertions::default(),
            residual_min_len: 3,
        }
    }

    /// Replace the negative phrases
    pub fn with_negatives(mut self, negatives: NegativeAssertions) -> Self {
        self.negatives = negatives;
        self
    }

    /// Minimum length for a token to be reported as residual
    pub fn with_residual_min_len(mut self, min_len: usize) -> Self {
        self.residual_min_len = min_len;
        self
    }

    /// The underlying lexicon
    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Minimum residual token length in effect
    pub fn residual_min_len(&self) -> usize {
        self.residual_min_len
    }

    /// Negative result when `text` denies naming an animal
    pub fn negation(&self, text: &str) -> Option<ClassificationResult> {
        let lower = text.to_lowercase();
        if self.negatives.matches(&lower) {
            let tokens = tokenize(text);
            Some(ClassificationResult::not_animal(residual_words(
                &tokens,
                &[],
                self.residual_min_len,
            )))
        } else {
            None
        }
    }

    /// Classify `text` using only the lexicon
    pub fn match_text(&self, text: &str) -> ClassificationResult {
        if let Some(negative) = self.negation(text) {
            return negative;
        }

        let lower = text.to_lowercase();
        let tokens = tokenize(text);

        let matched = self
            .lexicon
            .find_multi_word(&lower)
            .or_else(|| self.lexicon.find_single_word(&lower));

        match matched {
            Some(name) => {
                let name_words: Vec<String> = name.split(' ').map(str::to_string).collect();
                ClassificationResult::animal(
                    name,
                    residual_words(&tokens, &name_words, self.residual_min_len),
                )
            }
            None => ClassificationResult::not_animal(residual_words(
                &tokens,
                &[],
                self.residual_min_len,
            )),
        }
    }
}

#[async_trait::async_trait]
impl Classifier for LexiconMatcher {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        Ok(self.match_text(text))
    }

    fn name(&self) -> &str {
        "lexicon"
    }

    fn tier(&self) -> ClassifierTier {
        ClassifierTier::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(entries: &[&str]) -> LexiconMatcher {
        LexiconMatcher::new(Arc::new(Lexicon::new(entries).unwrap()))
    }

    #[test]
    fn test_entries_are_normalized() {
        let lexicon = Lexicon::new(["  Red   Panda ", "OWL", "owl", ""]).unwrap();

        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.contains("red panda"));
        assert!(lexicon.contains("Red Panda"));
        assert_eq!(lexicon.single_word(), ["owl"]);
    }

    #[test]
    fn test_multi_word_sorted_longest_first() {
        let lexicon = Lexicon::new(["red fox", "african bush elephant", "red panda"]).unwrap();

        assert_eq!(
            lexicon.multi_word(),
            ["african bush elephant", "red panda", "red fox"]
        );
    }

    #[test]
    fn test_equal_length_names_keep_list_order() {
        let lexicon = Lexicon::new(["sea owl", "red fox", "african bush elephant"]).unwrap();

        assert_eq!(
            lexicon.multi_word(),
            ["african bush elephant", "sea owl", "red fox"]
        );
    }

    #[test]
    fn test_builtin_lexicon_loads() {
        let lexicon = Lexicon::builtin().unwrap();

        assert!(lexicon.len() > 100);
        assert!(lexicon.contains("red panda"));
        assert!(lexicon.contains("adélie penguin"));
        assert!(!lexicon.contains("acadian flycatcher # comment"));
    }

    #[test]
    fn test_longer_name_preferred() {
        let m = matcher(&["panda", "red panda"]);

        let result = m.match_text("red panda");
        assert_eq!(result.matched_phrase.as_deref(), Some("red panda"));
        assert!(result.residual_words.is_empty());
    }

    #[test]
    fn test_scattered_multi_word_name() {
        let m = matcher(&["red panda"]);

        let result = m.match_text("a panda that is very red");
        assert!(result.is_animal);
        assert_eq!(result.matched_phrase.as_deref(), Some("red panda"));
        assert_eq!(result.residual_words, vec!["that", "very"]);
    }

    #[test]
    fn test_single_word_needs_word_boundary() {
        let m = matcher(&["cat", "ant"]);

        assert!(!m.match_text("concatenate the elephants").is_animal);
        assert_eq!(
            m.match_text("my cat!").matched_phrase.as_deref(),
            Some("cat")
        );
    }

    #[test]
    fn test_single_word_uses_list_order() {
        let m = matcher(&["owl", "fox"]);

        let result = m.match_text("fox and owl");
        assert_eq!(result.matched_phrase.as_deref(), Some("owl"));
        assert_eq!(result.residual_words, vec!["fox", "and"]);
    }

    #[test]
    fn test_negative_assertion_wins() {
        let m = matcher(&["cat"]);

        let result = m.match_text("my cat is not an animal");
        assert!(!result.is_animal);
        assert_eq!(result.matched_phrase, None);
        assert_eq!(result.residual_words, vec!["cat", "not", "animal"]);
    }

    #[test]
    fn test_no_match_reports_all_long_tokens() {
        let m = matcher(&["cat"]);

        let result = m.match_text("hello there you");
        assert!(!result.is_animal);
        assert_eq!(result.residual_words, vec!["hello", "there", "you"]);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("animals.yaml");
        std::fs::write(&path, "- Snow Leopard\n- yak\n").unwrap();

        let lexicon = Lexicon::from_file(&path).unwrap();
        assert!(lexicon.contains("snow leopard"));
        assert!(lexicon.contains("yak"));
    }

    #[test]
    fn test_from_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("animals.txt");
        std::fs::write(&path, "# zoo\nquokka\n\nsea otter\n").unwrap();

        let lexicon = Lexicon::from_file(&path).unwrap();
        assert_eq!(lexicon.len(), 2);
    }

    #[tokio::test]
    async fn test_classifier_trait() {
        let m = matcher(&["owl"]);

        let result = m.classify("an owl").await.unwrap();
        assert!(result.is_animal);
        assert_eq!(m.tier(), ClassifierTier::Local);
    }
}
