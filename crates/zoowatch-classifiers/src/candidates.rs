//! Candidate phrase generation
//!
//! A message is turned into an ordered list of phrases to try against the
//! knowledge base:
//! 1. the whole message
//! 2. sliding word windows (2 and 3 words, order set by [`WindowOrder`])
//! 3. single words
//!
//! Longer spans come first because they are less likely to be false
//! positives; single common words come last.

use crate::text::{char_len, residual_words, tokenize};
use serde::{Deserialize, Serialize};

/// Which window size is tried first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOrder {
    /// All 2-word windows, then all 3-word windows
    #[default]
    ShortestFirst,
    /// All 3-word windows, then all 2-word windows
    LongestFirst,
}

impl WindowOrder {
    fn sizes(&self) -> [usize; 2] {
        match self {
            Self::ShortestFirst => [2, 3],
            Self::LongestFirst => [3, 2],
        }
    }
}

/// Where a candidate phrase came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// The entire message
    WholeMessage,
    /// A window of the given number of words
    Window(usize),
    /// One word
    Word,
}

/// A phrase to try, with the tokens it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePhrase {
    /// The phrase as searched
    pub text: String,

    /// Message tokens the phrase explains
    pub words: Vec<String>,

    /// Origin of the phrase
    pub kind: CandidateKind,
}

/// Length limits and ordering for candidate generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePolicy {
    /// Window size order
    #[serde(default)]
    pub window_order: WindowOrder,

    /// Every token in a window needs at least this many characters
    #[serde(default = "default_min_window_token_len")]
    pub min_window_token_len: usize,

    /// Single words shorter than this are never looked up
    #[serde(default = "default_min_word_len")]
    pub min_word_len: usize,

    /// The whole message is looked up only if it is at least this long
    #[serde(default = "default_min_message_len")]
    pub min_message_len: usize,

    /// Residual words shorter than this are dropped
    #[serde(default = "default_residual_min_len")]
    pub residual_min_len: usize,
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        Self {
            window_order: WindowOrder::default(),
            min_window_token_len: default_min_window_token_len(),
            min_word_len: default_min_word_len(),
            min_message_len: default_min_message_len(),
            residual_min_len: default_residual_min_len(),
        }
    }
}

fn default_min_window_token_len() -> usize {
    2
}

fn default_min_word_len() -> usize {
    3
}

fn default_min_message_len() -> usize {
    3
}

fn default_residual_min_len() -> usize {
    3
}

/// Produces candidate phrases for a message
#[derive(Debug, Clone, Default)]
pub struct CandidateGenerator {
    policy: CandidatePolicy,
}

impl CandidateGenerator {
    /// Create a generator with the given policy
    pub fn new(policy: CandidatePolicy) -> Self {
        Self { policy }
    }

    /// The policy in effect
    pub fn policy(&self) -> &CandidatePolicy {
        &self.policy
    }

    /// All candidates for `text`, in trial order
    pub fn generate(&self, text: &str) -> Vec<CandidatePhrase> {
        let tokens = tokenize(text);
        let mut candidates = Vec::new();

        candidates.extend(self.whole_message(text, &tokens));
        for size in self.policy.window_order.sizes() {
            candidates.extend(self.windows(&tokens, size));
        }
        candidates.extend(self.single_words(&tokens));

        candidates
    }

    fn whole_message(&self, text: &str, tokens: &[String]) -> Option<CandidatePhrase> {
        let phrase = text.trim().to_lowercase();
        if phrase.is_empty() || char_len(&phrase) < self.policy.min_message_len {
            return None;
        }
        Some(CandidatePhrase {
            text: phrase,
            words: tokens.to_vec(),
            kind: CandidateKind::WholeMessage,
        })
    }

    /// Contiguous windows of `size` tokens whose tokens are all long enough
    pub fn windows(&self, tokens: &[String], size: usize) -> Vec<CandidatePhrase> {
        if size == 0 {
            return Vec::new();
        }
        tokens
            .windows(size)
            .filter(|window| {
                window
                    .iter()
                    .all(|token| char_len(token) >= self.policy.min_window_token_len)
            })
            .map(|window| CandidatePhrase {
                text: window.join(" "),
                words: window.to_vec(),
                kind: CandidateKind::Window(size),
            })
            .collect()
    }

    fn single_words(&self, tokens: &[String]) -> Vec<CandidatePhrase> {
        tokens
            .iter()
            .filter(|token| char_len(token) >= self.policy.min_word_len)
            .map(|token| CandidatePhrase {
                text: token.clone(),
                words: vec![token.clone()],
                kind: CandidateKind::Word,
            })
            .collect()
    }

    /// Tokens of `text` the candidate does not explain, length-filtered
    pub fn residual_words(&self, candidate: &CandidatePhrase, text: &str) -> Vec<String> {
        residual_words(&tokenize(text), &candidate.words, self.policy.residual_min_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(candidates: &[CandidatePhrase]) -> Vec<&str> {
        candidates.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_shortest_first_order() {
        let generator = CandidateGenerator::default();

        let candidates = generator.generate("Big Red Panda");
        assert_eq!(
            texts(&candidates),
            vec![
                "big red panda",
                "big red",
                "red panda",
                "big red panda",
                "big",
                "red",
                "panda",
            ]
        );
        assert_eq!(candidates[0].kind, CandidateKind::WholeMessage);
        assert_eq!(candidates[1].kind, CandidateKind::Window(2));
        assert_eq!(candidates[3].kind, CandidateKind::Window(3));
        assert_eq!(candidates[6].kind, CandidateKind::Word);
    }

    #[test]
    fn test_longest_first_order() {
        let generator = CandidateGenerator::new(CandidatePolicy {
            window_order: WindowOrder::LongestFirst,
            ..Default::default()
        });

        let candidates = generator.generate("big red panda");
        assert_eq!(candidates[1].kind, CandidateKind::Window(3));
        assert_eq!(candidates[2].kind, CandidateKind::Window(2));
    }

    #[test]
    fn test_short_tokens_excluded() {
        let generator = CandidateGenerator::default();

        let candidates = generator.generate("I saw a fox");
        assert_eq!(texts(&candidates), vec!["i saw a fox", "saw", "fox"]);
    }

    #[test]
    fn test_short_message_skips_whole_message() {
        let generator = CandidateGenerator::default();

        assert!(generator.generate("ox").is_empty());
        assert!(generator.generate("   ").is_empty());
    }

    #[test]
    fn test_candidate_count_bound() {
        let generator = CandidateGenerator::default();
        let text = "alpha bravo charlie delta echo";
        let n = 5;

        // whole + (n-1) pairs + (n-2) triples + n words
        assert_eq!(generator.generate(text).len(), 1 + (n - 1) + (n - 2) + n);
    }

    #[test]
    fn test_residual_words_for_window() {
        let generator = CandidateGenerator::default();
        let text = "I saw a red panda today";

        let window = generator
            .generate(text)
            .into_iter()
            .find(|c| c.text == "red panda")
            .unwrap();
        assert_eq!(generator.residual_words(&window, text), vec!["saw", "today"]);

        let whole = &generator.generate(text)[0];
        assert!(generator.residual_words(whole, text).is_empty());
    }
}
