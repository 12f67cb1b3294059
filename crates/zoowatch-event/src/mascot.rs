//! Correct-guess detection

use zoowatch_classifiers::text::contains_word;

/// Decides whether a message guesses the event mascot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MascotMatcher {
    mascot: String,
    words: Vec<String>,
}

impl MascotMatcher {
    pub fn new(mascot: &str) -> Self {
        let mascot = mascot.trim().to_lowercase();
        let words = mascot.split_whitespace().map(str::to_string).collect();
        Self { mascot, words }
    }

    /// The normalized mascot name
    pub fn mascot(&self) -> &str {
        &self.mascot
    }

    /// True when the message names the mascot.
    ///
    /// A multi-word mascot also counts when each of its words appears
    /// somewhere in the message, in any order. Matching is on whole words
    /// and ignores case. An empty mascot is never guessed.
    pub fn is_correct_guess(&self, content: &str) -> bool {
        if self.mascot.is_empty() {
            return false;
        }

        let content = content.to_lowercase();
        if contains_word(&content, &self.mascot) {
            return true;
        }

        self.words.len() > 1 && self.words.iter().all(|word| contains_word(&content, word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_name() {
        let matcher = MascotMatcher::new("Red Panda");

        assert!(matcher.is_correct_guess("Is it a RED PANDA?"));
        assert!(!matcher.is_correct_guess("a giant panda"));
    }

    #[test]
    fn test_scattered_words() {
        let matcher = MascotMatcher::new("red panda");

        assert!(matcher.is_correct_guess("panda, the red one"));
        assert!(!matcher.is_correct_guess("reddish panda"));
    }

    #[test]
    fn test_single_word_mascot_needs_whole_word() {
        let matcher = MascotMatcher::new("cat");

        assert!(matcher.is_correct_guess("the cat!"));
        assert!(!matcher.is_correct_guess("concatenate"));
    }

    #[test]
    fn test_empty_mascot() {
        assert!(!MascotMatcher::new("  ").is_correct_guess("anything at all"));
    }
}
