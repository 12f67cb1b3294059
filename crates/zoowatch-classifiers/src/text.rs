//! Tokenizing and word-boundary helpers shared by the classifiers

/// Lowercase `text` and split it on whitespace
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Length in characters, not bytes
pub fn char_len(word: &str) -> usize {
    word.chars().count()
}

/// Tokens that are not in `exclude` and have at least `min_len` characters
pub fn residual_words(tokens: &[String], exclude: &[String], min_len: usize) -> Vec<String> {
    tokens
        .iter()
        .filter(|token| !exclude.contains(token))
        .filter(|token| char_len(token) >= min_len)
        .cloned()
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether the span `start..end` of `haystack` is not glued to other word characters
pub fn at_word_boundary(haystack: &str, start: usize, end: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Whether `word` occurs in `haystack` as a whole word
pub fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    haystack
        .match_indices(word)
        .any(|(start, found)| at_word_boundary(haystack, start, start + found.len()))
}
