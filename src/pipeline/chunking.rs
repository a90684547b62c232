//! Fixed-size token windows for context-limited models.
//!
//! Tokens are opaque: callers choose the tokenizer, this module only slices.

/// Split `tokens` into contiguous windows of `size` tokens; the last window may be shorter
pub fn token_windows<T>(tokens: &[T], size: usize) -> impl Iterator<Item = &[T]> {
    assert!(size > 0, "window size must be positive");
    tokens.chunks(size)
}

/// Whitespace tokenizer used for windowed summaries
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Inverse of [`tokenize`] for one window
pub fn detokenize(window: &[&str]) -> String {
    window.join(" ")
}

/// Windows of `text` that hold at least `min_words` words, in order
pub fn eligible_windows(text: &str, size: usize, min_words: usize) -> Vec<String> {
    let tokens = tokenize(text);

    token_windows(&tokens, size)
        .map(detokenize)
        .filter(|window| crate::utils::word_count(window) >= min_words)
        .collect()
}
