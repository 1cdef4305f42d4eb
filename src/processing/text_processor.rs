//! Text normalization at the two levels the pipeline needs
//!
//! * **strict**: lowercase ASCII letters and single spaces only. Used for
//!   token-set operations (stop-word fallback, overlap counting).
//! * **loose**: typography folded to ASCII, non-ASCII dropped, whitespace
//!   collapsed, punctuation kept. Used for embeddings and phrase matching.

use crate::processing::vocabulary;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    stop_words: HashSet<String>,
    whitespace_regex: Regex,
    non_letter_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self::with_stop_words(vocabulary::default_stop_words())
    }

    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");
        let non_letter_regex = Regex::new(r"[^a-z\s]").expect("Invalid letter filter regex");

        Self {
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
            whitespace_regex,
            non_letter_regex,
        }
    }

    /// Lowercase, keep ASCII letters and whitespace, collapse runs of whitespace.
    pub fn strict(&self, text: &str) -> String {
        let lowered = self.fold_typography(text).to_lowercase();
        let letters = self.non_letter_regex.replace_all(&lowered, " ");
        self.normalize_whitespace(&letters)
    }

    /// Strict tokens with the stop-word set removed.
    pub fn strict_tokens(&self, text: &str) -> Vec<String> {
        self.strict(text)
            .split(' ')
            .filter(|token| !token.is_empty() && !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Strict tokens as a set; the vocabulary-less keyword fallback.
    pub fn keyword_set(&self, text: &str) -> BTreeSet<String> {
        self.strict_tokens(text).into_iter().collect()
    }

    /// Fold typography to ASCII, drop remaining non-ASCII, collapse whitespace.
    pub fn loose(&self, text: &str) -> String {
        let folded: String = self
            .fold_typography(text)
            .chars()
            .filter(|c| c.is_ascii())
            .collect();
        self.normalize_whitespace(&folded)
    }

    /// Lowercased word tokens of `text` (punctuation dropped, stop words kept).
    pub fn words(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(|w| w.to_lowercase()).collect()
    }

    fn normalize_whitespace(&self, text: &str) -> String {
        self.whitespace_regex.replace_all(text, " ").trim().to_string()
    }

    fn fold_typography(&self, text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2010}'..='\u{2015}' => '-',
                '\u{2026}' => '.',
                '\u{00A0}' => ' ',
                _ => c,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_keeps_only_letters() {
        let processor = TextProcessor::new();
        let text = "Built C++ services @ ACME (2019–2021)!\nSaved $2M.";

        let strict = processor.strict(text);

        assert_eq!(strict, "built c services acme saved m");
    }

    #[test]
    fn test_loose_preserves_punctuation_and_strips_non_ascii() {
        let processor = TextProcessor::new();
        let text = "Node.js  &  C#\n\n— café “quotes”";

        let loose = processor.loose(text);

        assert_eq!(loose, "Node.js & C# - caf \"quotes\"");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let processor = TextProcessor::new();

        assert_eq!(processor.strict(""), "");
        assert_eq!(processor.loose("   \n\t "), "");
        assert!(processor.strict_tokens("").is_empty());
    }

    #[test]
    fn test_strict_tokens_drop_stop_words() {
        let processor = TextProcessor::new();

        let tokens = processor.strict_tokens("The engineer and the Kubernetes cluster");

        assert!(tokens.contains(&"kubernetes".to_string()));
        assert!(tokens.contains(&"cluster".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"and".to_string()));
    }

    #[test]
    fn test_custom_stop_words_replace_defaults() {
        let stop: HashSet<String> = ["rust".to_string()].into_iter().collect();
        let processor = TextProcessor::with_stop_words(stop);

        let keywords = processor.keyword_set("Rust and the compiler");

        assert!(!keywords.contains("rust"));
        assert!(keywords.contains("the"));
        assert!(keywords.contains("compiler"));
    }
}
