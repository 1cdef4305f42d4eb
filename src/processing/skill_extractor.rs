//! Skill and keyword extraction against a curated vocabulary
//!
//! Vocabulary entries are matched longest-first as whole words/phrases in the
//! loosely cleaned, lowercased text. Every match is blanked out of a working
//! copy so a short entry ("data") is never counted again inside a longer one
//! that already matched ("data science").

use crate::error::{Result, ScreenerError};
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary;
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

pub struct SkillExtractor {
    patterns: Vec<SkillPattern>,
    prefilter: Option<AhoCorasick>,
    lookup: HashSet<String>,
    processor: Arc<TextProcessor>,
}

struct SkillPattern {
    canonical: String,
    regex: Regex,
}

impl SkillExtractor {
    /// Build an extractor over `vocabulary`. An empty vocabulary switches
    /// extraction to "all strict tokens minus stop words".
    pub fn new(vocabulary: &[String], processor: Arc<TextProcessor>) -> Result<Self> {
        let mut canonical: Vec<String> = vocabulary
            .iter()
            .map(|entry| entry.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // Longest first; the BTreeSet already ordered equal lengths alphabetically
        canonical.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let patterns = canonical
            .iter()
            .map(|entry| {
                Ok(SkillPattern {
                    canonical: entry.clone(),
                    regex: Self::phrase_regex(entry)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let prefilter = if canonical.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::Standard)
                    .build(&canonical)
                    .map_err(|e| {
                        ScreenerError::TextProcessing(format!("Failed to build skill prefilter: {}", e))
                    })?,
            )
        };

        Ok(Self {
            lookup: canonical.into_iter().collect(),
            patterns,
            prefilter,
            processor,
        })
    }

    /// Extractor over the built-in vocabulary and stop words.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&vocabulary::default_skills(), Arc::new(TextProcessor::new()))
    }

    /// Canonical (lowercased) skills present in `text`.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let Some(prefilter) = &self.prefilter else {
            return self.processor.keyword_set(text);
        };

        let mut working = self.processor.loose(text).to_lowercase();
        let mut found = BTreeSet::new();

        let candidates: HashSet<usize> = prefilter
            .find_overlapping_iter(&working)
            .map(|m| m.pattern().as_usize())
            .collect();

        // Pattern ids of the prefilter follow the same longest-first order
        for (id, pattern) in self.patterns.iter().enumerate() {
            if !candidates.contains(&id) {
                continue;
            }

            let spans: Vec<(usize, usize)> = pattern
                .regex
                .find_iter(&working)
                .map(|m| (m.start(), m.end()))
                .collect();

            if spans.is_empty() {
                continue;
            }

            found.insert(pattern.canonical.clone());
            for (start, end) in spans {
                working.replace_range(start..end, &" ".repeat(end - start));
            }
        }

        for token in working.split_whitespace() {
            let token = token.trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '(' | ')' | '"' | '\'' | '!' | '?' | '.'));
            if self.lookup.contains(token) {
                found.insert(token.to_string());
            }
        }

        found
    }

    /// Lowercased word tokens of `text` that are themselves vocabulary entries,
    /// space-joined; the input for a skills word cloud.
    pub fn word_cloud_text(&self, text: &str) -> String {
        self.processor
            .words(text)
            .into_iter()
            .filter(|word| self.lookup.contains(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn processor(&self) -> &TextProcessor {
        &self.processor
    }

    fn phrase_regex(entry: &str) -> Result<Regex> {
        let body = entry
            .split(' ')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");

        let starts_word = entry.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
        let ends_word = entry.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());

        let pattern = format!(
            "{}{}{}",
            if starts_word { r"\b" } else { "" },
            body,
            if ends_word { r"\b" } else { "" }
        );

        Regex::new(&pattern).map_err(|e| {
            ScreenerError::TextProcessing(format!("Invalid vocabulary entry '{}': {}", entry, e))
        })
    }
}
