//! Best-effort contact details: email, phone and candidate name

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rendered in place of any contact field that could not be found.
pub const NOT_FOUND: &str = "N/A";

const NAME_SCAN_LINES: usize = 3;
const MAX_NAME_WORDS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactInfo {
    pub fn email_or_sentinel(&self) -> &str {
        self.email.as_deref().unwrap_or(NOT_FOUND)
    }

    pub fn phone_or_sentinel(&self) -> &str {
        self.phone.as_deref().unwrap_or(NOT_FOUND)
    }
}

pub struct ContactExtractor {
    email_regex: Regex,
    phone_regex: Regex,
    section_headers: HashSet<&'static str>,
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactExtractor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
            .expect("Invalid phone regex");

        let section_headers = [
            "resume", "résumé", "curriculum", "vitae", "cv", "profile", "summary", "contact",
            "objective", "personal", "details", "information", "name",
        ]
        .into_iter()
        .collect();

        Self {
            email_regex,
            phone_regex,
            section_headers,
        }
    }

    pub fn extract(&self, text: &str) -> ContactInfo {
        ContactInfo {
            name: self.name(text),
            email: self.email(text),
            phone: self.phone(text),
        }
    }

    pub fn email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn phone(&self, text: &str) -> Option<String> {
        self.phone_regex.find(text).map(|m| m.as_str().trim().to_string())
    }

    /// Pick the best name-like line among the first few non-empty lines.
    /// Short, title-cased lines win; ties go to the earlier line.
    pub fn name(&self, text: &str) -> Option<String> {
        let mut best: Option<(u8, String)> = None;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()).take(NAME_SCAN_LINES) {
            let Some(candidate) = self.name_candidate(line) else {
                continue;
            };

            let words: Vec<&str> = candidate.split_whitespace().collect();
            let title_cased = words
                .iter()
                .all(|w| w.chars().next().is_some_and(char::is_uppercase));
            let score = u8::from(title_cased) * 2 + u8::from((2..=3).contains(&words.len()));

            if score > 0 && best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, candidate));
            }
        }

        best.map(|(_, name)| name)
    }

    fn name_candidate(&self, line: &str) -> Option<String> {
        if line.contains('@') || line.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }

        let kept: Vec<&str> = line
            .split_whitespace()
            .filter(|word| {
                let bare = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
                !self.section_headers.contains(bare.as_str())
            })
            .collect();

        let candidate = kept
            .join(" ")
            .trim_matches(|c: char| matches!(c, '-' | '|' | ':' | ',' | '–' | '—') || c.is_whitespace())
            .to_string();

        if candidate.is_empty() || candidate.matches('-').count() > 1 {
            return None;
        }

        let words: Vec<&str> = candidate.split_whitespace().collect();
        if words.len() > MAX_NAME_WORDS {
            return None;
        }

        let name_like = words.iter().all(|w| {
            w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-'))
        });

        name_like.then_some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_email_and_phone() {
        let extractor = ContactExtractor::new();
        let text = "John Doe\njohn.doe@example.com | +1 (555) 123-4567\nBackend Engineer";

        let contact = extractor.extract(text);

        assert_eq!(contact.email.as_deref(), Some("john.doe@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("+1 (555) 123-4567"));
        assert_eq!(contact.name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn test_missing_fields_render_sentinel() {
        let extractor = ContactExtractor::new();

        let contact = extractor.extract("no contact details here at all, sorry");

        assert_eq!(contact.email_or_sentinel(), NOT_FOUND);
        assert_eq!(contact.phone_or_sentinel(), NOT_FOUND);
        assert_eq!(contact.name, None);
    }

    #[test]
    fn test_section_headers_are_stripped_from_name() {
        let extractor = ContactExtractor::new();

        assert_eq!(
            extractor.name("RESUME\nJane A. Smith\nSenior Data Scientist").as_deref(),
            Some("Jane A. Smith")
        );
        assert_eq!(
            extractor.name("Curriculum Vitae - Maria Lopez\nmaria@lopez.dev").as_deref(),
            Some("Maria Lopez")
        );
    }

    #[test]
    fn test_rejects_lines_with_digits_or_many_hyphens() {
        let extractor = ContactExtractor::new();
        let text = "123 Main Street\n---- Software-Engineer-Python ----\nkim@corp.io";

        assert_eq!(extractor.name(text), None);
    }

    #[test]
    fn test_only_first_lines_are_considered() {
        let extractor = ContactExtractor::new();
        let text = "2019-2024\nwww.portfolio.io/42\nphone: 555 123 4567\nLate Name";

        assert_eq!(extractor.name(text), None);
    }
}
