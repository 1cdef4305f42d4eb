//! Analyzed job descriptions and resumes

use crate::processing::contact::{ContactInfo, NOT_FOUND};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub word_count: usize,
    pub character_count: usize,
}

impl DocumentMetadata {
    pub fn of(text: &str) -> Self {
        Self {
            word_count: text.split_whitespace().count(),
            character_count: text.chars().count(),
        }
    }
}

/// Job description for one screening run; never modified after analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub raw: String,
    /// Loose normalization, fed to the embedding provider.
    pub loose: String,
    /// Canonical lowercased skills required by the job.
    pub skills: BTreeSet<String>,
    /// Strict tokens minus stop words, vocabulary or not.
    pub keywords: BTreeSet<String>,
    pub metadata: DocumentMetadata,
}

/// One uploaded resume after analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    /// Upload identity.
    pub filename: String,
    pub raw: String,
    pub loose: String,
    pub contact: ContactInfo,
    pub years_experience: f32,
    pub skills: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
    pub word_cloud_text: String,
    pub metadata: DocumentMetadata,
}

impl ResumeDocument {
    /// Extracted name, else the file name without its extension.
    pub fn candidate_name(&self) -> String {
        self.contact.name.clone().unwrap_or_else(|| {
            Path::new(&self.filename)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .filter(|stem| !stem.is_empty())
                .unwrap_or_else(|| NOT_FOUND.to_string())
        })
    }

    pub fn matched_skills(&self, job: &JobDescription) -> BTreeSet<String> {
        self.skills.intersection(&job.skills).cloned().collect()
    }

    pub fn missing_skills(&self, job: &JobDescription) -> BTreeSet<String> {
        job.skills.difference(&self.skills).cloned().collect()
    }

    /// Keywords found in both the job description and the resume.
    pub fn shared_keywords(&self, job: &JobDescription) -> BTreeSet<String> {
        self.keywords.intersection(&job.keywords).cloned().collect()
    }
}
