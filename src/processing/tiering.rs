//! Rule-based status, match level, recommendations and dashboard tags
//!
//! Everything here is a pure function of the score, experience, semantic
//! similarity, skill-gap ratio and the run's criteria. Rules are evaluated
//! top-down and the first match wins.

use crate::config::{TagThreshold, TieringConfig};
use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictedStatus {
    Shortlisted,
    #[serde(rename = "Rejected (Experience)")]
    RejectedExperience,
    #[serde(rename = "Rejected (Score)")]
    RejectedScore,
    #[serde(rename = "Rejected (Major Skill Gap)")]
    RejectedSkillGap,
}

impl PredictedStatus {
    pub fn is_shortlisted(&self) -> bool {
        matches!(self, PredictedStatus::Shortlisted)
    }
}

impl fmt::Display for PredictedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PredictedStatus::Shortlisted => "Shortlisted",
            PredictedStatus::RejectedExperience => "Rejected (Experience)",
            PredictedStatus::RejectedScore => "Rejected (Score)",
            PredictedStatus::RejectedSkillGap => "Rejected (Major Skill Gap)",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchLevel::High => "High",
            MatchLevel::Medium => "Medium",
            MatchLevel::Low => "Low",
        };
        write!(f, "{}", label)
    }
}

/// Coarse dashboard label, independent of the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CandidateTag {
    Exceptional,
    Strong,
    Promising,
    NeedsReview,
    LimitedMatch,
}

impl CandidateTag {
    pub const ALL: [CandidateTag; 5] = [
        CandidateTag::Exceptional,
        CandidateTag::Strong,
        CandidateTag::Promising,
        CandidateTag::NeedsReview,
        CandidateTag::LimitedMatch,
    ];
}

impl fmt::Display for CandidateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CandidateTag::Exceptional => "Exceptional Match",
            CandidateTag::Strong => "Strong Candidate",
            CandidateTag::Promising => "Promising Fit",
            CandidateTag::NeedsReview => "Needs Review",
            CandidateTag::LimitedMatch => "Limited Match",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentTier {
    Exceptional,
    Strong,
    Promising,
    Limited,
}

/// Thresholds chosen for one screening run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    pub cutoff_score: f32,
    pub min_experience: f32,
}

impl ScreeningCriteria {
    pub fn new(cutoff_score: f32, min_experience: f32) -> Result<Self> {
        let criteria = Self {
            cutoff_score,
            min_experience,
        };
        criteria.validate()?;
        Ok(criteria)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.cutoff_score.is_finite() || !(0.0..=100.0).contains(&self.cutoff_score) {
            return Err(ScreenerError::InvalidInput(format!(
                "Cutoff score must be within 0-100, got {}",
                self.cutoff_score
            )));
        }
        if !self.min_experience.is_finite() || self.min_experience < 0.0 {
            return Err(ScreenerError::InvalidInput(format!(
                "Minimum experience must not be negative, got {}",
                self.min_experience
            )));
        }
        Ok(())
    }
}

/// Signals for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierInput {
    pub score: f32,
    pub years_experience: f32,
    pub semantic_similarity: f32,
    pub missing_skills: usize,
    pub required_skills: usize,
}

impl TierInput {
    /// Share of the job's skills the resume lacks; 0.0 when the job lists none.
    pub fn skill_gap_ratio(&self) -> f32 {
        if self.required_skills == 0 {
            0.0
        } else {
            self.missing_skills as f32 / self.required_skills as f32
        }
    }
}

pub struct Tiering {
    config: TieringConfig,
}

impl Default for Tiering {
    fn default() -> Self {
        Self::new(TieringConfig::default())
    }
}

impl Tiering {
    pub fn new(config: TieringConfig) -> Self {
        Self { config }
    }

    pub fn status(&self, input: &TierInput, criteria: &ScreeningCriteria) -> PredictedStatus {
        let clears_score = input.score >= criteria.cutoff_score;
        let clears_experience = input.years_experience >= criteria.min_experience;
        let acceptable_gap = input.skill_gap_ratio() <= self.config.max_skill_gap_ratio;

        if clears_score && clears_experience && acceptable_gap {
            PredictedStatus::Shortlisted
        } else if !clears_experience {
            PredictedStatus::RejectedExperience
        } else if !clears_score {
            PredictedStatus::RejectedScore
        } else {
            PredictedStatus::RejectedSkillGap
        }
    }

    pub fn match_level(&self, score: f32) -> MatchLevel {
        if score >= self.config.high_match_score {
            MatchLevel::High
        } else if score >= self.config.medium_match_score {
            MatchLevel::Medium
        } else {
            MatchLevel::Low
        }
    }

    /// One-line suggestion for the results table.
    pub fn concise_suggestion(&self, input: &TierInput, criteria: &ScreeningCriteria) -> String {
        let c = &self.config;
        let clears_experience = input.years_experience >= criteria.min_experience;

        if input.score >= c.concise_high_score
            && clears_experience
            && input.semantic_similarity >= c.concise_high_semantic
        {
            "High alignment with the role. Fast-track to interview and focus on cultural fit.".to_string()
        } else if input.score >= criteria.cutoff_score
            && clears_experience
            && input.semantic_similarity >= c.concise_moderate_semantic
        {
            "Moderate fit. Interview to explore depth of experience in the core skills.".to_string()
        } else {
            "Limited alignment with the role. Consider only if the pipeline is limited.".to_string()
        }
    }

    pub fn assessment_tier(&self, input: &TierInput, criteria: &ScreeningCriteria) -> AssessmentTier {
        let c = &self.config;

        if input.score >= c.exceptional_score
            && input.years_experience >= criteria.min_experience + c.exceptional_experience_offset
            && input.semantic_similarity >= c.exceptional_semantic
        {
            AssessmentTier::Exceptional
        } else if input.score >= c.strong_score
            && input.years_experience >= criteria.min_experience
            && input.semantic_similarity >= c.strong_semantic
        {
            AssessmentTier::Strong
        } else if input.score >= criteria.cutoff_score
            && input.years_experience >= criteria.min_experience + c.promising_experience_offset
            && input.semantic_similarity >= c.promising_semantic
        {
            AssessmentTier::Promising
        } else {
            AssessmentTier::Limited
        }
    }

    /// Multi-sentence narrative for a top candidate, ending with next steps.
    pub fn detailed_assessment(&self, name: &str, input: &TierInput, criteria: &ScreeningCriteria) -> String {
        let score = input.score;
        let years = input.years_experience;
        let semantic = input.semantic_similarity;

        match self.assessment_tier(input, criteria) {
            AssessmentTier::Exceptional => format!(
                "{} is an exceptional match with a score of {:.2}% and {:.1} years of experience, \
                 well beyond the {:.1}-year requirement. Semantic similarity of {:.2} shows the \
                 resume speaks the same language as the job description. \
                 Next steps: fast-track to a final-round interview and prepare an offer discussion.",
                name, score, years, criteria.min_experience, semantic
            ),
            AssessmentTier::Strong => format!(
                "{} is a strong candidate with a score of {:.2}% and {:.1} years of experience. \
                 Semantic similarity of {:.2} indicates solid alignment with the role's core requirements. \
                 Next steps: schedule a technical interview focused on the highest-priority skills.",
                name, score, years, semantic
            ),
            AssessmentTier::Promising => {
                let mut text = format!(
                    "{} shows promise with a score of {:.2}% and {:.1} years of experience \
                     (semantic similarity {:.2}).",
                    name, score, years, semantic
                );

                if score < criteria.cutoff_score + self.config.marginal_score_band {
                    text.push_str(" The score only narrowly clears the cutoff.");
                }
                if years < criteria.min_experience {
                    text.push_str(&format!(
                        " Experience is short of the {:.1}-year requirement.",
                        criteria.min_experience
                    ));
                }
                if semantic < self.config.promising_low_semantic {
                    text.push_str(" Semantic alignment with the job description is moderate.");
                }

                text.push_str(" Next steps: run a screening call to validate the gaps before a full interview.");
                text
            }
            AssessmentTier::Limited => format!(
                "{} has limited alignment with the role, scoring {:.2}% with {:.1} years of experience \
                 and semantic similarity of {:.2}. \
                 Next steps: keep on file and revisit only if the pipeline is thin.",
                name, score, years, semantic
            ),
        }
    }

    pub fn tag(&self, input: &TierInput) -> CandidateTag {
        let c = &self.config;
        let meets = |t: &TagThreshold| {
            input.score >= t.score && input.years_experience >= t.experience && input.semantic_similarity >= t.semantic
        };

        if meets(&c.tag_exceptional) {
            CandidateTag::Exceptional
        } else if meets(&c.tag_strong) {
            CandidateTag::Strong
        } else if meets(&c.tag_promising) {
            CandidateTag::Promising
        } else if input.score >= c.tag_needs_review_score {
            CandidateTag::NeedsReview
        } else {
            CandidateTag::LimitedMatch
        }
    }
}
