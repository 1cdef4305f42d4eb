//! Matching and ranking core

pub mod analyzer;
pub mod contact;
pub mod document;
pub mod embeddings;
pub mod events;
pub mod experience;
pub mod models;
pub mod score_model;
pub mod screener;
pub mod similarity;
pub mod skill_extractor;
pub mod text_processor;
pub mod tiering;
pub mod vocabulary;

pub use events::{EventSink, LogSink, MemorySink, ScreeningEvent};
pub use models::ModelRegistry;
pub use screener::{ScoreResult, Screener, ScreeningRun, SkipReason, SkippedResume, SortKey};
pub use tiering::{CandidateTag, MatchLevel, PredictedStatus, ScreeningCriteria};
