//! Structured screening events and the sinks that receive them

use crate::processing::tiering::PredictedStatus;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScreeningEvent {
    BatchStarted {
        total: usize,
        cutoff_score: f32,
        min_experience: f32,
        job_skill_count: usize,
        degraded: bool,
    },
    ResumeProcessed {
        index: usize,
        total: usize,
        resume: String,
        score: f32,
        status: PredictedStatus,
        years_experience: f32,
        elapsed_ms: u64,
    },
    ResumeSkipped {
        index: usize,
        total: usize,
        resume: String,
        reason: String,
    },
    BatchCompleted {
        scored: usize,
        skipped: usize,
        shortlisted: usize,
        degraded: bool,
        elapsed_ms: u64,
    },
}

impl ScreeningEvent {
    /// Resumes handled so far when this event fires, if it is a per-resume event.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self {
            ScreeningEvent::ResumeProcessed { index, total, .. }
            | ScreeningEvent::ResumeSkipped { index, total, .. } => Some((index + 1, *total)),
            _ => None,
        }
    }
}

/// Receives events as a run progresses. Must not fail the run.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ScreeningEvent);
}

/// Writes every event as one JSON line through `log`.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &ScreeningEvent) {
        let line = serde_json::to_string(event).unwrap_or_else(|e| format!("{:?} ({})", event, e));
        match event {
            ScreeningEvent::ResumeSkipped { .. } => log::warn!("{}", line),
            _ => log::info!("{}", line),
        }
    }
}

/// Keeps events in memory for callers that persist them later.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<ScreeningEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScreeningEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &ScreeningEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Forwards to several sinks in order.
pub struct FanoutSink<'a> {
    sinks: Vec<&'a dyn EventSink>,
}

impl<'a> FanoutSink<'a> {
    pub fn new(sinks: Vec<&'a dyn EventSink>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanoutSink<'_> {
    fn emit(&self, event: &ScreeningEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}
