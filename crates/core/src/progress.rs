//! Composition progress reporting.
//!
//! A [`ComposeProgress`] observer is told how many generation calls a
//! composition will make and when each one starts and finishes. Every
//! method has an empty default, so observers implement only what they show.

use std::fmt;

/// One generation call of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeStage {
    Headline,
    Introduction,
    /// Zero-based index of the content chunk.
    Section(usize),
    CallToAction,
}

impl fmt::Display for ComposeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeStage::Headline => write!(f, "headline"),
            ComposeStage::Introduction => write!(f, "introduction"),
            ComposeStage::Section(index) => write!(f, "section {}", index + 1),
            ComposeStage::CallToAction => write!(f, "call to action"),
        }
    }
}

pub trait ComposeProgress: Send + Sync {
    /// Called once, before the first generation call.
    fn on_compose_start(&self, total_stages: usize) {
        let _ = total_stages;
    }

    fn on_stage_start(&self, stage: ComposeStage) {
        let _ = stage;
    }

    fn on_stage_complete(&self, stage: ComposeStage) {
        let _ = stage;
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ComposeProgress for NoProgress {}
