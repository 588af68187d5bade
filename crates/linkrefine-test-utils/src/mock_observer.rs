//! Presentation sink that records what it was shown.

use linkrefine_graph::{Candidate, Proposal, RefineError, RefineObserver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Candidate(String),
    Proposal { candidate: String, source: String },
    Applied { candidate: String, source: String },
    Skipped { candidate: String, source: String },
    WriteFailed { source: String, error: String },
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<ObservedEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Candidate(page) => Some(page.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RefineObserver for RecordingObserver {
    fn on_candidate(&mut self, candidate: &Candidate, _content: &str) {
        self.events.push(ObservedEvent::Candidate(candidate.page.clone()));
    }

    fn on_proposal(&mut self, proposal: &Proposal) {
        self.events.push(ObservedEvent::Proposal {
            candidate: proposal.candidate.clone(),
            source: proposal.source.clone(),
        });
    }

    fn on_applied(&mut self, proposal: &Proposal) {
        self.events.push(ObservedEvent::Applied {
            candidate: proposal.candidate.clone(),
            source: proposal.source.clone(),
        });
    }

    fn on_skipped(&mut self, proposal: &Proposal) {
        self.events.push(ObservedEvent::Skipped {
            candidate: proposal.candidate.clone(),
            source: proposal.source.clone(),
        });
    }

    fn on_write_failed(&mut self, proposal: &Proposal, error: &RefineError) {
        self.events.push(ObservedEvent::WriteFailed {
            source: proposal.source.clone(),
            error: error.to_string(),
        });
    }
}
