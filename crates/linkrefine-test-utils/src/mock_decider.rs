//! Scripted decision function.

use std::collections::VecDeque;

use linkrefine_graph::{Decider, Decision, Proposal};

/// Answers proposals from a fixed script, then falls back to a default.
///
/// Every proposal it is asked about is kept for later assertions.
#[derive(Debug, Clone)]
pub struct ScriptedDecider {
    script: VecDeque<Decision>,
    fallback: Decision,
    pub seen: Vec<Proposal>,
}

impl ScriptedDecider {
    pub fn new(script: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: Decision::Skip,
            seen: Vec::new(),
        }
    }

    /// Apply everything.
    pub fn accept_all() -> Self {
        Self::new([]).otherwise(Decision::Apply)
    }

    /// Skip everything.
    pub fn reject_all() -> Self {
        Self::new([])
    }

    /// Answer used once the script runs out.
    pub fn otherwise(mut self, decision: Decision) -> Self {
        self.fallback = decision;
        self
    }

    /// `(candidate, source)` pairs in the order they were asked about.
    pub fn asked(&self) -> Vec<(String, String)> {
        self.seen
            .iter()
            .map(|p| (p.candidate.clone(), p.source.clone()))
            .collect()
    }
}

impl Decider for ScriptedDecider {
    fn decide(&mut self, proposal: &Proposal) -> Decision {
        self.seen.push(proposal.clone());
        self.script.pop_front().unwrap_or(self.fallback)
    }
}
