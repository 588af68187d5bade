//! Refinement orchestration.
//!
//! A [`RefineSession`] walks candidates in selection order and, for each, the
//! pages linking to it in backlink order. Every (candidate, source) pair
//! becomes a [`Proposal`] holding the source's current content and the
//! content with links to the candidate stripped.
//!
//! The session is pull-based: callers either step through it with
//! [`RefineSession::next_step`] and call [`RefineSession::apply`] /
//! [`RefineSession::skip`] themselves, or hand a [`Decider`], a
//! [`PageWriter`] and a [`RefineObserver`] to [`RefineSession::run`].
//!
//! Applying is a two-step commit: the writer persists the refined content
//! first, and only after it succeeds is the in-memory graph updated. A failed
//! write leaves the graph untouched and the run continues with the next
//! proposal. Quitting stops the loop; writes already applied stay applied.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RefineConfig;
use crate::corpus::{load_corpus, Collision};
use crate::diff::LineDiff;
use crate::error::{RefineError, Result};
use crate::index::LinkGraph;
use crate::links::{count_links_to, strip_links_with};
use crate::select::{select, Candidate};
use crate::writer::PageWriter;

/// Where a session is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Reading the corpus and building the graph.
    Scanning,
    Selecting,
    ReviewingCandidate,
    ReviewingBacklink,
    Applying,
    Skipping,
    Done,
}

/// Answer of a decision function for one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Write the refined content.
    Apply,
    /// Leave this source page alone.
    Skip,
    /// Leave this source page and the rest of the candidate's backlinks alone.
    SkipCandidate,
    /// Stop the run.
    Quit,
}

impl From<bool> for Decision {
    fn from(accept: bool) -> Self {
        if accept {
            Self::Apply
        } else {
            Self::Skip
        }
    }
}

/// Proposed removal of the links to `candidate` from `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub candidate: String,
    pub source: String,
    pub path: PathBuf,
    pub original: String,
    pub refined: String,
    pub links_removed: usize,
}

impl Proposal {
    pub fn diff(&self) -> LineDiff {
        LineDiff::compute(&self.original, &self.refined)
    }
}

/// One step of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Review of a new candidate begins.
    Candidate(Candidate),
    /// A source page of the current candidate awaits a decision.
    Proposal(Proposal),
}

/// Accept/reject decision for a proposal.
///
/// Any `FnMut(&Proposal) -> bool` closure is a decider: `true` applies,
/// `false` skips.
pub trait Decider {
    fn decide(&mut self, proposal: &Proposal) -> Decision;
}

impl<F> Decider for F
where
    F: FnMut(&Proposal) -> bool,
{
    fn decide(&mut self, proposal: &Proposal) -> Decision {
        self(proposal).into()
    }
}

/// Presentation sink. Purely observational; every method defaults to a no-op.
pub trait RefineObserver {
    fn on_candidate(&mut self, _candidate: &Candidate, _content: &str) {}
    fn on_proposal(&mut self, _proposal: &Proposal) {}
    fn on_applied(&mut self, _proposal: &Proposal) {}
    fn on_skipped(&mut self, _proposal: &Proposal) {}
    fn on_write_failed(&mut self, _proposal: &Proposal, _error: &RefineError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RefineObserver for NoopObserver {}

/// A write that failed during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedWrite {
    pub candidate: String,
    pub source: String,
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Candidates whose review started.
    pub candidates_reviewed: usize,
    pub applied: usize,
    pub skipped: usize,
    /// Proposals dropped because the source no longer links to the candidate.
    pub unchanged: usize,
    pub failed: Vec<FailedWrite>,
    /// The run was stopped before all candidates were reviewed.
    pub aborted: bool,
}

/// A session plus what the scan reported.
#[derive(Debug)]
pub struct Prepared {
    pub session: RefineSession,
    /// Files and directories skipped during the scan.
    pub skipped: Vec<RefineError>,
    pub collisions: Vec<Collision>,
}

/// Scan `roots`, build the graph and select candidates.
pub fn prepare<P: AsRef<Path>>(roots: &[P], config: &RefineConfig) -> Result<Prepared> {
    prepare_with_progress(roots, config, |_| {})
}

/// Like [`prepare`], calling `on_phase` as the scan and the selection start.
pub fn prepare_with_progress<P, F>(
    roots: &[P],
    config: &RefineConfig,
    mut on_phase: F,
) -> Result<Prepared>
where
    P: AsRef<Path>,
    F: FnMut(Phase),
{
    config.validate()?;
    on_phase(Phase::Scanning);
    let report = load_corpus(roots, &config.scan)?;
    let graph = LinkGraph::build(report.pages, config.link_policy);
    on_phase(Phase::Selecting);
    let candidates = select(&graph, &config.selection, &config.skip);
    Ok(Prepared {
        session: RefineSession::new(graph, candidates),
        skipped: report.skipped,
        collisions: report.collisions,
    })
}

/// Per-run refinement state machine.
#[derive(Debug)]
pub struct RefineSession {
    graph: LinkGraph,
    candidates: Vec<Candidate>,
    phase: Phase,
    /// Index of the candidate under review; `None` before the first.
    current: Option<usize>,
    /// Backlink sources of the current candidate, snapshotted when its review starts.
    sources: Vec<String>,
    next_source: usize,
    summary: RunSummary,
}

impl RefineSession {
    pub fn new(graph: LinkGraph, candidates: Vec<Candidate>) -> Self {
        Self {
            graph,
            candidates,
            phase: Phase::Selecting,
            current: None,
            sources: Vec::new(),
            next_source: 0,
            summary: RunSummary::default(),
        }
    }

    pub fn graph(&self) -> &LinkGraph {
        &self.graph
    }

    pub fn into_graph(self) -> LinkGraph {
        self.graph
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Advance to the next candidate or proposal.
    ///
    /// Proposals whose refined content equals the current content (the link
    /// was already stripped earlier in the run) are counted as unchanged and
    /// never returned.
    pub fn next_step(&mut self) -> Option<Step> {
        loop {
            if self.phase == Phase::Done {
                return None;
            }

            if let Some(idx) = self.current {
                if self.next_source < self.sources.len() {
                    let source = self.sources[self.next_source].clone();
                    self.next_source += 1;
                    let candidate = self.candidates[idx].page.clone();
                    match self.propose(&candidate, &source) {
                        Some(proposal) => {
                            self.phase = Phase::ReviewingBacklink;
                            return Some(Step::Proposal(proposal));
                        }
                        None => {
                            debug!(candidate = %candidate, source = %source, "No links left to strip");
                            self.summary.unchanged += 1;
                            continue;
                        }
                    }
                }
            }

            let next = self.current.map_or(0, |idx| idx + 1);
            if next >= self.candidates.len() {
                self.phase = Phase::Done;
                return None;
            }
            self.current = Some(next);
            let candidate = self.candidates[next].clone();
            self.sources = self
                .graph
                .backlinks(&candidate.page)
                .map(|sources| sources.into_iter().map(str::to_string).collect())
                .unwrap_or_default();
            self.next_source = 0;
            self.phase = Phase::ReviewingCandidate;
            self.summary.candidates_reviewed += 1;
            return Some(Step::Candidate(candidate));
        }
    }

    /// Persist a proposal and then record it in the graph.
    ///
    /// If the write fails, the graph is not updated and the failure is
    /// recorded in the summary before the error is returned.
    pub fn apply<W: PageWriter + ?Sized>(&mut self, proposal: &Proposal, writer: &mut W) -> Result<()> {
        self.phase = Phase::Applying;
        let current = self.graph.content(&proposal.source)?;
        if current != proposal.original {
            return Err(RefineError::StaleProposal(proposal.source.clone()));
        }

        if let Err(e) = writer.write(&proposal.path, &proposal.refined) {
            warn!(
                candidate = %proposal.candidate,
                source = %proposal.source,
                error = %e,
                "Refinement not applied"
            );
            self.summary.failed.push(FailedWrite {
                candidate: proposal.candidate.clone(),
                source: proposal.source.clone(),
                path: proposal.path.clone(),
                error: e.to_string(),
            });
            return Err(e);
        }

        self.graph
            .update_content(&proposal.source, proposal.refined.clone())?;
        self.summary.applied += 1;
        info!(
            candidate = %proposal.candidate,
            source = %proposal.source,
            links = proposal.links_removed,
            "Refinement applied"
        );
        Ok(())
    }

    /// Leave a proposal's source page unchanged.
    pub fn skip(&mut self, proposal: &Proposal) {
        self.phase = Phase::Skipping;
        self.summary.skipped += 1;
        debug!(candidate = %proposal.candidate, source = %proposal.source, "Refinement skipped");
    }

    /// Drop the remaining backlinks of the current candidate.
    pub fn skip_candidate(&mut self) {
        self.next_source = self.sources.len();
    }

    /// Stop the run. Already applied writes stay applied.
    pub fn quit(&mut self) {
        self.phase = Phase::Done;
        self.summary.aborted = true;
    }

    /// Drive the whole review loop.
    ///
    /// Failed writes are reported to the observer and the loop moves on.
    /// Only non-recoverable errors end the run early.
    pub fn run<D, W, O>(&mut self, decider: &mut D, writer: &mut W, observer: &mut O) -> Result<RunSummary>
    where
        D: Decider + ?Sized,
        W: PageWriter + ?Sized,
        O: RefineObserver + ?Sized,
    {
        while let Some(step) = self.next_step() {
            let proposal = match step {
                Step::Candidate(candidate) => {
                    let content = self.graph.content(&candidate.page).unwrap_or_default();
                    observer.on_candidate(&candidate, content);
                    continue;
                }
                Step::Proposal(proposal) => proposal,
            };

            observer.on_proposal(&proposal);
            match decider.decide(&proposal) {
                Decision::Apply => match self.apply(&proposal, writer) {
                    Ok(()) => observer.on_applied(&proposal),
                    Err(e) if e.is_recoverable() => observer.on_write_failed(&proposal, &e),
                    Err(e) => return Err(e),
                },
                Decision::Skip => {
                    self.skip(&proposal);
                    observer.on_skipped(&proposal);
                }
                Decision::SkipCandidate => {
                    self.skip(&proposal);
                    self.skip_candidate();
                    observer.on_skipped(&proposal);
                }
                Decision::Quit => {
                    self.quit();
                    break;
                }
            }
        }

        info!(
            applied = self.summary.applied,
            skipped = self.summary.skipped,
            failed = self.summary.failed.len(),
            aborted = self.summary.aborted,
            "Refinement run finished"
        );
        Ok(self.summary.clone())
    }

    fn propose(&self, candidate: &str, source: &str) -> Option<Proposal> {
        let record = self.graph.record(source)?;
        let policy = self.graph.policy();
        let original = record.content();
        let refined = strip_links_with(original, candidate, policy);
        if refined == original {
            return None;
        }
        Some(Proposal {
            candidate: candidate.to_string(),
            source: source.to_string(),
            path: record.path().to_path_buf(),
            original: original.to_string(),
            refined: refined.into_owned(),
            links_removed: count_links_to(original, candidate, policy),
        })
    }
}
