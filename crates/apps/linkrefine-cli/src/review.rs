//! Terminal side of a refinement run: the decision function backed by the
//! prompt and the observer that prints candidates and diffs.

use std::io;

use colored::Colorize;
use linkrefine_graph::{
    Candidate, ContentMeasure, Decider, Decision, Proposal, RefineError, RefineObserver, SkipList,
};

use crate::output::{preview, render_hunks};
use crate::prompt::{choose_review_action, ReviewChoice};

/// Lines of a candidate's own content shown before its backlinks.
const CANDIDATE_PREVIEW_LINES: usize = 10;

/// Decision function that asks a chooser (the terminal prompt, or a script in
/// tests) and remembers which candidates the user never wants to see again.
pub struct PromptDecider<F> {
    chooser: F,
    never_pages: Vec<String>,
    never_hierarchies: Vec<String>,
    error: Option<io::Error>,
}

impl PromptDecider<fn(&Proposal) -> io::Result<ReviewChoice>> {
    /// Decider backed by the interactive prompt.
    pub fn interactive() -> Self {
        Self::new(choose_review_action)
    }
}

impl<F> PromptDecider<F>
where
    F: FnMut(&Proposal) -> io::Result<ReviewChoice>,
{
    pub fn new(chooser: F) -> Self {
        Self {
            chooser,
            never_pages: Vec::new(),
            never_hierarchies: Vec::new(),
            error: None,
        }
    }

    /// Record the "never suggest" choices in `skip`. Returns whether anything was added.
    pub fn extend_skip_list(&self, skip: &mut SkipList) -> bool {
        let mut changed = false;
        for page in &self.never_pages {
            changed |= skip.add_page(page.clone());
        }
        for prefix in &self.never_hierarchies {
            changed |= skip.add_hierarchy(prefix.clone());
        }
        changed
    }

    /// The prompt failure that ended the run, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<F> Decider for PromptDecider<F>
where
    F: FnMut(&Proposal) -> io::Result<ReviewChoice>,
{
    fn decide(&mut self, proposal: &Proposal) -> Decision {
        match (self.chooser)(proposal) {
            Ok(ReviewChoice::Apply) => Decision::Apply,
            Ok(ReviewChoice::Skip) => Decision::Skip,
            Ok(ReviewChoice::SkipCandidate) => Decision::SkipCandidate,
            Ok(ReviewChoice::NeverPage) => {
                self.never_pages.push(proposal.candidate.clone());
                Decision::SkipCandidate
            }
            Ok(ReviewChoice::NeverHierarchy) => {
                self.never_hierarchies.push(proposal.candidate.clone());
                Decision::SkipCandidate
            }
            Ok(ReviewChoice::Quit) => Decision::Quit,
            Err(e) => {
                tracing::warn!(error = %e, "Prompt failed, stopping the run");
                self.error = Some(e);
                Decision::Quit
            }
        }
    }
}

/// Prints review progress to stderr so stdout stays free for the summary.
pub struct TerminalObserver {
    context: usize,
    show_candidate: bool,
    measure: ContentMeasure,
}

impl TerminalObserver {
    pub fn new(context: usize, show_candidate: bool, measure: ContentMeasure) -> Self {
        Self {
            context,
            show_candidate,
            measure,
        }
    }
}

impl RefineObserver for TerminalObserver {
    fn on_candidate(&mut self, candidate: &Candidate, content: &str) {
        eprintln!();
        eprintln!(
            "{} {} {}",
            "Candidate:".magenta().bold(),
            candidate.page.bold(),
            format!(
                "({} backlinks, {} {})",
                candidate.backlinks, candidate.content_size, self.measure
            )
            .dimmed()
        );
        if self.show_candidate {
            for line in preview(content, CANDIDATE_PREVIEW_LINES).lines() {
                eprintln!("  {} {}", "│".dimmed(), line);
            }
        }
    }

    fn on_proposal(&mut self, proposal: &Proposal) {
        eprintln!();
        eprintln!(
            "{} {}",
            proposal.source.bold(),
            format!("({})", proposal.path.display()).dimmed()
        );
        eprint!("{}", render_hunks(&proposal.diff().hunks(self.context)));
    }

    fn on_applied(&mut self, proposal: &Proposal) {
        eprintln!("{} {}", "Updated".green(), proposal.path.display());
    }

    fn on_skipped(&mut self, proposal: &Proposal) {
        eprintln!("{}", format!("Skipped {}", proposal.source).dimmed());
    }

    fn on_write_failed(&mut self, _proposal: &Proposal, error: &RefineError) {
        eprintln!("{} {}", "Write failed:".red().bold(), error);
    }
}
