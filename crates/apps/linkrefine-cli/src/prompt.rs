//! Interactive prompt utilities for CLI commands.

use std::io::{self, IsTerminal};

use dialoguer::{theme::ColorfulTheme, Select};
use linkrefine_graph::Proposal;

/// Check if we're running in an interactive terminal.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// What the user chose for one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewChoice {
    Apply,
    Skip,
    /// Skip the remaining backlinks of this candidate.
    SkipCandidate,
    /// Add the candidate to the skip-list.
    NeverPage,
    /// Add the candidate as a hierarchy prefix to the skip-list.
    NeverHierarchy,
    Quit,
}

impl ReviewChoice {
    const ALL: [ReviewChoice; 6] = [
        Self::Apply,
        Self::Skip,
        Self::SkipCandidate,
        Self::NeverPage,
        Self::NeverHierarchy,
        Self::Quit,
    ];

    fn label(self, candidate: &str) -> String {
        match self {
            Self::Apply => "Apply".to_string(),
            Self::Skip => "Skip this page".to_string(),
            Self::SkipCandidate => format!("Skip remaining pages linking to {}", candidate),
            Self::NeverPage => format!("Never suggest {}", candidate),
            Self::NeverHierarchy => format!("Never suggest {} or pages below it", candidate),
            Self::Quit => "Quit".to_string(),
        }
    }
}

/// Ask what to do with a proposal. Escape or `q` quits.
pub fn choose_review_action(proposal: &Proposal) -> io::Result<ReviewChoice> {
    let labels: Vec<String> = ReviewChoice::ALL
        .iter()
        .map(|c| c.label(&proposal.candidate))
        .collect();
    let selected = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Unlink {} in {}?", proposal.candidate, proposal.source))
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(|e| io::Error::other(e.to_string()))?;

    Ok(selected.map_or(ReviewChoice::Quit, |idx| ReviewChoice::ALL[idx]))
}
