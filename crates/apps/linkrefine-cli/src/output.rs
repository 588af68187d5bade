//! Output formatting for CLI.

use colored::Colorize;
use linkrefine_graph::{Candidate, Hunk, LineKind, Prepared, Proposal, RunSummary, SkipList};
use serde::Serialize;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use 'human' or 'json'.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for renderable output.
pub trait Render {
    /// Render as human-readable string.
    fn render_human(&self) -> String;

    /// Render as JSON string.
    fn render_json(&self) -> String;

    /// Render in the specified format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// What the corpus scan found.
#[derive(Debug, Serialize)]
pub struct ScanSummary {
    pub roots: Vec<String>,
    pub pages: usize,
    pub skipped_files: Vec<String>,
    pub collisions: usize,
    pub dangling_links: usize,
}

impl ScanSummary {
    pub fn from_prepared(roots: &[std::path::PathBuf], prepared: &Prepared) -> Self {
        Self {
            roots: roots.iter().map(|r| r.display().to_string()).collect(),
            pages: prepared.session.graph().len(),
            skipped_files: prepared.skipped.iter().map(|e| e.to_string()).collect(),
            collisions: prepared.collisions.len(),
            dangling_links: prepared.session.graph().dangling_links().len(),
        }
    }

    pub fn render_human(&self) -> String {
        self.render_lines().join("\n")
    }

    fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} {} pages in {}",
            "Scanned:".bold(),
            self.pages,
            self.roots.join(", ")
        )];
        if !self.skipped_files.is_empty() {
            lines.push(format!(
                "{} {} unreadable",
                "Skipped:".yellow().bold(),
                self.skipped_files.len()
            ));
            for reason in &self.skipped_files {
                lines.push(format!("  {}", reason.dimmed()));
            }
        }
        if self.collisions > 0 {
            lines.push(format!(
                "{} {} files share a page name with another file",
                "Collisions:".yellow().bold(),
                self.collisions
            ));
        }
        if self.dangling_links > 0 {
            lines.push(format!(
                "{} {} links to pages that do not exist",
                "Dangling:".bold(),
                self.dangling_links
            ));
        }
        lines
    }
}

/// Output for the candidates command.
#[derive(Debug, Serialize)]
pub struct CandidatesOutput {
    pub scan: ScanSummary,
    pub measure: String,
    pub candidates: Vec<Candidate>,
}

impl Render for CandidatesOutput {
    fn render_human(&self) -> String {
        let mut lines = self.scan.render_lines();
        lines.push(String::new());

        if self.candidates.is_empty() {
            lines.push("No refinement candidates found.".dimmed().to_string());
            return lines.join("\n");
        }

        lines.push(format!(
            "{} ({})",
            "CANDIDATES".green().bold(),
            self.candidates.len()
        ));
        for c in &self.candidates {
            lines.push(format!(
                "  {:>5} backlinks  {:>4} {:<5}  {}",
                c.backlinks,
                c.content_size,
                self.measure,
                c.page.cyan()
            ));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// A proposal as shown by `refine --dry-run`.
#[derive(Debug, Serialize)]
pub struct ProposalOutput {
    pub candidate: String,
    pub source: String,
    pub path: String,
    pub links_removed: usize,
    pub hunks: Vec<Hunk>,
}

impl ProposalOutput {
    pub fn new(proposal: &Proposal, context: usize) -> Self {
        Self {
            candidate: proposal.candidate.clone(),
            source: proposal.source.clone(),
            path: proposal.path.display().to_string(),
            links_removed: proposal.links_removed,
            hunks: proposal.diff().hunks(context),
        }
    }

    fn render_human(&self) -> String {
        let mut out = format!(
            "{} {} {}\n",
            self.source.bold(),
            format!("({})", self.path).dimmed(),
            format!("-{} link(s) to {}", self.links_removed, self.candidate).yellow()
        );
        out.push_str(&render_hunks(&self.hunks));
        out
    }
}

/// Output for the refine command.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub dry_run: bool,
    pub scan: ScanSummary,
    pub summary: RunSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub proposals: Vec<ProposalOutput>,
}

impl Render for RunOutput {
    fn render_human(&self) -> String {
        let mut lines = Vec::new();

        if self.dry_run {
            lines.extend(self.scan.render_lines());
            lines.push(String::new());
            for proposal in &self.proposals {
                lines.push(proposal.render_human());
            }
            lines.push(format!(
                "{} {} page(s) would change across {} candidate(s)",
                "Dry run:".cyan().bold(),
                self.proposals.len(),
                self.summary.candidates_reviewed
            ));
            return lines.join("\n");
        }

        let s = &self.summary;
        if s.candidates_reviewed == 0 {
            return "No refinement candidates found.".dimmed().to_string();
        }
        let title = if s.aborted {
            "Refinement stopped".yellow().bold()
        } else {
            "Refinement finished".green().bold()
        };
        lines.push(title.to_string());
        lines.push(format!("  {} {}", "Candidates:".bold(), s.candidates_reviewed));
        lines.push(format!("  {} {}", "Applied:".bold(), s.applied));
        lines.push(format!("  {} {}", "Skipped:".bold(), s.skipped));
        if s.unchanged > 0 {
            lines.push(format!("  {} {}", "Already clean:".bold(), s.unchanged));
        }
        if !s.failed.is_empty() {
            lines.push(format!(
                "  {} {}",
                "Failed writes:".red().bold(),
                s.failed.len()
            ));
            for f in &s.failed {
                lines.push(format!("    {} {}", f.path.display(), f.error.dimmed()));
            }
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for the skip command.
#[derive(Debug, Serialize)]
pub struct SkipListOutput {
    /// Description of the change, `None` for `skip list`.
    pub message: Option<String>,
    pub config_path: String,
    pub pages: Vec<String>,
    pub hierarchies: Vec<String>,
}

impl SkipListOutput {
    pub fn new(message: Option<String>, config_path: &std::path::Path, skip: &SkipList) -> Self {
        Self {
            message,
            config_path: config_path.display().to_string(),
            pages: skip.pages.clone(),
            hierarchies: skip.hierarchies.clone(),
        }
    }
}

impl Render for SkipListOutput {
    fn render_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(message) = &self.message {
            lines.push(message.green().to_string());
            lines.push(format!("{} {}", "Saved to:".dimmed(), self.config_path.dimmed()));
            return lines.join("\n");
        }

        if self.pages.is_empty() && self.hierarchies.is_empty() {
            return "Skip-list is empty.".dimmed().to_string();
        }
        if !self.pages.is_empty() {
            lines.push(format!("{} ({})", "PAGES".bold(), self.pages.len()));
            lines.extend(self.pages.iter().map(|p| format!("  {}", p)));
        }
        if !self.hierarchies.is_empty() {
            lines.push(format!("{} ({})", "HIERARCHIES".bold(), self.hierarchies.len()));
            lines.extend(self.hierarchies.iter().map(|h| format!("  {}/...", h)));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Render diff hunks with `-`/`+` markers, removals red and additions green.
pub fn render_hunks(hunks: &[Hunk]) -> String {
    let mut out = String::new();
    for hunk in hunks {
        out.push_str(&hunk.header().cyan().to_string());
        out.push('\n');
        for line in &hunk.lines {
            let rendered = match line.kind {
                LineKind::Unchanged => format!(" {}", line.text).dimmed().to_string(),
                LineKind::Removed => format!("-{}", line.text).red().to_string(),
                LineKind::Added => format!("+{}", line.text).green().to_string(),
            };
            out.push_str(&rendered);
            out.push('\n');
        }
    }
    out
}

/// First `max_lines` lines of `content`, with a marker if truncated.
pub fn preview(content: &str, max_lines: usize) -> String {
    if content.trim().is_empty() {
        return "(empty)".to_string();
    }
    let total = content.lines().count();
    let mut out: Vec<String> = content.lines().take(max_lines).map(str::to_string).collect();
    if total > max_lines {
        out.push(format!("... {} more line(s)", total - max_lines));
    }
    out.join("\n")
}
