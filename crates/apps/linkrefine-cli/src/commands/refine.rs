//! Interactive refinement.

use std::path::Path;

use linkrefine_graph::{
    FsPageWriter, NoopObserver, Prepared, Proposal, RefineObserver, RunSummary,
};
use tracing::info;

use crate::cli::SelectionArgs;
use crate::commands::{resolve_roots, scan};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ProposalOutput, Render, RunOutput, ScanSummary};
use crate::prompt::{is_interactive, ReviewChoice};
use crate::review::{PromptDecider, TerminalObserver};

/// Execute the refine command.
pub fn refine(
    config: CliConfig,
    config_path: &Path,
    format: OutputFormat,
    selection: &SelectionArgs,
    dry_run: bool,
    context: Option<usize>,
) -> CliResult<String> {
    if !dry_run && !is_interactive() {
        return Err(CliError::user(
            "refine needs an interactive terminal; use --dry-run or 'linkrefine candidates'",
        ));
    }

    let mut run_config = config.refine.clone();
    selection.apply_to(&mut run_config);
    let context = context.unwrap_or(config.display.context_lines);

    let roots = resolve_roots(selection)?;
    let mut prepared = scan(&roots, &run_config, format)?;
    let scan_summary = ScanSummary::from_prepared(&roots, &prepared);

    let output = if dry_run {
        let (summary, proposals) = preview_all(&mut prepared, context)?;
        RunOutput {
            dry_run: true,
            scan: scan_summary,
            summary,
            proposals,
        }
    } else {
        if format == OutputFormat::Human {
            eprintln!("{}", scan_summary.render_human());
        }
        let mut decider = PromptDecider::interactive();
        let mut observer = TerminalObserver::new(
            context,
            config.display.show_candidate,
            run_config.selection.measure,
        );
        let summary = review(&config, config_path, &mut prepared, &mut decider, &mut observer)?;
        if let Some(e) = decider.take_error() {
            return Err(CliError::Aborted(e.to_string()));
        }
        RunOutput {
            dry_run: false,
            scan: scan_summary,
            summary,
            proposals: Vec::new(),
        }
    };

    Ok(output.render(format))
}

/// Collect every proposal without asking or writing.
fn preview_all(
    prepared: &mut Prepared,
    context: usize,
) -> CliResult<(RunSummary, Vec<ProposalOutput>)> {
    let mut proposals = Vec::new();
    let mut decider = |p: &Proposal| {
        proposals.push(ProposalOutput::new(p, context));
        false
    };
    let summary = prepared
        .session
        .run(&mut decider, &mut FsPageWriter::new(), &mut NoopObserver)?;
    Ok((summary, proposals))
}

/// Run the review loop and persist any "never suggest" choices to the
/// configuration file.
pub(crate) fn review<F, O>(
    config: &CliConfig,
    config_path: &Path,
    prepared: &mut Prepared,
    decider: &mut PromptDecider<F>,
    observer: &mut O,
) -> CliResult<RunSummary>
where
    F: FnMut(&Proposal) -> std::io::Result<ReviewChoice>,
    O: RefineObserver,
{
    let summary = prepared
        .session
        .run(decider, &mut FsPageWriter::new(), observer)?;

    let mut saved = config.clone();
    if decider.extend_skip_list(&mut saved.refine.skip) {
        saved.save(config_path)?;
        info!(path = %config_path.display(), "Skip-list updated");
    }
    Ok(summary)
}
