//! CLI command implementations.

pub mod candidates;
pub mod completions;
pub mod refine;
pub mod skip;

// Re-export command handlers
pub use candidates::candidates;
pub use completions::completions;
pub use refine::refine;
pub use skip::skip;

use std::path::PathBuf;

use linkrefine_graph::{logseq_roots, prepare_with_progress, Phase, Prepared, RefineConfig};

use crate::cli::SelectionArgs;
use crate::error::CliResult;
use crate::output::OutputFormat;
use crate::progress;

/// Directories to scan: the given paths (or the current directory), each
/// expanded into its `pages/` and `journals/` roots under `--logseq`.
pub(crate) fn resolve_roots(selection: &SelectionArgs) -> CliResult<Vec<PathBuf>> {
    let paths = if selection.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        selection.paths.clone()
    };

    if !selection.logseq {
        return Ok(paths);
    }
    let mut roots = Vec::new();
    for graph_dir in &paths {
        roots.extend(logseq_roots(graph_dir)?);
    }
    Ok(roots)
}

/// Scan the corpus and select candidates behind a spinner.
pub(crate) fn scan(
    roots: &[PathBuf],
    config: &RefineConfig,
    format: OutputFormat,
) -> CliResult<Prepared> {
    let pb = progress::for_format(format, "Scanning notes...");
    let prepared = progress::with_spinner(pb.clone(), || {
        prepare_with_progress(roots, config, |phase| {
            if phase == Phase::Selecting {
                pb.set_message("Selecting candidates...");
            }
        })
    })?;
    Ok(prepared)
}
