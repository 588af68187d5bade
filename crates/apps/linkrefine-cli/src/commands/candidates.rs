//! List refinement candidates.

use crate::cli::SelectionArgs;
use crate::commands::{resolve_roots, scan};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{CandidatesOutput, OutputFormat, Render, ScanSummary};

/// Execute the candidates command.
pub fn candidates(
    config: CliConfig,
    format: OutputFormat,
    selection: &SelectionArgs,
) -> CliResult<String> {
    let mut run_config = config.refine;
    selection.apply_to(&mut run_config);

    let roots = resolve_roots(selection)?;
    let prepared = scan(&roots, &run_config, format)?;

    let output = CandidatesOutput {
        scan: ScanSummary::from_prepared(&roots, &prepared),
        measure: run_config.selection.measure.to_string(),
        candidates: prepared.session.candidates().to_vec(),
    };

    Ok(output.render(format))
}
