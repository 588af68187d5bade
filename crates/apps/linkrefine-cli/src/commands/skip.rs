//! Skip-list management.

use std::path::Path;

use crate::cli::SkipCommand;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, Render, SkipListOutput};

/// Execute a skip subcommand. Changes are saved to `config_path`.
pub fn skip(
    mut config: CliConfig,
    config_path: &Path,
    format: OutputFormat,
    action: &SkipCommand,
) -> CliResult<String> {
    let skip_list = &mut config.refine.skip;
    let message = match action {
        SkipCommand::List => None,
        SkipCommand::Page { name } => {
            let name = non_empty(name)?;
            Some(if skip_list.add_page(name) {
                format!("Will never suggest '{}'", name)
            } else {
                format!("'{}' is already skipped", name)
            })
        }
        SkipCommand::Hierarchy { prefix } => {
            let prefix = non_empty(prefix.trim_end_matches('/'))?;
            Some(if skip_list.add_hierarchy(prefix) {
                format!("Will never suggest '{}' or pages below it", prefix)
            } else {
                format!("'{}' is already skipped", prefix)
            })
        }
        SkipCommand::Remove { name } => {
            if !skip_list.remove(name) {
                return Err(CliError::user(format!("'{}' is not in the skip-list", name)));
            }
            Some(format!("'{}' removed from the skip-list", name))
        }
    };

    if message.is_some() {
        config.save(config_path)?;
    }

    let output = SkipListOutput::new(message, config_path, &config.refine.skip);
    Ok(output.render(format))
}

fn non_empty(name: &str) -> CliResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::user("page name must not be empty"));
    }
    Ok(name)
}
