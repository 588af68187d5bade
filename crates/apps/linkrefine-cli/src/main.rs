//! linkrefine binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use linkrefine_cli::{
    cli::{Cli, Commands},
    commands,
    config::{default_config_path, CliConfig},
    error::{CliError, CliResult},
    output::OutputFormat,
};

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on --verbose flag or RUST_LOG env var
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if cli.verbose || has_rust_log {
        let mut filter = EnvFilter::from_default_env();
        if cli.verbose {
            if let Ok(directive) = "linkrefine=debug".parse() {
                filter = filter.add_directive(directive);
            }
        }
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    if let Err(e) = run(cli) {
        print_error(&e);
        std::process::exit(e.exit_code());
    }
}

/// Print a user-friendly error message with a recovery hint.
fn print_error(e: &CliError) {
    eprintln!("{}: {}", "Error".red().bold(), e);

    if let Some(hint) = e.hint() {
        eprintln!("{}: {}", "Hint".cyan(), hint);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    // Load configuration
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = CliConfig::load(&config_path)?;

    // Get output format
    let format: OutputFormat = cli.format.into();

    // Dispatch command
    let output = match cli.command {
        Commands::Refine {
            selection,
            dry_run,
            context,
        } => commands::refine(config, &config_path, format, &selection, dry_run, context)?,

        Commands::Candidates { selection } => commands::candidates(config, format, &selection)?,

        Commands::Skip { action } => commands::skip(config, &config_path, format, &action)?,

        Commands::Completions { shell } => commands::completions(shell)?,
    };

    // Print output
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
