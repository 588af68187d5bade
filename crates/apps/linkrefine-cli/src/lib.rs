//! Command-line interface for link refinement.
//!
//! This crate provides the `linkrefine` binary. It includes commands for:
//!
//! - **Review**: step through candidates and their linking pages, applying
//!   or skipping each proposed change
//! - **Listing**: show candidates without changing anything
//! - **Skip-list**: pages and hierarchies never proposed again
//!
//! # Quick Start
//!
//! ```bash
//! # What would be proposed?
//! linkrefine candidates ~/notes
//!
//! # Show every diff without writing
//! linkrefine refine ~/notes --dry-run
//!
//! # Review a Logseq graph interactively
//! linkrefine refine ~/logseq-graph --logseq
//! ```
//!
//! # Output Formats
//!
//! All commands support `--format`:
//!
//! - `human` (default): Human-readable with colors
//! - `json`: Machine-readable JSON
//!
//! # Configuration
//!
//! Configuration is loaded from `config.toml` in the platform config
//! directory (`LINKREFINE_CONFIG_DIR` overrides it). Override the file with
//! `--config`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod review;

// Re-export main types
pub use cli::{Cli, Commands, OutputFormatArg, SelectionArgs, SkipCommand};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Render};
