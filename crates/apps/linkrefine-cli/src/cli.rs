//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use linkrefine_graph::{ContentMeasure, LinkPolicy, RefineConfig};

use crate::output::OutputFormat;

/// Refine wiki links in markdown note corpora.
#[derive(Parser, Debug)]
#[command(name = "linkrefine")]
#[command(version)]
#[command(about = "Strip [[links]] to pages that carry almost no content")]
#[command(
    long_about = "Finds pages that many notes link to but that hold almost no content of their own, \
and proposes removing the [[ ]] markup around links to them, one linking page at a time.\n\n\
Run 'linkrefine candidates <DIR>' to see what would be proposed."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "LINKREFINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Content size unit argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MeasureArg {
    /// Lines of content, trailing whitespace ignored.
    Lines,
    /// Characters of content, surrounding whitespace ignored.
    Chars,
}

impl From<MeasureArg> for ContentMeasure {
    fn from(arg: MeasureArg) -> Self {
        match arg {
            MeasureArg::Lines => ContentMeasure::Lines,
            MeasureArg::Chars => ContentMeasure::Chars,
        }
    }
}

/// Link matching policy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LinkPolicyArg {
    /// `[[A/B]]` links to both `A/B` and `A`.
    Hierarchical,
    /// `[[A/B]]` links only to `A/B`.
    Exact,
    /// `[[A/B]]` links only to `B`.
    Leaf,
}

impl From<LinkPolicyArg> for LinkPolicy {
    fn from(arg: LinkPolicyArg) -> Self {
        match arg {
            LinkPolicyArg::Hierarchical => LinkPolicy::Hierarchical,
            LinkPolicyArg::Exact => LinkPolicy::Exact,
            LinkPolicyArg::Leaf => LinkPolicy::Leaf,
        }
    }
}

/// Shell for completions.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

/// Corpus and candidate selection flags shared by `refine` and `candidates`.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Directories to scan (default: current directory).
    pub paths: Vec<PathBuf>,

    /// Treat each path as a Logseq graph and scan its pages/ and journals/.
    #[arg(long)]
    pub logseq: bool,

    /// Candidates need strictly more backlinks than this.
    #[arg(short = 'b', long)]
    pub min_backlinks: Option<usize>,

    /// Candidates hold at most this much content.
    #[arg(short = 's', long)]
    pub max_content_size: Option<usize>,

    /// Unit of --max-content-size.
    #[arg(short, long)]
    pub measure: Option<MeasureArg>,

    /// How link targets match pages.
    #[arg(short = 'p', long)]
    pub link_policy: Option<LinkPolicyArg>,
}

impl SelectionArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply_to(&self, config: &mut RefineConfig) {
        if let Some(n) = self.min_backlinks {
            config.selection.min_backlinks = n;
        }
        if let Some(n) = self.max_content_size {
            config.selection.max_content_size = n;
        }
        if let Some(measure) = self.measure {
            config.selection.measure = measure.into();
        }
        if let Some(policy) = self.link_policy {
            config.link_policy = policy.into();
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review and apply link refinements interactively.
    ///
    /// For each candidate, every linking page is shown as a diff and you
    /// decide whether to write it back.
    Refine {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Show every proposed change without asking or writing.
        #[arg(long)]
        dry_run: bool,

        /// Unchanged lines shown around each change (default from config).
        #[arg(long)]
        context: Option<usize>,
    },

    /// List refinement candidates without changing anything.
    Candidates {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Manage the skip-list of pages never proposed.
    Skip {
        #[command(subcommand)]
        action: SkipCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: CompletionShell,
    },
}

/// `skip` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SkipCommand {
    /// Never propose this page.
    Page {
        /// Page identity, e.g. `Project/Sub`.
        name: String,
    },
    /// Never propose this page or anything below it.
    Hierarchy {
        /// Hierarchy prefix, e.g. `Archive`.
        prefix: String,
    },
    /// Remove a page or hierarchy from the skip-list.
    Remove {
        /// Entry to remove.
        name: String,
    },
    /// Show the skip-list.
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_refine_flags() {
        let cli = Cli::parse_from([
            "linkrefine",
            "refine",
            "notes",
            "more",
            "--logseq",
            "--min-backlinks",
            "2",
            "--measure",
            "chars",
            "--link-policy",
            "leaf",
            "--dry-run",
        ]);
        let Commands::Refine {
            selection, dry_run, ..
        } = cli.command
        else {
            panic!("expected refine");
        };
        assert!(dry_run);
        assert!(selection.logseq);
        assert_eq!(selection.paths, vec![PathBuf::from("notes"), PathBuf::from("more")]);

        let mut config = RefineConfig::default();
        selection.apply_to(&mut config);
        assert_eq!(config.selection.min_backlinks, 2);
        assert_eq!(config.selection.max_content_size, 3);
        assert_eq!(config.selection.measure, ContentMeasure::Chars);
        assert_eq!(config.link_policy, LinkPolicy::Leaf);
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let mut config = RefineConfig::default();
        config.selection.min_backlinks = 9;
        SelectionArgs::default().apply_to(&mut config);
        assert_eq!(config.selection.min_backlinks, 9);
    }

    #[test]
    fn test_parse_skip_hierarchy() {
        let cli = Cli::parse_from(["linkrefine", "--format", "json", "skip", "hierarchy", "Archive"]);
        assert!(matches!(cli.format, OutputFormatArg::Json));
        assert!(matches!(
            cli.command,
            Commands::Skip { action: SkipCommand::Hierarchy { ref prefix } } if prefix == "Archive"
        ));
    }
}
