use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, ValueEnum};
use dirsift::Emphasis;

/// Output format for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One human-readable line per match.
    Plain,
    /// One JSON object per event.
    Json,
}

/// How the matched part of a name is emphasised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum EmphasisStyle {
    Html,
    Ansi,
    None,
}

impl From<EmphasisStyle> for Emphasis {
    fn from(style: EmphasisStyle) -> Self {
        match style {
            EmphasisStyle::Html => Emphasis::html(),
            EmphasisStyle::Ansi => Emphasis::ansi(),
            EmphasisStyle::None => Emphasis::none(),
        }
    }
}

/// Command-line arguments accepted by the `dirsift` binary.
#[derive(Parser, Debug)]
#[command(
    name = "dirsift",
    version,
    about = "Find files and directories whose name contains a term"
)]
pub(crate) struct CliArgs {
    /// Directory to search.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Part of the file name to look for (case-insensitive).
    #[arg(value_name = "TERM")]
    pub term: String,

    /// Worker threads. 1 keeps results in sorted depth-first order.
    #[arg(short = 'j', long, env = "DIRSIFT_THREADS", default_value_t = 1)]
    pub threads: usize,

    /// Do not descend more than N levels below ROOT.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Markers around the matched part of each name.
    #[arg(long, value_enum, env = "DIRSIFT_EMPHASIS", default_value_t = EmphasisStyle::Html)]
    pub emphasis: EmphasisStyle,

    /// Report matching symbolic links separately instead of skipping them.
    #[arg(long)]
    pub symlinks: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Show a live match counter on stderr.
    #[arg(long)]
    pub progress: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Reject inputs before the search starts.
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.root.is_dir() {
            bail!("enter a valid directory: {}", self.root.display());
        }
        if self.term.is_empty() {
            bail!("enter something to search for");
        }
        if self.threads == 0 {
            bail!("--threads must be at least 1");
        }
        Ok(())
    }

    /// Default log filter for the chosen verbosity.
    pub(crate) fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
