mod cli;
mod output;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use dirsift::CancelToken;
use tracing_subscriber::EnvFilter;

use cli::CliArgs;
use output::Printer;

fn main() -> Result<()> {
    let cli = CliArgs::parse();
    init_logging(cli.log_level());

    cli.validate()?;

    let cancel = CancelToken::new();
    let printer = Printer::new(cli.format, cli.progress, cancel.clone());

    let mut search = dirsift::builder()
        .root(&cli.root)
        .term(&cli.term)
        .threads(cli.threads)
        .emphasis(cli.emphasis.into())
        .report_symlinks(cli.symlinks)
        .cancel_token(cancel);
    if let Some(depth) = cli.max_depth {
        search = search.max_depth(depth);
    }

    let results = search
        .run(&printer)
        .with_context(|| format!("cannot search {}", cli.root.display()))?;

    match printer.finish(&results) {
        // The reader went away (e.g. `| head`); that is not a failure.
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("cannot write results"),
    }
}

/// Log to stderr. `DIRSIFT_LOG` takes precedence over `-v`.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env("DIRSIFT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
