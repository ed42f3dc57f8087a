//! ytextract CLI: YouTube text extraction over already-fetched documents.
//!
//! Resolves channel ids from channel pages, decodes caption files, and
//! parses channel feeds. Every command prints JSON on stdout.

mod commands;
mod source;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
