//! notelink - link campaign notes and filter tagged blocks
//!
//! notelink provides:
//! - Marker-based inline linking (`*Bob*`, `@Owlbear@`, `$Bag of Holding$`, `^Fireball^`)
//! - Paragraph and list rewriting for plain-text notes
//! - Marker linting for authoring mistakes
//! - Tag-based block visibility (OR / AND)
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod core;
mod filter;
mod markup;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
