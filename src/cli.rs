//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{LinkerConfig, UrlOverrides};
use crate::core::file_reader::DEFAULT_MAX_NOTE_SIZE;
use crate::core::log::{self, Verbosity};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::filter::blocks::CombineMode;

/// notelink - turn marker-delimited campaign notes into linked markup.
#[derive(Parser, Debug)]
#[command(name = "notelink")]
#[command(
    author,
    version,
    about,
    long_about = r#"notelink renders campaign notes: names wrapped in marker characters
become links, blank lines become paragraphs and [list] blocks become lists.

Default markers:
    *Name*   campaign thing   (/campaign/thing/Name)
    @Name@   monster          (D&D Beyond, opens in a new tab)
    $Name$   magic item       (D&D Beyond, opens in a new tab)
    ^Name^   spell            (D&D Beyond, opens in a new tab)

Each command prints a ResultSet in the selected format (default: jsonl).

Examples:
    notelink render notes/
    echo 'Meet *Bob*' | notelink --format raw render
    notelink lint notes/
    notelink filter --blocks blocks.json --tag town --tag npc --mode and
    notelink kinds
"#
)]
pub struct Cli {
    /// Root directory that relative paths are resolved against.
    #[arg(long, global = true, default_value = ".", value_name = "ROOT")]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw (rendered markup / excerpts only; alias: html)"
    )]
    pub format: String,

    /// Config file (JSON). Defaults to ROOT/notelink.json when present.
    #[arg(long, global = true, value_name = "FILE", env = "NOTELINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored diagnostics.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no warnings on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (per-note diagnostics on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(flatten)]
    pub urls: UrlArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Base URL overrides for the built-in link kinds
#[derive(clap::Args, Debug, Default)]
pub struct UrlArgs {
    /// Base URL for *thing* links.
    #[arg(long, global = true, value_name = "URL", env = "NOTELINK_THING_URL")]
    pub thing_url: Option<String>,

    /// Base URL for @monster@ links.
    #[arg(long, global = true, value_name = "URL", env = "NOTELINK_BEYOND_URL")]
    pub beyond_url: Option<String>,

    /// Base URL for $item$ links.
    #[arg(long, global = true, value_name = "URL", env = "NOTELINK_ITEM_URL")]
    pub item_url: Option<String>,

    /// Base URL for ^spell^ links.
    #[arg(long, global = true, value_name = "URL", env = "NOTELINK_SPELL_URL")]
    pub spell_url: Option<String>,
}

impl From<UrlArgs> for UrlOverrides {
    fn from(args: UrlArgs) -> Self {
        Self {
            thing_url: args.thing_url,
            beyond_url: args.beyond_url,
            item_url: args.item_url,
            spell_url: args.spell_url,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render notes into linked markup.
    #[command(
        long_about = "Render each note: paragraph/list rewrite, then marker links.\n\n\
PATHs may be files or directories (walked for .txt, .md and .note files).\n\
With no PATH the note is read from stdin.\n\n\
An unterminated marker swallows the rest of the note and leaves the\n\
placeholder *REPLACE_ME* in the output; run `notelink lint` to find them.\n\n\
Examples:\n\
  notelink render notes/\n\
  notelink --format raw render notes/inn.txt\n"
    )]
    Render {
        /// Note files or directories.
        #[arg(value_name = "PATH", num_args = 0..)]
        paths: Vec<PathBuf>,

        /// Skip the paragraph/list rewrite.
        #[arg(long)]
        no_structure: bool,

        /// Maximum bytes read per note.
        #[arg(long, default_value_t = DEFAULT_MAX_NOTE_SIZE, value_name = "BYTES")]
        max_bytes: usize,
    },

    /// Report marker misuse in notes.
    #[command(
        long_about = "Check notes for unterminated markers, empty names, captures closed by a\n\
different marker and names spanning a line break.\n\n\
Issues are emitted as error result items.\n\n\
Example:\n\
  notelink lint notes/\n"
    )]
    Lint {
        /// Note files or directories.
        #[arg(value_name = "PATH", num_args = 0..)]
        paths: Vec<PathBuf>,

        /// Treat list tokens as plain text.
        #[arg(long)]
        no_structure: bool,

        /// Maximum bytes read per note.
        #[arg(long, default_value_t = DEFAULT_MAX_NOTE_SIZE, value_name = "BYTES")]
        max_bytes: usize,
    },

    /// Show which blocks are visible for a set of active tags.
    #[command(
        long_about = "Read blocks as a JSON array of {\"id\": ..., \"tags\": [...]} and emit\n\
the visible ones.\n\n\
With no --tag every block is visible. Mode `or` shows blocks carrying any\n\
active tag, `and` shows blocks carrying all of them.\n\n\
Examples:\n\
  notelink filter --blocks blocks.json --tag town\n\
  cat blocks.json | notelink filter --blocks - --tag town --tag npc --mode and\n"
    )]
    Filter {
        /// Blocks JSON file, or `-` for stdin.
        #[arg(long, value_name = "FILE")]
        blocks: PathBuf,

        /// Active tag (repeatable).
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// How active tags combine (or/and).
        #[arg(long, default_value = "or", value_name = "MODE")]
        mode: CombineMode,
    },

    /// List the effective marker table.
    Kinds,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    log::init(Verbosity::from_flags(cli.quiet, cli.verbose), !cli.no_color);

    let format: OutputFormat = cli
        .format
        .parse()
        .map_err(anyhow::Error::msg)
        .context("invalid --format")?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let overrides = UrlOverrides::from(cli.urls);
    let load_config = || {
        LinkerConfig::load(&root, cli.config.as_deref(), &overrides)
            .context("failed to load configuration")
    };

    match cli.command {
        Commands::Render {
            paths,
            no_structure,
            max_bytes,
        } => {
            let mut config = load_config()?;
            config.structure &= !no_structure;
            crate::markup::api::run_render(&root, &paths, &config, max_bytes, render_config)
        }

        Commands::Lint {
            paths,
            no_structure,
            max_bytes,
        } => {
            let mut config = load_config()?;
            config.structure &= !no_structure;
            crate::markup::api::run_lint(&root, &paths, &config, max_bytes, render_config)
        }

        Commands::Filter { blocks, tags, mode } => {
            crate::filter::api::run_filter(&root, &blocks, &tags, mode, render_config)
        }

        Commands::Kinds => crate::markup::api::run_kinds(&load_config()?, render_config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_filter() {
        let cli = Cli::try_parse_from([
            "notelink", "filter", "--blocks", "b.json", "--tag", "town", "--tag", "npc", "--mode",
            "and",
        ])
        .unwrap();
        match cli.command {
            Commands::Filter { blocks, tags, mode } => {
                assert_eq!(blocks, PathBuf::from("b.json"));
                assert_eq!(tags, vec!["town", "npc"]);
                assert_eq!(mode, CombineMode::And);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_render_defaults() {
        let cli = Cli::try_parse_from(["notelink", "render"]).unwrap();
        match cli.command {
            Commands::Render {
                paths,
                no_structure,
                max_bytes,
            } => {
                assert!(paths.is_empty());
                assert!(!no_structure);
                assert_eq!(max_bytes, DEFAULT_MAX_NOTE_SIZE);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_mode_is_rejected() {
        assert!(Cli::try_parse_from(["notelink", "filter", "--blocks", "-", "--mode", "xor"]).is_err());
    }
}
