//! Note commands - render, lint, kinds

use anyhow::Result;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::config::LinkerConfig;
use crate::core::file_reader::{read_note, read_note_from, NoteRead};
use crate::core::model::{Meta, ResultItem, ResultSet};
use crate::core::paths::{collect_note_paths, display_relative};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::hash_bytes;
use crate::markup::kinds::MarkerTable;
use crate::markup::linker::Linker;
use crate::markup::lint::lint_text;

/// Path reported for notes read from stdin
pub const STDIN_PATH: &str = "-";

/// A note and where it came from
struct NoteSource {
    path: String,
    read: NoteRead,
}

/// Read every input; no inputs means stdin
fn load_sources(root: &Path, inputs: &[PathBuf], max_bytes: usize) -> Vec<NoteSource> {
    if inputs.is_empty() {
        return vec![NoteSource {
            path: STDIN_PATH.to_string(),
            read: read_note_from(std::io::stdin().lock(), max_bytes),
        }];
    }

    collect_note_paths(root, inputs)
        .into_iter()
        .map(|path| NoteSource {
            path: display_relative(&path, root),
            read: read_note(&path, max_bytes),
        })
        .collect()
}

/// Error items for a note that could not be read
fn skipped_items(source: &NoteSource) -> Vec<ResultItem> {
    source
        .read
        .warnings
        .iter()
        .map(|w| ResultItem::error(w.to_note_error()).with_path(source.path.clone()))
        .collect()
}

/// Render notes into one result per note
pub fn render_notes(
    root: &Path,
    inputs: &[PathBuf],
    config: &LinkerConfig,
    max_bytes: usize,
) -> ResultSet {
    let linker = Linker::new(&config.table).with_structure(config.structure);
    let mut result_set = ResultSet::new();

    for source in load_sources(root, inputs, max_bytes) {
        let Some(text) = source.read.content.as_deref() else {
            crate::warning!("render"; "skipping {}", source.path);
            result_set.extend(skipped_items(&source));
            continue;
        };

        let rendered = linker.render(text);
        crate::log!(
            "render";
            "{}: {} bytes -> {} bytes, {} links",
            source.path,
            text.len(),
            rendered.html.len(),
            rendered.links
        );
        if source.read.lossy {
            crate::log!("render"; "{} is not valid UTF-8, decoded lossily", source.path);
        }
        if rendered.unterminated {
            crate::warning!("render"; "{} has an unterminated marker", source.path);
        }

        let meta = Meta {
            size: Some(text.len() as u64),
            hash: Some(hash_bytes(text.as_bytes())),
            truncated: source.read.truncated,
        };
        let mut item = ResultItem::render(source.path.clone(), rendered.html.clone())
            .with_meta(meta);
        item.data = serde_json::to_value(&rendered).ok();
        item.errors = source
            .read
            .warnings
            .iter()
            .map(|w| w.to_note_error())
            .collect();

        result_set.push(item);
    }

    result_set
}

/// Lint notes, one error item per issue
pub fn lint_notes(
    root: &Path,
    inputs: &[PathBuf],
    config: &LinkerConfig,
    max_bytes: usize,
) -> ResultSet {
    let mut result_set = ResultSet::new();

    for source in load_sources(root, inputs, max_bytes) {
        let Some(text) = source.read.content.as_deref() else {
            result_set.extend(skipped_items(&source));
            continue;
        };

        let issues = lint_text(text, &config.table, &source.path, config.structure);
        crate::log!("lint"; "{}: {} issues", source.path, issues.len());
        result_set.extend(issues.iter().map(|issue| issue.to_result_item()));
    }

    result_set.sort();
    result_set
}

/// Describe the marker table
pub fn kinds_result(table: &MarkerTable) -> ResultSet {
    table
        .bindings()
        .iter()
        .map(|binding| {
            let kind = &binding.kind;
            ResultItem::link(kind.name.clone()).with_data(json!({
                "marker": binding.marker.to_string(),
                "url": kind.url,
                "slug": kind.slug,
                "class": kind.class,
                "external": kind.external,
            }))
        })
        .collect()
}

/// Run the render command
pub fn run_render(
    root: &Path,
    inputs: &[PathBuf],
    config: &LinkerConfig,
    max_bytes: usize,
    render_config: RenderConfig,
) -> Result<()> {
    let result_set = render_notes(root, inputs, config, max_bytes);
    Renderer::with_config(render_config).print(&result_set);
    Ok(())
}

/// Run the lint command
pub fn run_lint(
    root: &Path,
    inputs: &[PathBuf],
    config: &LinkerConfig,
    max_bytes: usize,
    render_config: RenderConfig,
) -> Result<()> {
    let result_set = lint_notes(root, inputs, config, max_bytes);
    if result_set.has_errors() {
        crate::log!("lint"; "{} issues", result_set.len());
    } else {
        crate::log!("lint"; "no issues");
    }
    Renderer::with_config(render_config).print(&result_set);
    Ok(())
}

/// Run the kinds command
pub fn run_kinds(config: &LinkerConfig, render_config: RenderConfig) -> Result<()> {
    if let Some(source) = &config.source {
        crate::log!("kinds"; "config from {}", source.display());
    }
    Renderer::with_config(render_config).print(&kinds_result(&config.table));
    Ok(())
}
