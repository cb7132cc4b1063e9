//! Filter command - visible blocks for a set of active tags

use anyhow::{Context, Result};
use serde_json::json;
use std::io::Read;
use std::path::Path;

use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::filter::blocks::{validate_tag, Block, CombineMode, FilterState};

/// Parse blocks from a JSON array
pub fn parse_blocks(raw: &str) -> Result<Vec<Block>> {
    let blocks: Vec<Block> = serde_json::from_str(raw).context("blocks must be a JSON array")?;
    for block in &blocks {
        for tag in &block.tags {
            validate_tag(tag).with_context(|| format!("block '{}'", block.id))?;
        }
    }
    Ok(blocks)
}

/// Read blocks from a file, or stdin for `-`
pub fn load_blocks(root: &Path, source: &Path) -> Result<Vec<Block>> {
    let raw = if source == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read blocks from stdin")?;
        raw
    } else {
        let path = if source.is_absolute() {
            source.to_path_buf()
        } else {
            root.join(source)
        };
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read blocks from {}", path.display()))?
    };
    parse_blocks(&raw)
}

/// Build the filter state from command-line tags
pub fn filter_state(tags: &[String], mode: CombineMode) -> Result<FilterState> {
    let mut state = FilterState::new(mode);
    for tag in tags {
        if !state.active.contains(tag) {
            state.toggle_tag(tag)?;
        }
    }
    Ok(state)
}

/// Visible blocks as result items
pub fn filter_blocks(blocks: &[Block], state: &FilterState) -> ResultSet {
    state
        .visible(blocks)
        .into_iter()
        .map(|block| {
            ResultItem::block(block.id.clone()).with_data(json!({
                "tags": block.tags,
            }))
        })
        .collect()
}

/// Run the filter command
pub fn run_filter(
    root: &Path,
    source: &Path,
    tags: &[String],
    mode: CombineMode,
    render_config: RenderConfig,
) -> Result<()> {
    let blocks = load_blocks(root, source)?;
    let state = filter_state(tags, mode)?;
    let result_set = filter_blocks(&blocks, &state);

    crate::log!(
        "filter";
        "{} of {} blocks visible ({} {:?})",
        result_set.len(),
        blocks.len(),
        state.mode,
        state.active
    );

    Renderer::with_config(render_config).print(&result_set);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Kind;

    const BLOCKS: &str = r#"[
        {"id": "inn", "tags": ["town", "npc"]},
        {"id": "cave", "tags": ["dungeon"]},
        {"id": "mayor", "tags": ["town", "quest"]}
    ]"#;

    #[test]
    fn test_filter_blocks_or() {
        let blocks = parse_blocks(BLOCKS).unwrap();
        let state = filter_state(&["npc".to_string(), "dungeon".to_string()], CombineMode::Or)
            .unwrap();
        let set = filter_blocks(&blocks, &state);
        let ids: Vec<_> = set.items.iter().map(|i| i.excerpt.clone().unwrap()).collect();
        assert_eq!(ids, vec!["inn", "cave"]);
        assert_eq!(set.items[0].kind, Kind::Block);
        assert_eq!(set.items[0].data.as_ref().unwrap()["tags"][0], "npc");
    }

    #[test]
    fn test_filter_blocks_and() {
        let blocks = parse_blocks(BLOCKS).unwrap();
        let state =
            filter_state(&["town".to_string(), "quest".to_string()], CombineMode::And).unwrap();
        let set = filter_blocks(&blocks, &state);
        assert_eq!(set.len(), 1);
        assert_eq!(set.items[0].excerpt.as_deref(), Some("mayor"));
    }

    #[test]
    fn test_no_tags_shows_all() {
        let blocks = parse_blocks(BLOCKS).unwrap();
        let state = filter_state(&[], CombineMode::And).unwrap();
        assert_eq!(filter_blocks(&blocks, &state).len(), 3);
    }

    #[test]
    fn test_invalid_tag_rejected() {
        assert!(filter_state(&["not a tag".to_string()], CombineMode::Or).is_err());
        let err = parse_blocks(r#"[{"id": "x", "tags": ["9lives"]}]"#).unwrap_err();
        assert!(format!("{:#}", err).contains("block 'x'"));
    }

    #[test]
    fn test_blocks_must_be_array() {
        assert!(parse_blocks(r#"{"id": "x"}"#).is_err());
    }
}
