//! Block visibility by filter tags
//!
//! Each block carries a set of tags. With no active tags every block is
//! visible. Otherwise OR shows blocks carrying any active tag and AND shows
//! blocks carrying all of them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Tags double as CSS class names on the page
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_-]*$").expect("Invalid TAG_RE regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("'{0}' is not a valid tag (letters, digits, '-' and '_', not starting with a digit)")]
    Invalid(String),
}

/// Check that a tag can be used as a class selector
pub fn validate_tag(tag: &str) -> Result<(), TagError> {
    if TAG_RE.is_match(tag) {
        Ok(())
    } else {
        Err(TagError::Invalid(tag.to_string()))
    }
}

/// A content block and its tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Block {
    #[allow(dead_code)]
    pub fn new<I, S>(id: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// How active tags combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// Union of the per-tag block sets
    #[default]
    Or,
    /// Intersection of the per-tag block sets
    And,
}

impl CombineMode {
    pub fn toggled(self) -> Self {
        match self {
            CombineMode::Or => CombineMode::And,
            CombineMode::And => CombineMode::Or,
        }
    }
}

impl std::str::FromStr for CombineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "or" | "any" => Ok(CombineMode::Or),
            "and" | "all" => Ok(CombineMode::And),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}

impl std::fmt::Display for CombineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombineMode::Or => write!(f, "or"),
            CombineMode::And => write!(f, "and"),
        }
    }
}

/// Whether one block is visible for the active tags
pub fn is_visible(block: &Block, active: &BTreeSet<String>, mode: CombineMode) -> bool {
    if active.is_empty() {
        return true;
    }
    match mode {
        CombineMode::Or => active.iter().any(|tag| block.has_tag(tag)),
        CombineMode::And => active.iter().all(|tag| block.has_tag(tag)),
    }
}

/// Visible blocks, in input order
pub fn visible_blocks<'b>(
    blocks: &'b [Block],
    active: &BTreeSet<String>,
    mode: CombineMode,
) -> Vec<&'b Block> {
    blocks
        .iter()
        .filter(|block| is_visible(block, active, mode))
        .collect()
}

/// State of the filter controls: which tag buttons are active and which way
/// they combine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub active: BTreeSet<String>,
    pub mode: CombineMode,
}

impl FilterState {
    pub fn new(mode: CombineMode) -> Self {
        Self {
            active: BTreeSet::new(),
            mode,
        }
    }

    /// Flip a tag button; returns whether the tag is now active
    pub fn toggle_tag(&mut self, tag: &str) -> Result<bool, TagError> {
        validate_tag(tag)?;
        if self.active.remove(tag) {
            Ok(false)
        } else {
            self.active.insert(tag.to_string());
            Ok(true)
        }
    }

    /// Flip the match-mode control
    #[allow(dead_code)]
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn visible<'b>(&self, blocks: &'b [Block]) -> Vec<&'b Block> {
        visible_blocks(blocks, &self.active, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Vec<Block> {
        vec![
            Block::new("inn", ["town", "npc"]),
            Block::new("cave", ["dungeon"]),
            Block::new("mayor", ["town", "npc", "quest"]),
            Block::new("blank", Vec::<String>::new()),
        ]
    }

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn ids(visible: Vec<&Block>) -> Vec<&str> {
        visible.into_iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_no_active_tags_shows_everything() {
        let blocks = blocks();
        assert_eq!(visible_blocks(&blocks, &tags(&[]), CombineMode::Or).len(), 4);
        assert_eq!(visible_blocks(&blocks, &tags(&[]), CombineMode::And).len(), 4);
    }

    #[test]
    fn test_single_tag() {
        let blocks = blocks();
        assert_eq!(
            ids(visible_blocks(&blocks, &tags(&["town"]), CombineMode::Or)),
            vec!["inn", "mayor"]
        );
    }

    #[test]
    fn test_or_is_union() {
        let blocks = blocks();
        assert_eq!(
            ids(visible_blocks(&blocks, &tags(&["dungeon", "quest"]), CombineMode::Or)),
            vec!["cave", "mayor"]
        );
    }

    #[test]
    fn test_and_is_intersection() {
        let blocks = blocks();
        assert_eq!(
            ids(visible_blocks(&blocks, &tags(&["town", "quest"]), CombineMode::And)),
            vec!["mayor"]
        );
        assert!(visible_blocks(&blocks, &tags(&["town", "dungeon"]), CombineMode::And).is_empty());
    }

    #[test]
    fn test_unknown_tag() {
        let blocks = blocks();
        assert!(visible_blocks(&blocks, &tags(&["dragon"]), CombineMode::Or).is_empty());
    }

    #[test]
    fn test_combine_mode_parse_and_toggle() {
        assert_eq!("AND".parse::<CombineMode>().unwrap(), CombineMode::And);
        assert_eq!("any".parse::<CombineMode>().unwrap(), CombineMode::Or);
        assert!("xor".parse::<CombineMode>().is_err());
        assert_eq!(CombineMode::Or.toggled(), CombineMode::And);
        assert_eq!(CombineMode::And.to_string(), "and");
    }

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag("town").is_ok());
        assert!(validate_tag("npc-2").is_ok());
        assert!(validate_tag("_x").is_ok());
        assert_eq!(
            validate_tag("2nd"),
            Err(TagError::Invalid("2nd".to_string()))
        );
        assert!(validate_tag("a b").is_err());
        assert!(validate_tag("").is_err());
    }

    #[test]
    fn test_filter_state() {
        let blocks = blocks();
        let mut state = FilterState::default();
        assert_eq!(state.visible(&blocks).len(), 4);

        assert!(state.toggle_tag("town").unwrap());
        assert!(state.toggle_tag("dungeon").unwrap());
        assert_eq!(ids(state.visible(&blocks)), vec!["inn", "cave", "mayor"]);

        state.toggle_mode();
        assert_eq!(state.mode, CombineMode::And);
        assert!(state.visible(&blocks).is_empty());

        assert!(!state.toggle_tag("dungeon").unwrap());
        assert_eq!(ids(state.visible(&blocks)), vec!["inn", "mayor"]);

        assert!(state.toggle_tag("bad tag").is_err());
    }

    #[test]
    fn test_block_deserialize_without_tags() {
        let block: Block = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(block.tags.is_empty());
    }
}
