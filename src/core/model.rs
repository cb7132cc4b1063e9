//! Unified Result Model
//!
//! Every command maps what it produced (rendered notes, visible blocks, lint
//! issues, link kinds) onto this model before rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Render,
    Block,
    Link,
    Error,
}

/// Confidence level of a result. Lint warnings are medium, everything
/// else is high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

/// Which part of the tool produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Linker,
    Lint,
    Filter,
    Config,
}

/// Line-based range (1-indexed, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

impl Range {
    pub fn lines(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Source size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// XXH3 hash of the source text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Whether the source was truncated before rendering
    #[serde(default)]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteError {
    pub code: String,
    pub message: String,
}

impl NoteError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Source path relative to root ('/' separated), `-` for stdin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,

    /// Rendered markup, block id, or message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (render stats, block tags, link kind)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    pub confidence: Confidence,

    pub source_mode: SourceMode,

    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<NoteError>,
}

impl ResultItem {
    fn base(kind: Kind, source_mode: SourceMode) -> Self {
        Self {
            kind,
            path: None,
            range: None,
            excerpt: None,
            data: None,
            confidence: Confidence::High,
            source_mode,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// A rendered note
    pub fn render(path: impl Into<String>, html: impl Into<String>) -> Self {
        let mut item = Self::base(Kind::Render, SourceMode::Linker);
        item.path = Some(path.into());
        item.excerpt = Some(html.into());
        item
    }

    /// A visible block
    pub fn block(id: impl Into<String>) -> Self {
        let mut item = Self::base(Kind::Block, SourceMode::Filter);
        item.excerpt = Some(id.into());
        item
    }

    /// A configured link kind
    pub fn link(name: impl Into<String>) -> Self {
        let mut item = Self::base(Kind::Link, SourceMode::Config);
        item.excerpt = Some(name.into());
        item
    }

    /// An error result
    pub fn error(error: NoteError) -> Self {
        let mut item = Self::base(Kind::Error, SourceMode::Linker);
        item.errors.push(error);
        item
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    /// Sort items by path and line for stable output. Items without a path
    /// keep their relative order after the ones with a path.
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb).then_with(|| {
                let sa = a.range.map(|r| r.start).unwrap_or(u32::MAX);
                let sb = b.range.map(|r| r.start).unwrap_or(u32::MAX);
                sa.cmp(&sb)
            }),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any item is an error
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.kind == Kind::Error)
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
