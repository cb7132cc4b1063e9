//! Inline markup linker
//!
//! A single left-to-right pass that turns `*Name*` style spans into anchors.
//! Any marker toggles the scan state: the first marker opens a capture, the
//! next marker (of any kind) closes it. The link kind of the opening marker
//! decides how the anchor is built.

use serde::Serialize;

use crate::markup::kinds::{LinkKind, MarkerTable};
use crate::markup::structure;

/// Stands in for an anchor whose closing marker has not been seen yet.
/// An unterminated capture leaves it in the output.
pub const PLACEHOLDER: &str = "*REPLACE_ME*";

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState<'t> {
    /// Copying literal text
    Normal,
    /// Collecting a name; `start` is where the placeholder begins in the output
    Capturing { kind: &'t LinkKind, start: usize },
}

/// Rendered markup plus what the scan saw
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rendered {
    #[serde(skip)]
    pub html: String,

    /// Number of anchors produced
    pub links: usize,

    /// Anchors whose name was empty
    pub empty_names: usize,

    /// A capture was still open at the end of the text
    pub unterminated: bool,
}

/// Renders note text against a marker table
#[derive(Debug, Clone, Copy)]
pub struct Linker<'a> {
    table: &'a MarkerTable,
    structure: bool,
}

impl<'a> Linker<'a> {
    pub fn new(table: &'a MarkerTable) -> Self {
        Self {
            table,
            structure: true,
        }
    }

    /// Enable or disable the paragraph/list rewrite
    pub fn with_structure(mut self, structure: bool) -> Self {
        self.structure = structure;
        self
    }

    /// Structural rewrite (when enabled) followed by the link scan
    pub fn render(&self, text: &str) -> Rendered {
        if self.structure {
            self.scan(&structure::rewrite(text))
        } else {
            self.scan(text)
        }
    }

    /// Link scan only
    pub fn scan(&self, text: &str) -> Rendered {
        let mut rendered = Rendered {
            html: String::with_capacity(text.len()),
            ..Default::default()
        };
        let mut name = String::new();
        let mut state = ScanState::Normal;

        for c in text.chars() {
            match (self.table.get(c), state) {
                (Some(kind), ScanState::Normal) => {
                    state = ScanState::Capturing {
                        kind,
                        start: rendered.html.len(),
                    };
                    name.clear();
                    rendered.html.push_str(PLACEHOLDER);
                }
                (Some(_), ScanState::Capturing { kind, start }) => {
                    // Nothing is written while capturing, so the placeholder
                    // is always the tail of the output.
                    rendered.html.truncate(start);
                    rendered.html.push_str(&kind.anchor(&name));
                    rendered.links += 1;
                    if name.is_empty() {
                        rendered.empty_names += 1;
                    }
                    name.clear();
                    state = ScanState::Normal;
                }
                (None, ScanState::Capturing { .. }) => name.push(c),
                (None, ScanState::Normal) => rendered.html.push(c),
            }
        }

        rendered.unterminated = matches!(state, ScanState::Capturing { .. });
        rendered
    }
}

/// Render note text with paragraph/list rewrites and links
#[allow(dead_code)]
pub fn render(text: &str, table: &MarkerTable) -> String {
    Linker::new(table).render(text).html
}

/// Replace marker spans with anchors, leaving everything else untouched
#[allow(dead_code)]
pub fn link(text: &str, table: &MarkerTable) -> String {
    Linker::new(table).scan(text).html
}
