//! Link kinds and the marker table
//!
//! Each marker character is bound to exactly one link kind. A link kind knows
//! where its links point and how the anchor is rendered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder in a URL template that receives the entity name
pub const NAME_SLOT: &str = "{name}";

/// Base URL for campaign things
pub const DEFAULT_THING_URL: &str = "/campaign/thing/";

/// Base URL for D&D Beyond monsters
pub const DEFAULT_BEYOND_URL: &str = "https://www.dndbeyond.com/monsters/";

/// Base URL for D&D Beyond magic items
pub const DEFAULT_ITEM_URL: &str = "https://www.dndbeyond.com/magic-items/";

/// Base URL for D&D Beyond spells
pub const DEFAULT_SPELL_URL: &str = "https://www.dndbeyond.com/spells/";

/// Characters produced by the structural rewrite or used by list tokens.
/// Binding one of them would let inserted markup open a capture.
pub const RESERVED_MARKERS: &[char] = &['<', '>', '/', '[', ']'];

/// Errors raised while building a marker table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkerError {
    #[error("marker '{marker}' is bound to both '{first}' and '{second}'")]
    DuplicateMarker {
        marker: char,
        first: String,
        second: String,
    },

    #[error("marker '{marker:?}' for '{kind}' is whitespace, alphanumeric or reserved for note markup")]
    InvalidMarker { marker: char, kind: String },

    #[error("link kind '{0}' has an empty url")]
    EmptyUrl(String),
}

/// How one family of entity links is rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkKind {
    /// Short name (thing, monster, item, spell, ...)
    pub name: String,

    /// Base URL, or a template containing `{name}`
    pub url: String,

    /// Replace spaces with hyphens before building the URL
    #[serde(default)]
    pub slug: bool,

    /// CSS class placed on the anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Open the link in a new browsing context
    #[serde(default)]
    pub external: bool,
}

impl LinkKind {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            slug: false,
            class: None,
            external: false,
        }
    }

    pub fn slugged(mut self) -> Self {
        self.slug = true;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    /// Build the link target for an entity name
    pub fn href(&self, name: &str) -> String {
        let target = if self.slug {
            slugify(name)
        } else {
            name.to_string()
        };

        if self.url.contains(NAME_SLOT) {
            self.url.replace(NAME_SLOT, &target)
        } else {
            format!("{}{}", self.url, target)
        }
    }

    /// Render the anchor element for an entity name
    pub fn anchor(&self, name: &str) -> String {
        let mut out = String::from("<a");
        if let Some(class) = &self.class {
            out.push_str(&format!(" class=\"{}\"", class));
        }
        out.push_str(&format!(" href=\"{}\"", self.href(name)));
        if self.external {
            out.push_str(" target=\"_blank\"");
        }
        out.push('>');
        out.push_str(name);
        out.push_str("</a>");
        out
    }
}

/// Replace every space with a hyphen
pub fn slugify(name: &str) -> String {
    name.replace(' ', "-")
}

/// A marker character and the link kind it selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerBinding {
    pub marker: char,
    #[serde(flatten)]
    pub kind: LinkKind,
}

/// Ordered marker -> link kind table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerTable {
    bindings: Vec<MarkerBinding>,
}

impl MarkerTable {
    /// Build a table, rejecting duplicate or unusable markers
    pub fn new(bindings: Vec<MarkerBinding>) -> Result<Self, MarkerError> {
        let mut table = Self::default();
        for binding in bindings {
            table.insert(binding)?;
        }
        Ok(table)
    }

    /// Add one binding to the end of the table
    pub fn insert(&mut self, binding: MarkerBinding) -> Result<(), MarkerError> {
        if binding.marker.is_whitespace()
            || binding.marker.is_alphanumeric()
            || RESERVED_MARKERS.contains(&binding.marker)
        {
            return Err(MarkerError::InvalidMarker {
                marker: binding.marker,
                kind: binding.kind.name,
            });
        }
        if binding.kind.url.is_empty() {
            return Err(MarkerError::EmptyUrl(binding.kind.name));
        }
        if let Some(existing) = self.get(binding.marker) {
            return Err(MarkerError::DuplicateMarker {
                marker: binding.marker,
                first: existing.name.clone(),
                second: binding.kind.name,
            });
        }
        self.bindings.push(binding);
        Ok(())
    }

    /// Look up the link kind bound to a character
    pub fn get(&self, marker: char) -> Option<&LinkKind> {
        self.bindings
            .iter()
            .find(|b| b.marker == marker)
            .map(|b| &b.kind)
    }

    /// Look up a binding by link kind name
    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut MarkerBinding> {
        self.bindings.iter_mut().find(|b| b.kind.name == name)
    }

    pub fn is_marker(&self, c: char) -> bool {
        self.get(c).is_some()
    }

    pub fn bindings(&self) -> &[MarkerBinding] {
        &self.bindings
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The campaign default: things, monsters, items and spells
    pub fn campaign() -> Self {
        Self {
            bindings: vec![
                MarkerBinding {
                    marker: '*',
                    kind: LinkKind::new("thing", DEFAULT_THING_URL).with_class("thing"),
                },
                MarkerBinding {
                    marker: '@',
                    kind: LinkKind::new("monster", DEFAULT_BEYOND_URL)
                        .slugged()
                        .with_class("monster")
                        .external(),
                },
                MarkerBinding {
                    marker: '$',
                    kind: LinkKind::new("item", DEFAULT_ITEM_URL)
                        .slugged()
                        .with_class("item")
                        .external(),
                },
                MarkerBinding {
                    marker: '^',
                    kind: LinkKind::new("spell", DEFAULT_SPELL_URL)
                        .slugged()
                        .with_class("spell")
                        .external(),
                },
            ],
        }
    }
}
