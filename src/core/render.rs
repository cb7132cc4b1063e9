//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    /// Excerpts only: the rendered markup itself
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" | "html" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render and print to stdout
    pub fn print(&self, result_set: &ResultSet) {
        let output = self.render(result_set);
        if !output.is_empty() {
            println!("{}", output);
        }
    }

    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut renders = Vec::new();
        let mut blocks = Vec::new();
        let mut links = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Render => renders.push(item),
                Kind::Block => blocks.push(item),
                Kind::Link => links.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}", error.code, error.message));
                    if let Some(path) = &item.path {
                        output.push_str(&format!(" (`{}`", path));
                        if let Some(range) = &item.range {
                            output.push_str(&format!(" line {}", range.start));
                        }
                        output.push(')');
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        if !renders.is_empty() {
            output.push_str("## Rendered\n\n");
            for item in renders {
                self.render_item_md(&mut output, item);
            }
        }

        if !blocks.is_empty() {
            output.push_str("## Visible Blocks\n\n");
            for item in blocks {
                output.push_str(&format!("- `{}`", item.excerpt.as_deref().unwrap_or("")));
                if let Some(tags) = item.data.as_ref().and_then(|d| d.get("tags")) {
                    output.push_str(&format!(" {}", tags));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        if !links.is_empty() {
            output.push_str("## Link Kinds\n\n");
            for item in links {
                let data = item.data.as_ref();
                let field = |key: &str| {
                    data.and_then(|d| d.get(key))
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string()
                };
                output.push_str(&format!(
                    "- `{}` **{}** -> {}\n",
                    field("marker"),
                    item.excerpt.as_deref().unwrap_or(""),
                    field("url")
                ));
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        if let Some(path) = &item.path {
            output.push_str(&format!("### `{}`\n", path));
        }

        if let Some(excerpt) = &item.excerpt {
            output.push_str("\n```html\n");
            output.push_str(excerpt);
            if !excerpt.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("```\n");
        }

        if item.meta.truncated {
            output.push_str("\n> ⚠️ Source was truncated\n");
        }

        output.push('\n');
    }

    /// Raw mode: excerpts only, one per line
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
