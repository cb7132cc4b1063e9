//! Marker linting
//!
//! Checks note text for marker misuse that silently degrades rendering:
//! - captures that never close (a placeholder is left in the output)
//! - empty names
//! - a capture opened by one marker and closed by another
//! - names running across a line break

use crate::core::model::{Confidence, Kind, NoteError, Range, ResultItem, SourceMode};
use crate::markup::kinds::MarkerTable;
use crate::markup::structure::list_token_len;

/// Lint issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    Error,
    Warning,
}

/// A lint issue
#[derive(Debug, Clone)]
pub struct LintIssue {
    pub severity: LintSeverity,
    pub code: &'static str,
    pub message: String,
    pub path: String,
    pub line: u32,
}

impl LintIssue {
    pub fn error(code: &'static str, message: String, path: &str, line: u32) -> Self {
        Self {
            severity: LintSeverity::Error,
            code,
            message,
            path: path.to_string(),
            line,
        }
    }

    pub fn warning(code: &'static str, message: String, path: &str, line: u32) -> Self {
        Self {
            severity: LintSeverity::Warning,
            code,
            message,
            path: path.to_string(),
            line,
        }
    }

    pub fn to_result_item(&self) -> ResultItem {
        ResultItem {
            kind: Kind::Error,
            path: Some(self.path.clone()),
            range: Some(Range::lines(self.line, self.line)),
            excerpt: Some(self.message.clone()),
            data: None,
            confidence: match self.severity {
                LintSeverity::Error => Confidence::High,
                LintSeverity::Warning => Confidence::Medium,
            },
            source_mode: SourceMode::Lint,
            meta: Default::default(),
            errors: vec![NoteError::new(self.code, &self.message)],
        }
    }
}

/// An open capture while linting
struct OpenCapture {
    marker: char,
    line: u32,
    name: String,
}

/// Lint note text. With `structure` set, list tokens are skipped the same way
/// the structural rewrite removes them before the link scan.
pub fn lint_text(text: &str, table: &MarkerTable, path: &str, structure: bool) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    let mut open: Option<OpenCapture> = None;
    let mut line: u32 = 1;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        if structure {
            if let Some(len) = list_token_len(rest) {
                pos += len;
                continue;
            }
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        pos += c.len_utf8();

        if table.is_marker(c) {
            match open.take() {
                None => {
                    open = Some(OpenCapture {
                        marker: c,
                        line,
                        name: String::new(),
                    });
                }
                Some(capture) => {
                    check_closed(&capture, c, line, table, path, &mut issues);
                }
            }
        } else if let Some(capture) = open.as_mut() {
            capture.name.push(c);
        }

        if c == '\n' {
            line += 1;
        }
    }

    if let Some(capture) = open {
        issues.push(LintIssue::error(
            "UNTERMINATED_MARKER",
            format!(
                "Marker '{}' opened here is never closed; the rest of the note is swallowed",
                capture.marker
            ),
            path,
            capture.line,
        ));
    }

    issues
}

fn check_closed(
    capture: &OpenCapture,
    closer: char,
    line: u32,
    table: &MarkerTable,
    path: &str,
    issues: &mut Vec<LintIssue>,
) {
    if capture.name.is_empty() {
        issues.push(LintIssue::warning(
            "EMPTY_NAME",
            format!("Empty name between '{}' markers", capture.marker),
            path,
            capture.line,
        ));
    }

    if closer != capture.marker {
        let kind = |m: char| table.get(m).map(|k| k.name.as_str()).unwrap_or("?");
        issues.push(LintIssue::warning(
            "MISMATCHED_MARKER",
            format!(
                "'{}' opened with '{}' ({}) but closed with '{}' ({})",
                capture.name,
                capture.marker,
                kind(capture.marker),
                closer,
                kind(closer)
            ),
            path,
            line,
        ));
    }

    if capture.name.contains('\n') {
        issues.push(LintIssue::warning(
            "MULTILINE_NAME",
            format!(
                "Name starting with '{}' runs across a line break",
                capture.name.lines().next().unwrap_or_default()
            ),
            path,
            capture.line,
        ));
    }
}
