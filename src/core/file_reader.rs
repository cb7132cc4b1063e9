//! Note reading
//!
//! Notes are read with consistent handling for:
//! - Non-UTF-8 files (lossy conversion, with a warning)
//! - Oversized files (truncated at a char boundary, with a warning)
//! - Binary files (skipped)

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::core::model::NoteError;

/// Default truncation size in bytes (1 MB)
pub const DEFAULT_MAX_NOTE_SIZE: usize = 1024 * 1024;

/// Warning codes for note reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    NoteTruncated,
    LossyConversion,
    BinaryFile,
    ReadFailed,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::NoteTruncated => "NOTE_TRUNCATED",
            WarningCode::LossyConversion => "LOSSY_CONVERSION",
            WarningCode::BinaryFile => "BINARY_FILE",
            WarningCode::ReadFailed => "READ_FAILED",
        }
    }
}

/// A structured warning
#[derive(Debug, Clone)]
pub struct ReadWarning {
    pub code: WarningCode,
    pub message: String,
}

impl ReadWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn to_note_error(&self) -> NoteError {
        NoteError::new(self.code.as_str(), &self.message)
    }
}

/// Result of reading a note
#[derive(Debug, Clone, Default)]
pub struct NoteRead {
    /// Note text, `None` when the note was skipped
    pub content: Option<String>,

    pub truncated: bool,

    pub lossy: bool,

    pub warnings: Vec<ReadWarning>,
}

impl NoteRead {
    fn skipped(warning: ReadWarning) -> Self {
        Self {
            warnings: vec![warning],
            ..Default::default()
        }
    }
}

/// Read a note file, capping it at `max_bytes`
pub fn read_note(path: &Path, max_bytes: usize) -> NoteRead {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            return NoteRead::skipped(ReadWarning::new(
                WarningCode::ReadFailed,
                format!("Cannot read {}: {}", path.display(), e),
            ))
        }
    };

    let mut bytes = Vec::new();
    // One extra byte tells us whether the file was longer than the cap
    if let Err(e) = file.take((max_bytes as u64).saturating_add(1)).read_to_end(&mut bytes) {
        return NoteRead::skipped(ReadWarning::new(
            WarningCode::ReadFailed,
            format!("Cannot read {}: {}", path.display(), e),
        ));
    }

    decode_note(bytes, max_bytes)
}

/// Read a note from any reader (stdin)
pub fn read_note_from<R: Read>(reader: R, max_bytes: usize) -> NoteRead {
    let mut bytes = Vec::new();
    match reader.take((max_bytes as u64).saturating_add(1)).read_to_end(&mut bytes) {
        Ok(_) => decode_note(bytes, max_bytes),
        Err(e) => NoteRead::skipped(ReadWarning::new(
            WarningCode::ReadFailed,
            format!("Cannot read input: {}", e),
        )),
    }
}

fn decode_note(bytes: Vec<u8>, max_bytes: usize) -> NoteRead {
    let check_len = std::cmp::min(8192, bytes.len());
    if bytes[..check_len].contains(&0) {
        return NoteRead::skipped(ReadWarning::new(
            WarningCode::BinaryFile,
            "Note appears to be binary (contains null bytes)",
        ));
    }

    let mut result = NoteRead::default();
    let over_cap = bytes.len() > max_bytes;

    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        // The cap split a multibyte character; keep the valid prefix
        Err(e) if over_cap && e.utf8_error().error_len().is_none() => {
            let valid = e.utf8_error().valid_up_to();
            String::from_utf8_lossy(&e.as_bytes()[..valid]).into_owned()
        }
        Err(e) => {
            result.lossy = true;
            result.warnings.push(ReadWarning::new(
                WarningCode::LossyConversion,
                "Lossy UTF-8 conversion applied (some characters replaced)",
            ));
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    if over_cap {
        let truncated = truncate_at_char_boundary(&content, max_bytes);
        result.truncated = true;
        result.warnings.push(ReadWarning::new(
            WarningCode::NoteTruncated,
            format!("Note truncated to {} bytes", truncated.len()),
        ));
        result.content = Some(truncated);
    } else {
        result.content = Some(content);
    }

    result
}

/// Truncate string at a valid UTF-8 character boundary
fn truncate_at_char_boundary(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    s[..end].to_string()
}
