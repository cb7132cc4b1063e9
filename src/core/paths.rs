//! Path handling for note sources
//!
//! Paths are normalized to use '/' as separator and are reported relative to
//! the root. Directories are walked for note files.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as notes when walking a directory
pub const NOTE_EXTENSIONS: &[&str] = &["txt", "md", "note"];

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Display a path relative to root when possible
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(normalize_path)
        .unwrap_or_else(|_| normalize_path(path))
}

/// Check if a file looks like a note
pub fn is_note_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| NOTE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Resolve inputs against root and expand directories into their note files.
///
/// Explicit files are kept whatever their extension. Directory contents are
/// sorted for stable output and hidden entries are skipped.
pub fn collect_note_paths(root: &Path, inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for input in inputs {
        let full = if input.is_absolute() {
            input.clone()
        } else {
            root.join(input)
        };

        if full.is_dir() {
            let walker = WalkDir::new(&full)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));
            for entry in walker.filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && is_note_file(entry.path()) {
                    paths.push(entry.into_path());
                }
            }
        } else {
            paths.push(full);
        }
    }

    paths
}

/// Check if a path is hidden (starts with '.')
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("notes/inn.txt")), "notes/inn.txt");
    }

    #[test]
    fn test_display_relative() {
        let root = Path::new("/campaign");
        assert_eq!(
            display_relative(Path::new("/campaign/notes/a.txt"), root),
            "notes/a.txt"
        );
        assert_eq!(display_relative(Path::new("/elsewhere/b.txt"), root), "/elsewhere/b.txt");
    }

    #[test]
    fn test_is_note_file() {
        assert!(is_note_file(Path::new("inn.txt")));
        assert!(is_note_file(Path::new("inn.MD")));
        assert!(is_note_file(Path::new("inn.note")));
        assert!(!is_note_file(Path::new("map.png")));
        assert!(!is_note_file(Path::new("README")));
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new(".drafts")));
        assert!(!is_hidden(Path::new("notes")));
    }

    #[test]
    fn test_collect_note_paths_walks_directories_in_order() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("notes/sub")).unwrap();
        fs::create_dir_all(root.join("notes/.hidden")).unwrap();
        fs::write(root.join("notes/b.txt"), "b").unwrap();
        fs::write(root.join("notes/a.md"), "a").unwrap();
        fs::write(root.join("notes/sub/c.note"), "c").unwrap();
        fs::write(root.join("notes/map.png"), "x").unwrap();
        fs::write(root.join("notes/.hidden/d.txt"), "d").unwrap();
        fs::write(root.join("extra.dat"), "e").unwrap();

        let paths = collect_note_paths(
            root,
            &[PathBuf::from("notes"), PathBuf::from("extra.dat")],
        );
        let shown: Vec<_> = paths.iter().map(|p| display_relative(p, root)).collect();

        assert_eq!(
            shown,
            vec!["notes/a.md", "notes/b.txt", "notes/sub/c.note", "extra.dat"]
        );
    }
}
