//! Linker configuration
//!
//! Layered, lowest to highest precedence:
//! 1. the built-in campaign marker table
//! 2. a JSON config file (`--config`, or `notelink.json` under the root)
//! 3. URL overrides from the command line or environment

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::markup::kinds::{MarkerBinding, MarkerError, MarkerTable};

/// Config file looked up under the root when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "notelink.json";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Marker(#[from] MarkerError),
}

/// On-disk configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Apply the paragraph/list rewrite before linking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<bool>,

    /// Replaces the built-in marker table entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<MarkerBinding>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beyond_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_url: Option<String>,
}

impl ConfigFile {
    pub fn urls(&self) -> UrlOverrides {
        UrlOverrides {
            thing_url: self.thing_url.clone(),
            beyond_url: self.beyond_url.clone(),
            item_url: self.item_url.clone(),
            spell_url: self.spell_url.clone(),
        }
    }
}

/// Base URL overrides for the four campaign link kinds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlOverrides {
    pub thing_url: Option<String>,
    pub beyond_url: Option<String>,
    pub item_url: Option<String>,
    pub spell_url: Option<String>,
}

impl UrlOverrides {
    /// (link kind name, url) pairs that are set
    fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("thing", &self.thing_url),
            ("monster", &self.beyond_url),
            ("item", &self.item_url),
            ("spell", &self.spell_url),
        ]
        .into_iter()
        .filter_map(|(kind, url)| url.as_deref().map(|u| (kind, u)))
    }
}

/// Effective linker configuration
#[derive(Debug, Clone)]
pub struct LinkerConfig {
    pub table: MarkerTable,
    pub structure: bool,
    /// Config file that was applied, if any
    pub source: Option<PathBuf>,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            table: MarkerTable::campaign(),
            structure: true,
            source: None,
        }
    }
}

impl LinkerConfig {
    /// Load configuration for a root directory.
    ///
    /// An explicit config path must exist; the default file is optional.
    pub fn load(
        root: &Path,
        explicit: Option<&Path>,
        overrides: &UrlOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = match explicit {
            Some(p) if p.is_absolute() => Some(p.to_path_buf()),
            Some(p) => Some(root.join(p)),
            None => Some(root.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        if let Some(path) = path {
            let file = read_config_file(&path)?;
            config.apply_file(file)?;
            config.source = Some(path);
        }

        config.apply_urls(overrides)?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        let urls = file.urls();
        if let Some(structure) = file.structure {
            self.structure = structure;
        }
        if let Some(kinds) = file.kinds {
            self.table = MarkerTable::new(kinds)?;
        }
        self.apply_urls(&urls)
    }

    fn apply_urls(&mut self, overrides: &UrlOverrides) -> Result<(), ConfigError> {
        for (name, url) in overrides.entries() {
            if url.is_empty() {
                return Err(MarkerError::EmptyUrl(name.to_string()).into());
            }
            match self.table.by_name_mut(name) {
                Some(binding) => binding.kind.url = url.to_string(),
                None => {
                    crate::warning!("config"; "no '{}' link kind to apply url {} to", name, url)
                }
            }
        }
        Ok(())
    }
}

/// Parse a config file
pub fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::kinds::DEFAULT_BEYOND_URL;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let temp = tempdir().unwrap();
        let config = LinkerConfig::load(temp.path(), None, &UrlOverrides::default()).unwrap();
        assert!(config.structure);
        assert!(config.source.is_none());
        assert_eq!(config.table, MarkerTable::campaign());
    }

    #[test]
    fn test_default_file_is_picked_up() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            r#"{"structure": false, "thing_url": "/things/"}"#,
        )
        .unwrap();

        let config = LinkerConfig::load(temp.path(), None, &UrlOverrides::default()).unwrap();
        assert!(!config.structure);
        assert_eq!(config.table.get('*').unwrap().url, "/things/");
        assert_eq!(config.table.get('@').unwrap().url, DEFAULT_BEYOND_URL);
        assert!(config.source.is_some());
    }

    #[test]
    fn test_kinds_replace_table() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("custom.json"),
            r#"{"kinds": [{"marker": "~", "name": "npc", "url": "/npc/", "class": "npc"}]}"#,
        )
        .unwrap();

        let config = LinkerConfig::load(
            temp.path(),
            Some(Path::new("custom.json")),
            &UrlOverrides::default(),
        )
        .unwrap();
        assert_eq!(config.table.len(), 1);
        assert_eq!(config.table.get('~').unwrap().name, "npc");
        assert!(config.table.get('*').is_none());
    }

    #[test]
    fn test_file_kinds_then_file_urls() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            r#"{
                "kinds": [{"marker": "@", "name": "monster", "url": "/m/", "slug": true}],
                "beyond_url": "/beasts/"
            }"#,
        )
        .unwrap();

        let config = LinkerConfig::load(temp.path(), None, &UrlOverrides::default()).unwrap();
        assert_eq!(config.table.len(), 1);
        assert_eq!(config.table.get('@').unwrap().href("Hill Giant"), "/beasts/Hill-Giant");
    }

    #[test]
    fn test_overrides_beat_file() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            r#"{"spell_url": "/from-file/"}"#,
        )
        .unwrap();
        let overrides = UrlOverrides {
            spell_url: Some("/from-cli/".to_string()),
            beyond_url: Some("https://example.com/m/{name}".to_string()),
            ..Default::default()
        };

        let config = LinkerConfig::load(temp.path(), None, &overrides).unwrap();
        assert_eq!(config.table.get('^').unwrap().url, "/from-cli/");
        assert_eq!(
            config.table.get('@').unwrap().href("Ogre Mage"),
            "https://example.com/m/Ogre-Mage"
        );
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp = tempdir().unwrap();
        let err = LinkerConfig::load(
            temp.path(),
            Some(Path::new("nope.json")),
            &UrlOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), r#"{"colour": "red"}"#).unwrap();
        let err = LinkerConfig::load(temp.path(), None, &UrlOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn test_duplicate_markers_in_file() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            r#"{"kinds": [
                {"marker": "~", "name": "a", "url": "/a/"},
                {"marker": "~", "name": "b", "url": "/b/"}
            ]}"#,
        )
        .unwrap();
        let err = LinkerConfig::load(temp.path(), None, &UrlOverrides::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Marker(MarkerError::DuplicateMarker { marker: '~', .. })
        ));
    }

    #[test]
    fn test_empty_override_is_rejected() {
        let temp = tempdir().unwrap();
        let overrides = UrlOverrides {
            item_url: Some(String::new()),
            ..Default::default()
        };
        let err = LinkerConfig::load(temp.path(), None, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Marker(MarkerError::EmptyUrl(_))));
    }
}
