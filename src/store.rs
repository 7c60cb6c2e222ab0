//! Shared configuration storage.
//!
//! The GUI and the extension run as separate processes but share one
//! key-value namespace backed by a JSON file in the user config directory.
//! The whole configuration lives under a single key; saves replace it
//! wholesale and loads re-read the file every time, so the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::Configuration;
use crate::error::{UnisearchError, UnisearchResult};
use crate::versioned::VersionedDecoder;

const CONFIGURATION_KEY: &str = "configuration";

/// File-backed store for the shared configuration record.
pub struct ConfigStore {
    storage_path: PathBuf,
}

impl ConfigStore {
    /// Store rooted at the default shared namespace.
    pub fn new() -> Self {
        Self::at(Self::default_dir())
    }

    /// Store rooted at a specific directory (tests, `--storage` override).
    pub fn at(dir: PathBuf) -> Self {
        Self {
            storage_path: dir.join("storage.json"),
        }
    }

    fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                // ~ is not expanded by PathBuf, so fall back through dirs
                dirs::home_dir()
                    .map(|home| home.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
            })
            .join("unisearch")
    }

    /// Load the stored configuration, upgrading older schema versions.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet (first run).
    pub fn load(&self) -> UnisearchResult<Option<Configuration>> {
        let namespace = self.read_namespace()?;
        let value = match namespace.get(CONFIGURATION_KEY) {
            Some(value) => value,
            None => return Ok(None),
        };

        let data = serde_json::to_vec(value)?;
        VersionedDecoder::decode(&data).map(Some)
    }

    /// Persist the whole configuration under the single storage key.
    ///
    /// Returns false on serialization or write failure; any prior value is
    /// overwritten wholesale.
    pub fn save(&self, configuration: &Configuration) -> bool {
        let value = match serde_json::to_value(configuration) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("[Unisearch] Failed to serialize configuration: {e}");
                return false;
            }
        };

        let mut namespace = self.read_namespace().unwrap_or_default();
        namespace.insert(CONFIGURATION_KEY.to_string(), value);

        match self.write_namespace(&namespace) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("[Unisearch] Failed to write configuration: {e}");
                false
            }
        }
    }

    /// Remove the stored configuration entirely.
    pub fn clear(&self) -> UnisearchResult<()> {
        let mut namespace = self.read_namespace()?;
        if namespace.remove(CONFIGURATION_KEY).is_some() {
            self.write_namespace(&namespace)?;
        }
        Ok(())
    }

    /// Write the stored configuration to a standalone pretty-printed file.
    pub fn export_to(&self, path: &Path) -> UnisearchResult<()> {
        let configuration = self.load()?.ok_or(UnisearchError::NoConfiguration)?;
        let contents = serde_json::to_string_pretty(&configuration)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, contents)?;
        Ok(())
    }

    /// Read a configuration from a standalone file.
    ///
    /// Returns `Ok(None)` for an unreadable or empty file; decode errors
    /// propagate. Merging the result with the stored list is the caller's
    /// job, the store itself never merges.
    pub fn import_from(&self, path: &Path) -> UnisearchResult<Option<Configuration>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!(
                    "[Unisearch] Failed to read configuration file {}: {e}",
                    path.display()
                );
                return Ok(None);
            }
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        VersionedDecoder::decode(contents.as_bytes()).map(Some)
    }

    fn read_namespace(&self) -> UnisearchResult<Map<String, Value>> {
        if !self.storage_path.exists() {
            return Ok(Map::new());
        }

        let contents = fs::read_to_string(&self.storage_path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| UnisearchError::Decode(format!("storage file is not valid JSON: {e}")))
    }

    fn write_namespace(&self, namespace: &Map<String, Value>) -> UnisearchResult<()> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| UnisearchError::Write(format!("failed to create storage directory: {e}")))?;
        }

        let contents = serde_json::to_string_pretty(namespace)?;
        fs::write(&self.storage_path, contents)
            .map_err(|e| UnisearchError::Write(format!("failed to write storage file: {e}")))
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Command, Options, Version};
    use tempfile::TempDir;

    fn sample() -> Configuration {
        Configuration::new(vec![Command {
            name: "Google".to_string(),
            url_template: "https://www.google.com/search?q=%s".to_string(),
            options: Options {
                should_escape_for_regex: false,
                should_escape_double_quotes: true,
                should_percent_encode_full_url: false,
            },
        }])
    }

    #[test]
    fn test_load_on_empty_storage_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        let configuration = sample();
        assert!(store.save(&configuration));
        assert_eq!(store.load().unwrap(), Some(configuration));
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        assert!(store.save(&sample()));
        let replacement = Configuration::new(Vec::new());
        assert!(store.save(&replacement));
        assert_eq!(store.load().unwrap(), Some(replacement));
    }

    #[test]
    fn test_clear_removes_stored_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        assert!(store.save(&sample()));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_clear_on_empty_storage_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_load_rejects_corrupt_storage() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        fs::write(temp_dir.path().join("storage.json"), "{not json").unwrap();
        assert!(matches!(
            store.load().unwrap_err(),
            UnisearchError::Decode(_)
        ));
    }

    #[test]
    fn test_load_migrates_v1_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        let namespace = serde_json::json!({
            "configuration": {
                "version": 1,
                "commands": [{
                    "name": "Docs",
                    "urlTemplate": "https://docs.rs/%s",
                    "options": {
                        "shouldEscapeForRegex": false,
                        "shouldEscapeDoubleQuotes": false
                    }
                }]
            }
        });
        fs::write(
            temp_dir.path().join("storage.json"),
            serde_json::to_string_pretty(&namespace).unwrap(),
        )
        .unwrap();

        let configuration = store.load().unwrap().unwrap();
        assert_eq!(configuration.version, Version::V2);
        assert!(!configuration.commands[0].options.should_percent_encode_full_url);
    }

    #[test]
    fn test_export_without_save_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        let err = store
            .export_to(&temp_dir.path().join("out.json"))
            .unwrap_err();
        assert!(matches!(err, UnisearchError::NoConfiguration));
    }

    #[test]
    fn test_export_then_import_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        let configuration = sample();
        assert!(store.save(&configuration));

        let path = temp_dir.path().join("exported.json");
        store.export_to(&path).unwrap();

        let imported = store.import_from(&path).unwrap();
        assert_eq!(imported, Some(configuration));
    }

    #[test]
    fn test_import_missing_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        let imported = store.import_from(&temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(imported, None);
    }

    #[test]
    fn test_import_empty_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        let path = temp_dir.path().join("empty.json");
        fs::write(&path, "").unwrap();
        assert_eq!(store.import_from(&path).unwrap(), None);
    }

    #[test]
    fn test_import_propagates_decode_errors() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::at(temp_dir.path().to_path_buf());

        let path = temp_dir.path().join("bad.json");
        fs::write(&path, r#"{"commands": []}"#).unwrap();
        assert!(matches!(
            store.import_from(&path).unwrap_err(),
            UnisearchError::Decode(_)
        ));
    }
}
