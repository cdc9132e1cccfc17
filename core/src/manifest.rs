//! Persisted record of the last generated fingerprint per unit.
//!
//! On disk the manifest is a JSON object keyed by group id, each value an
//! object keyed by unit key:
//!
//! ```json
//! {
//!   "01": {
//!     "unit-02": "9f86d081884c7d65"
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fingerprint::Fingerprint;

// ==================== Group Entries ====================

/// Unit key to fingerprint map of a single group.
///
/// A key is present only if that unit was generated successfully at least
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupEntries(BTreeMap<String, Fingerprint>);

impl GroupEntries {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded fingerprint for `key`.
    pub fn get(&self, key: &str) -> Option<&Fingerprint> {
        self.0.get(key)
    }

    /// Records a fingerprint, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, fingerprint: Fingerprint) -> Option<Fingerprint> {
        self.0.insert(key.into(), fingerprint)
    }

    /// Returns true if `key` has a recorded fingerprint.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fingerprint)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Fingerprint)> for GroupEntries {
    fn from_iter<I: IntoIterator<Item = (K, Fingerprint)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ==================== Manifest ====================

/// Group id to [`GroupEntries`] map for the whole slides directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, GroupEntries>);

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entries recorded for `group_id`.
    pub fn group(&self, group_id: &str) -> Option<&GroupEntries> {
        self.0.get(group_id)
    }

    /// Returns a copy of the entries for `group_id`, empty if none.
    pub fn group_or_default(&self, group_id: &str) -> GroupEntries {
        self.0.get(group_id).cloned().unwrap_or_default()
    }

    /// Replaces the entries of `group_id` as a whole.
    pub fn replace_group(&mut self, group_id: impl Into<String>, entries: GroupEntries) {
        self.0.insert(group_id.into(), entries);
    }

    /// Iterates group ids in order.
    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ==================== Store ====================

/// Loads and saves the manifest file.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    /// Creates a store for the manifest at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the manifest file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the manifest.
    ///
    /// A missing file is an empty manifest. A file that exists but does not
    /// decode is an error; it is never silently replaced.
    pub fn load(&self) -> Result<Manifest> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "manifest: not found, starting empty");
                return Ok(Manifest::new());
            }
            Err(source) => {
                return Err(Error::ManifestIo {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&data).map_err(|source| Error::ManifestParse {
            path: self.path.clone(),
            source,
        })
    }

    /// Saves the manifest, replacing the previous file entirely.
    ///
    /// The file is written next to the target and renamed over it.
    pub fn save(&self, manifest: &Manifest) -> Result<()> {
        let io_err = |source| Error::ManifestIo {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let mut content = serde_json::to_string_pretty(manifest)?;
        content.push('\n');

        let tmp = self.tmp_path();
        std::fs::write(&tmp, content).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;

        debug!(path = %self.path.display(), groups = manifest.len(), "manifest: saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Manifest {
        let mut manifest = Manifest::new();
        manifest.replace_group(
            "02",
            [("unit-03", Fingerprint::of("b")), ("unit-01", Fingerprint::of("a"))]
                .into_iter()
                .collect(),
        );
        manifest.replace_group("01", [("unit-02", Fingerprint::of("안녕하세요"))].into_iter().collect());
        manifest
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("audio/manifest.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("audio/manifest.json"));

        let manifest = sample();
        store.save(&manifest).unwrap();

        assert_eq!(store.load().unwrap(), manifest);
        assert!(!dir.path().join("audio/manifest.json.tmp").exists());
    }

    #[test]
    fn test_save_is_sorted_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("manifest.json"));
        store.save(&sample()).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"01\": {\n    \"unit-02\": "));
        assert!(text.find("\"01\"").unwrap() < text.find("\"02\"").unwrap());
        assert!(text.find("\"unit-01\"").unwrap() < text.find("\"unit-03\"").unwrap());
    }

    #[test]
    fn test_save_overwrites_not_merges() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("manifest.json"));
        store.save(&sample()).unwrap();

        let mut smaller = Manifest::new();
        smaller.replace_group("09", GroupEntries::new());
        store.save(&smaller).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.group_ids().collect::<Vec<_>>(), vec!["09"]);
    }

    #[test]
    fn test_load_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");

        for bad in ["", "{", "[]", "{\"01\": \"unit-01\"}"] {
            std::fs::write(&path, bad).unwrap();
            let err = ManifestStore::new(&path).load().unwrap_err();
            assert!(matches!(err, Error::ManifestParse { .. }), "{bad:?}: {err}");
        }
    }

    #[test]
    fn test_reads_existing_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, "{\n  \"01\": {\n    \"unit-02\": \"9f86d081884c7d65\"\n  }\n}\n").unwrap();

        let manifest = ManifestStore::new(&path).load().unwrap();
        let entries = manifest.group("01").unwrap();
        assert_eq!(entries.get("unit-02").unwrap().as_str(), "9f86d081884c7d65");
        assert!(manifest.group("02").is_none());
        assert!(manifest.group_or_default("02").is_empty());
    }
}
