//! Backing configuration store
//!
//! A named key-value store organised in groups of string entries, persisted
//! as a single JSON document in the user's configuration directory. Values
//! are kept as strings and parsed on read, so a corrupt entry only costs the
//! field it belongs to.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Logical name of the decoration configuration store
pub const STORE_NAME: &str = "breezerc";

type Group = BTreeMap<String, String>;

/// On-disk layout of the store
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    groups: BTreeMap<String, Group>,
}

/// In-memory contents of a store at some point in time
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    data: StoreData,
    dirty: bool,
}

/// Key-value configuration store with explicit `sync()`
#[derive(Debug)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    data: StoreData,
    dirty: bool,
}

impl ConfigStore {
    /// Open the store `<dir>/<name>.json`.
    ///
    /// A missing file yields an empty store. A file that cannot be read or
    /// parsed is logged and treated as empty; it is replaced on the next
    /// `sync()`.
    pub fn open(dir: &Path, name: &str) -> Self {
        Self::open_path(dir.join(format!("{}.json", name)))
    }

    /// Open a store backed by an explicit file path
    pub fn open_path(path: PathBuf) -> Self {
        let data = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<StoreData>(&content) {
                Ok(data) => data,
                Err(e) => {
                    warn!("Ignoring corrupt configuration {:?}: {}", path, e);
                    StoreData::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No configuration at {:?}, starting empty", path);
                StoreData::default()
            }
            Err(e) => {
                warn!("Failed to read configuration {:?}: {}", path, e);
                StoreData::default()
            }
        };

        Self {
            path: Some(path),
            data,
            dirty: false,
        }
    }

    /// Store that lives only in memory; `sync()` is a no-op
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreData::default(),
            dirty: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw string stored under `group`/`key`
    pub fn raw_entry(&self, group: &str, key: &str) -> Option<&str> {
        self.data
            .groups
            .get(group)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Read and parse an entry, falling back to `default` when the entry is
    /// missing or does not parse.
    pub fn read_entry<T: FromStr>(&self, group: &str, key: &str, default: T) -> T {
        match self.raw_entry(group, key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                debug!("Unparsable value '{}' for [{}] {}, using default", raw, group, key);
                default
            }),
            None => default,
        }
    }

    /// Write an entry. Does not touch the disk until `sync()`.
    pub fn write_entry<T: Display + ?Sized>(&mut self, group: &str, key: &str, value: &T) {
        let value = value.to_string();
        let entries = self.data.groups.entry(group.to_string()).or_default();
        if entries.get(key) != Some(&value) {
            entries.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.data.groups.contains_key(group)
    }

    /// Names of all groups, in sorted order
    pub fn group_list(&self) -> Vec<String> {
        self.data.groups.keys().cloned().collect()
    }

    /// Remove a group and all its entries. Returns whether it existed.
    pub fn delete_group(&mut self, group: &str) -> bool {
        let removed = self.data.groups.remove(group).is_some();
        self.dirty |= removed;
        removed
    }

    /// Whether there are writes not yet flushed by `sync()`
    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Capture the in-memory contents so a failed save can be undone
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            data: self.data.clone(),
            dirty: self.dirty,
        }
    }

    /// Drop every write made since `snapshot` was taken
    pub fn restore(&mut self, snapshot: StoreSnapshot) {
        self.data = snapshot.data;
        self.dirty = snapshot.dirty;
    }

    /// Flush pending writes to disk.
    ///
    /// The document is written to a sibling temporary file and renamed over
    /// the original, so readers never observe a half-written store.
    pub fn sync(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let Some(path) = self.path.as_ref() else {
            self.dirty = false;
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", tmp_path))?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).with_context(|| format!("Failed to replace configuration {:?}", path));
        }

        info!("Configuration saved to {:?}", path);
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_uses_default() {
        let store = ConfigStore::in_memory();
        assert_eq!(store.read_entry("Windeco", "ButtonSize", 18), 18);
        assert!(store.read_entry("Windeco", "AnimationsEnabled", true));
    }

    #[test]
    fn test_corrupt_entry_uses_default() {
        let mut store = ConfigStore::in_memory();
        store.write_entry("Windeco", "ButtonSize", "huge");
        assert_eq!(store.read_entry("Windeco", "ButtonSize", 18), 18);
    }

    #[test]
    fn test_write_marks_dirty_only_on_change() {
        let mut store = ConfigStore::in_memory();
        store.write_entry("Windeco", "ButtonSize", &24);
        assert!(store.is_dirty());
        store.sync().unwrap();
        assert!(!store.is_dirty());

        store.write_entry("Windeco", "ButtonSize", &24);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_delete_group() {
        let mut store = ConfigStore::in_memory();
        store.write_entry("Windeco Exception 0", "ExceptionPattern", "firefox");
        assert!(store.has_group("Windeco Exception 0"));
        assert!(store.delete_group("Windeco Exception 0"));
        assert!(!store.has_group("Windeco Exception 0"));
        assert!(!store.delete_group("Windeco Exception 0"));
    }

    #[test]
    fn test_sync_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ConfigStore::open(dir.path(), STORE_NAME);
        store.write_entry("Windeco", "ButtonSize", &24);
        store.write_entry("Windeco", "TitleAlignment", "AlignLeft");
        store.sync().unwrap();

        let reopened = ConfigStore::open(dir.path(), STORE_NAME);
        assert_eq!(reopened.read_entry("Windeco", "ButtonSize", 18), 24);
        assert_eq!(reopened.raw_entry("Windeco", "TitleAlignment"), Some("AlignLeft"));
        assert_eq!(reopened.group_list(), vec!["Windeco".to_string()]);
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("breezerc.json"), "{ not json").unwrap();

        let store = ConfigStore::open(dir.path(), STORE_NAME);
        assert!(store.group_list().is_empty());
        assert_eq!(store.read_entry("Windeco", "ShadowSize", 90), 90);
    }

    #[test]
    fn test_sync_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let mut store = ConfigStore::open(&blocker, STORE_NAME);
        store.write_entry("Windeco", "ButtonSize", &24);
        assert!(store.sync().is_err());
        assert!(store.is_dirty());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the document should go
        let target = dir.path().join("breezerc.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "").unwrap();

        let mut store = ConfigStore::open(dir.path(), STORE_NAME);
        store.write_entry("Windeco", "ButtonSize", &24);
        assert!(store.sync().is_err());
        assert!(!dir.path().join("breezerc.json.tmp").exists());
        assert!(store.is_dirty());
    }

    #[test]
    fn test_restore_discards_writes_after_snapshot() {
        let mut store = ConfigStore::in_memory();
        store.write_entry("Windeco", "ButtonSize", &20);
        store.sync().unwrap();

        let snapshot = store.snapshot();
        store.write_entry("Windeco", "ButtonSize", &24);
        store.write_entry("Windeco Exception 0", "ExceptionPattern", "konsole");
        store.restore(snapshot);

        assert_eq!(store.read_entry("Windeco", "ButtonSize", 18), 20);
        assert!(!store.has_group("Windeco Exception 0"));
        assert!(!store.is_dirty());
    }
}
