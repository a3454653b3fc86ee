use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::eval::AngleMode;
use crate::history::HistoryEntry;
use crate::session::Theme;

/// The persisted part of a session. Missing fields take their defaults so
/// older or hand-edited files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub angle_mode: AngleMode,
    pub theme: Theme,
    /// The memory register as a decimal string.
    pub memory: String,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            angle_mode: AngleMode::default(),
            theme: Theme::default(),
            memory: "0".to_string(),
            history: Vec::new(),
        }
    }
}

/// Durable storage for session settings, loaded once at startup and
/// rewritten after every change.
pub trait Store {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Keeps the snapshot as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        JsonStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Keeps the snapshot in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<Snapshot>,
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            angle_mode: AngleMode::Degrees,
            theme: Theme::Dark,
            memory: "12.5".to_string(),
            history: vec![HistoryEntry {
                expression: "2^3^2".to_string(),
                result: "512".to_string(),
            }],
        }
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn json_layout() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["angle_mode"], "deg");
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["memory"], "12.5");
        assert_eq!(value["history"][0]["result"], "512");
    }

    #[test]
    fn missing_fields_default() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"angle_mode":"deg"}"#).unwrap();
        assert_eq!(snapshot.angle_mode, AngleMode::Degrees);
        assert_eq!(snapshot.theme, Theme::Light);
        assert_eq!(snapshot.memory, "0");
        assert!(snapshot.history.is_empty());
    }

    #[test]
    fn corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        match JsonStore::new(path).load() {
            Err(StoreError::Json(_)) => (),
            other => panic!("expected a JSON error, got {:?}", other),
        }
    }

    #[test]
    fn memory_store() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load().unwrap(), None);
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
    }
}
