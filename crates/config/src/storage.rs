//! Key-value blob storage
//!
//! Mirrors browser local storage: string keys, opaque string values.
//! `FileStorage` keeps every key in a single JSON object on disk,
//! `MemoryStorage` keeps them in a shared in-process map.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Error reading or writing the storage backend
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// File I/O error
    Io(String),
    /// Value could not be serialized
    Serialize(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
            StorageError::Serialize(msg) => write!(f, "Serialize error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Local-storage style backend.
pub trait Storage {
    /// Read the blob stored under `key`, `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous blob.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;

    /// All stored keys, sorted.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

// ============================================================================
// In-memory storage
// ============================================================================

/// In-memory storage. Clones share the same map, so a host can hand one
/// handle to each manager and still observe every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.items.borrow().keys().cloned().collect())
    }
}

// ============================================================================
// File storage
// ============================================================================

/// File-backed storage: one JSON object mapping keys to blobs.
///
/// Default location is `~/.config/kirzach-live/storage.json`.
/// The file is re-read on every access so separate handles stay in sync.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the default per-user location
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    /// Get the default storage file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kirzach-live")
            .join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole map.
    ///
    /// A missing file is an empty store. A corrupt file is also treated as
    /// empty (and will be overwritten by the next write) so a damaged blob
    /// never blocks startup.
    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };

        match serde_json::from_str(&contents) {
            Ok(items) => Ok(items),
            Err(e) => {
                log::warn!("ignoring corrupt storage file {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    /// Write the whole map (write-to-temp-then-rename)
    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
            }
        }

        let json = serde_json::to_string_pretty(items)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, json).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::rename(&temp, &self.path).map_err(|e| StorageError::Io(e.to_string()))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.read_all()?.into_keys().collect())
    }
}
