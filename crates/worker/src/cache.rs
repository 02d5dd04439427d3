//! Offline asset cache
//!
//! `MemoryCache` for tests, `DiskCache` for hosts that keep assets between
//! runs. Disk entries live in `<root>/<cache name>/` as a body file plus a
//! small JSON header, both named by a hash of the request path.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::WorkerError;

/// A fetched response, reduced to what the cache needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self { status: 200, content_type: None, body: body.into() }
    }

    /// 2xx status
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait AssetCache {
    /// Cached response for `path`, if any
    fn lookup(&self, path: &str) -> Result<Option<Response>, WorkerError>;

    fn put(&mut self, path: &str, response: &Response) -> Result<(), WorkerError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Response>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetCache for MemoryCache {
    fn lookup(&self, path: &str) -> Result<Option<Response>, WorkerError> {
        Ok(self.entries.get(path).cloned())
    }

    fn put(&mut self, path: &str, response: &Response) -> Result<(), WorkerError> {
        self.entries.insert(path.to_string(), response.clone());
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryHeader {
    path: String,
    status: u16,
    content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Cache named `name` under `root`
    pub fn new(root: &Path, name: &str) -> Self {
        Self { dir: root.join(name) }
    }

    /// Cache named `name` under the per-user cache directory
    pub fn open_default(name: &str) -> Self {
        let root = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kirzach-live");
        Self::new(&root, name)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_stem(path: &str) -> String {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    fn header_path(&self, path: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::entry_stem(path)))
    }

    fn body_path(&self, path: &str) -> PathBuf {
        self.dir.join(format!("{}.body", Self::entry_stem(path)))
    }
}

impl AssetCache for DiskCache {
    fn lookup(&self, path: &str) -> Result<Option<Response>, WorkerError> {
        let header = match fs::read_to_string(self.header_path(path)) {
            Ok(header) => header,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(WorkerError::Io(e.to_string())),
        };
        let header: EntryHeader = match serde_json::from_str(&header) {
            Ok(header) => header,
            Err(e) => {
                log::warn!("ignoring corrupt cache entry for {}: {}", path, e);
                return Ok(None);
            }
        };
        // Hash collision: the entry belongs to another path
        if header.path != path {
            return Ok(None);
        }

        let body = match fs::read(self.body_path(path)) {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(WorkerError::Io(e.to_string())),
        };

        Ok(Some(Response { status: header.status, content_type: header.content_type, body }))
    }

    fn put(&mut self, path: &str, response: &Response) -> Result<(), WorkerError> {
        fs::create_dir_all(&self.dir).map_err(|e| WorkerError::Io(e.to_string()))?;

        let header = EntryHeader {
            path: path.to_string(),
            status: response.status,
            content_type: response.content_type.clone(),
        };
        let header = serde_json::to_string_pretty(&header)
            .map_err(|e| WorkerError::Io(e.to_string()))?;

        // Body first so a header never points at a missing body
        fs::write(self.body_path(path), &response.body).map_err(|e| WorkerError::Io(e.to_string()))?;
        fs::write(self.header_path(path), header).map_err(|e| WorkerError::Io(e.to_string()))
    }
}
