//! File-backed key/value session store.
//!
//! Values are strings, most of them JSON. Every write replaces the whole
//! value and persists the whole file; there is no merge, versioning or
//! cross-process locking. Writers in one process are serialised on the file.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::session::keys::SessionKey;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// A thread-safe string store, optionally persisted to a JSON file.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, String>>,
    persistence_path: Option<PathBuf>,
    /// Held from snapshot to rename so clones never share a half-written temp file.
    file_lock: Arc<Mutex<()>>,
}

impl SessionStore {
    /// Create an empty store. With `None` nothing is written to disk.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
            file_lock: Arc::new(Mutex::new(())),
        }
    }

    /// In-memory store.
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// Open `path`, loading it if it exists.
    pub fn open(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref();
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let map: BTreeMap<String, String> = serde_json::from_reader(reader)?;
            for (k, v) in map {
                store.inner.insert(k, v);
            }
            tracing::debug!(path = %path.display(), keys = store.inner.len(), "Loaded session");
        }
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.persistence_path.as_deref()
    }

    /// Write the whole store to its file, via a temporary file and rename.
    pub fn save(&self) -> SessionResult<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };
        let _guard = self.file_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let map: BTreeMap<String, String> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        let tmp = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, &map)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        tracing::trace!(path = %path.display(), keys = map.len(), "Saved session");
        Ok(())
    }

    pub fn get_raw(&self, key: SessionKey) -> Option<String> {
        self.inner.get(key.as_str()).map(|r| r.value().clone())
    }

    /// Store `value` verbatim and persist.
    pub fn set_raw(&self, key: SessionKey, value: impl Into<String>) -> SessionResult<()> {
        self.inner.insert(key.as_str().to_string(), value.into());
        self.save()
    }

    pub fn contains(&self, key: SessionKey) -> bool {
        self.inner.contains_key(key.as_str())
    }

    /// Remove `keys` and persist once.
    pub fn remove(&self, keys: &[SessionKey]) -> SessionResult<()> {
        for key in keys {
            self.inner.remove(key.as_str());
        }
        self.save()
    }

    pub fn clear(&self) -> SessionResult<()> {
        self.inner.clear();
        self.save()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Decode a JSON value; missing, null or corrupt entries read as `None`.
    pub fn read<T: DeserializeOwned>(&self, key: SessionKey) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring unreadable session value");
                None
            }
        }
    }

    /// Decode a JSON value, falling back to `T::default()`.
    pub fn read_or_default<T: DeserializeOwned + Default>(&self, key: SessionKey) -> T {
        self.read(key).unwrap_or_default()
    }

    /// Encode `value` as JSON, replace the entry and persist.
    pub fn write<T: Serialize + ?Sized>(&self, key: SessionKey, value: &T) -> SessionResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, raw)
    }

    /// Snapshot of all entries, sorted by key.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("path", &self.persistence_path)
            .field("keys", &self.inner.len())
            .finish()
    }
}
