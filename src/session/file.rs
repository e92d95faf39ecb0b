//! Directory-backed session service.

use super::{frame, SessionService};
use crate::error::{FeedbackError, Result};
use fs2::FileExt;
use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lock file guarding the session directory.
const LOCK_FILE: &str = "LOCK";

/// File session configuration.
#[derive(Clone, Debug)]
pub struct FileSessionConfig {
    /// Directory holding this session's values.
    pub path: PathBuf,

    /// Read cache size (number of values).
    pub cache_size: usize,

    /// Whether to create the directory if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./session"),
            cache_size: 64,
            create_if_missing: true,
        }
    }
}

/// Session stored as one file per key under a directory.
///
/// Files are named by the hex SHA-256 of their key and sharded by the first
/// hash byte. The directory is locked exclusively while the session is
/// active; [`close`](FileSession::close) releases it, after which every
/// operation fails with [`FeedbackError::SessionInactive`].
pub struct FileSession {
    /// Base directory.
    path: PathBuf,

    /// Lock file, present while the session is active.
    lock_file: Mutex<Option<File>>,

    /// LRU cache for recently read values.
    cache: Mutex<LruCache<String, Vec<u8>>>,
}

impl FileSession {
    /// Open (and lock) a session directory.
    pub fn open(config: FileSessionConfig) -> Result<Self> {
        if !config.path.exists() {
            if !config.create_if_missing {
                return Err(FeedbackError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("session directory not found: {}", config.path.display()),
                )));
            }
            fs::create_dir_all(&config.path)?;
        }

        let lock_file = Self::acquire_lock(&config.path)?;
        let cache_size = NonZeroUsize::new(config.cache_size).unwrap_or(NonZeroUsize::MIN);

        debug!(path = %config.path.display(), "file session opened");

        Ok(Self {
            path: config.path,
            lock_file: Mutex::new(Some(lock_file)),
            cache: Mutex::new(LruCache::new(cache_size)),
        })
    }

    /// Release the directory lock and end the session.
    pub fn close(&self) {
        if self.lock_file.lock().take().is_some() {
            self.cache.lock().clear();
            debug!(path = %self.path.display(), "file session closed");
        }
    }

    /// Base directory of this session.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_file = File::create(path.join(LOCK_FILE))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| FeedbackError::Locked)?;

        Ok(lock_file)
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(FeedbackError::SessionInactive)
        }
    }

    /// Full path for the file holding `key`.
    fn value_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let name = hex::encode(digest);
        self.path.join(&name[..2]).join(name)
    }

    fn write_value(&self, key: &str, value: &[u8]) -> Result<()> {
        let value_path = self.value_path(key);
        if let Some(shard_dir) = value_path.parent() {
            fs::create_dir_all(shard_dir)?;
        }

        let bytes = frame::encode(key, value)?;

        // Replace by rename so readers never see a partial frame.
        let tmp_path = value_path.with_extension("tmp");
        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &value_path)?;

        Ok(())
    }

    fn read_value(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value_path = self.value_path(key);
        if !value_path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&value_path)?;
        frame::decode(key, &bytes).map(Some)
    }
}

impl SessionService for FileSession {
    fn is_active(&self) -> bool {
        self.lock_file.lock().is_some()
    }

    fn has(&self, key: &str) -> Result<bool> {
        self.ensure_active()?;
        if self.cache.lock().contains(key) {
            return Ok(true);
        }
        Ok(self.value_path(key).exists())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_active()?;

        // Check cache first
        if let Some(cached) = self.cache.lock().get(key).cloned() {
            return Ok(Some(cached));
        }

        let value = self.read_value(key)?;
        if let Some(ref value) = value {
            self.cache.lock().put(key.to_string(), value.clone());
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.ensure_active()?;

        self.write_value(key, &value)?;
        debug!(key, bytes = value.len(), "session value written");

        self.cache.lock().put(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.ensure_active()?;

        self.cache.lock().pop(key);

        let value_path = self.value_path(key);
        if value_path.exists() {
            fs::remove_file(&value_path)?;
            debug!(key, "session value removed");
        }
        Ok(())
    }
}
