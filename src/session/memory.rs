//! In-memory session service.

use super::SessionService;
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Session values held in process memory.
///
/// Closing the session only flips the active flag. Stored values stay put,
/// so a closed-then-started session behaves like the next request of the
/// same user.
pub struct MemorySession {
    values: RwLock<HashMap<String, Vec<u8>>>,
    active: AtomicBool,
}

impl MemorySession {
    /// Create an active, empty session.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            active: AtomicBool::new(true),
        }
    }

    /// Create an empty session that has not been started.
    pub fn inactive() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            active: AtomicBool::new(false),
        }
    }

    pub fn start(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionService for MemorySession {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.values.read().contains_key(key))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let session = MemorySession::new();
        assert!(!session.has("feedback").unwrap());

        session.set("feedback", b"blob".to_vec()).unwrap();
        assert!(session.has("feedback").unwrap());
        assert_eq!(session.get("feedback").unwrap().unwrap(), b"blob");

        session.remove("feedback").unwrap();
        assert!(session.get("feedback").unwrap().is_none());
        assert!(session.is_empty());
    }

    #[test]
    fn test_remove_missing_key() {
        let session = MemorySession::new();
        session.remove("missing").unwrap();
    }

    #[test]
    fn test_lifecycle() {
        let session = MemorySession::inactive();
        assert!(!session.is_active());

        session.start();
        assert!(session.is_active());
        session.set("k", vec![1]).unwrap();

        session.close();
        assert!(!session.is_active());
        // Values outlive the active flag.
        assert_eq!(session.len(), 1);
    }
}
