//! Session services that carry flashed feedback between requests.
//!
//! The facade only needs a small key/blob contract plus an "is a session
//! active" check. Two implementations are provided:
//!
//! - [`MemorySession`]: in-process map, useful for tests and single-process apps
//! - [`FileSession`]: directory-backed, one file per key, locked while open
//!
//! # Example
//!
//! ```ignore
//! let session = MemorySession::new();
//!
//! let mut feedback = Feedback::new(&session);
//! feedback.set("error.email", "Invalid address");
//! feedback.flash()?;
//!
//! // Next request
//! let mut feedback = Feedback::new(&session);
//! feedback.restore(true)?;
//! ```

mod file;
mod frame;
mod memory;

pub use file::{FileSession, FileSessionConfig};
pub use memory::MemorySession;

use crate::error::Result;
use std::sync::Arc;

/// Key/blob storage scoped to one user session.
///
/// All calls are synchronous and may fail with I/O errors.
pub trait SessionService {
    /// Whether a session is currently active.
    fn is_active(&self) -> bool;

    /// Check whether a value is stored under `key`.
    fn has(&self, key: &str) -> Result<bool>;

    /// Fetch the value under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: SessionService + ?Sized> SessionService for &T {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn has(&self, key: &str) -> Result<bool> {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: SessionService + ?Sized> SessionService for Arc<T> {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn has(&self, key: &str) -> Result<bool> {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
