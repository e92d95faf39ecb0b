//! # Feedback
//!
//! Request-scoped user feedback (errors, warnings, notices) classified by
//! type and optional namespace, queried with compact selectors and flashed
//! through a session into the next request.
//!
//! ## Core Concepts
//!
//! - **Keys**: lowercase `type` or `type.namespace`, each holding messages in append order
//! - **Selectors**: `type`, `type.namespace`, `.namespace`, `type!namespace`, `!namespace`
//! - **Flash**: the whole store serialized into one session value and restored later
//!
//! ## Example
//!
//! ```ignore
//! use feedback::{Feedback, MemorySession};
//!
//! let session = MemorySession::new();
//! let mut feedback = Feedback::new(&session);
//!
//! feedback.set("error", "Could not save");
//! feedback.set("error.email", "Invalid address");
//! feedback.set("warning.email", "Address unverified");
//!
//! assert_eq!(feedback.get(Some(".email")).len(), 2);
//! assert!(feedback.has(Some("error!email")));
//!
//! // Redirect: carry everything into the next request
//! feedback.flash()?;
//! ```

pub mod error;
pub mod feedback;
pub mod flash;
pub mod messages;
pub mod selector;
pub mod session;

// Re-exports
pub use error::{FeedbackError, Result};
pub use feedback::{
    Feedback, FeedbackConfig, MessageSource, DEFAULT_IMPORT_TYPE, DEFAULT_SESSION_KEY,
};
pub use messages::{
    combine, match_keys, MessageGroup, MessageStore, NamespaceWildcard, WILDCARD_NAMESPACE,
};
pub use selector::{compose, Selector};
pub use session::{FileSession, FileSessionConfig, MemorySession, SessionService};
