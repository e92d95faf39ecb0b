//! The feedback facade tying the store, selectors and session together.

use crate::error::{FeedbackError, Result};
use crate::flash;
use crate::messages::{self, MessageStore, NamespaceWildcard};
use crate::selector::{Selector, NAMESPACE_SEPARATOR};
use crate::session::SessionService;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Session key flashed messages are stored under by default.
pub const DEFAULT_SESSION_KEY: &str = "feedback";

/// Type given to imported messages unless another is requested.
pub const DEFAULT_IMPORT_TYPE: &str = "error";

/// Feedback configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Session key the flashed store is written to.
    pub session_key: String,

    /// Interpretation of a `*` namespace in selectors.
    pub namespace_wildcard: NamespaceWildcard,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            namespace_wildcard: NamespaceWildcard::default(),
        }
    }
}

impl FeedbackConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_key.is_empty() {
            return Err(FeedbackError::InvalidConfig(
                "session_key must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Anything that can hand over an ordered list of messages for import,
/// such as the validation failures of a model.
pub trait MessageSource {
    fn messages(&self) -> Vec<String>;
}

impl<T: AsRef<str>> MessageSource for [T] {
    fn messages(&self) -> Vec<String> {
        self.iter().map(|message| message.as_ref().to_string()).collect()
    }
}

impl<T: AsRef<str>> MessageSource for Vec<T> {
    fn messages(&self) -> Vec<String> {
        self.as_slice().messages()
    }
}

/// Request-scoped feedback messages.
///
/// Create one per unit of work. Messages are written with [`set`](Self::set)
/// under a `type[.namespace]` key and read back with selectors; see
/// [`selector`](crate::selector) for the syntax. [`flash`](Self::flash)
/// hands the whole store to the session so the next request can
/// [`restore`](Self::restore) it.
///
/// # Example
///
/// ```ignore
/// let session = MemorySession::new();
/// let mut feedback = Feedback::new(&session);
///
/// feedback.set("error", "Something went wrong");
/// feedback.set_namespaced("error", "email", "Invalid address");
///
/// assert_eq!(feedback.get(Some("error.email")), vec!["Invalid address"]);
/// assert_eq!(feedback.get(Some("error!email")), vec!["Something went wrong"]);
/// ```
pub struct Feedback<S> {
    config: FeedbackConfig,
    store: MessageStore,
    session: S,
}

impl<S: SessionService> Feedback<S> {
    /// Create an empty feedback store with the default configuration.
    pub fn new(session: S) -> Self {
        Self {
            config: FeedbackConfig::default(),
            store: MessageStore::new(),
            session,
        }
    }

    /// Create an empty feedback store with a custom configuration.
    pub fn with_config(session: S, config: FeedbackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: MessageStore::new(),
            session,
        })
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    // --- Writing ---

    /// Append a message under `key`, which is `type` or `type.namespace`.
    pub fn set(&mut self, key: &str, message: impl Into<String>) {
        let message = message.into();
        trace!(key, message = %message, "feedback message set");
        self.store.set(key, message);
    }

    /// Append a message under `message_type.namespace`.
    pub fn set_namespaced(&mut self, message_type: &str, namespace: &str, message: impl Into<String>) {
        let key = format!("{}{}{}", message_type, NAMESPACE_SEPARATOR, namespace);
        self.set(&key, message);
    }

    /// Import every message of `source` as an `error`.
    pub fn import_messages<M: MessageSource + ?Sized>(&mut self, source: &M) -> usize {
        self.import_messages_as(source, DEFAULT_IMPORT_TYPE)
    }

    /// Import every message of `source` under `key`. Returns how many
    /// messages were imported.
    pub fn import_messages_as<M: MessageSource + ?Sized>(&mut self, source: &M, key: &str) -> usize {
        let messages = source.messages();
        let count = messages.len();
        for message in messages {
            self.set(key, message);
        }
        debug!(key, count, "feedback messages imported");
        count
    }

    /// Drop every stored message.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    // --- Reading ---

    /// Messages matching `selector` in store order. `None` returns everything.
    pub fn get(&self, selector: Option<&str>) -> Vec<String> {
        self.get_selector(&Selector::parse(selector))
    }

    /// Messages matching an already parsed selector.
    pub fn get_selector(&self, selector: &Selector) -> Vec<String> {
        messages::select(&self.store, selector, self.config.namespace_wildcard)
    }

    /// Messages of `message_type` within `namespace`.
    pub fn get_namespaced(&self, message_type: &str, namespace: &str) -> Vec<String> {
        self.get_selector(&Selector::namespaced(message_type, namespace))
    }

    /// Messages of `message_type` outside of `namespace`.
    pub fn get_excluding(&self, message_type: &str, namespace: &str) -> Vec<String> {
        self.get_selector(&Selector::excluding(message_type, namespace))
    }

    /// Whether any message matches `selector`.
    pub fn has(&self, selector: Option<&str>) -> bool {
        self.has_selector(&Selector::parse(selector))
    }

    pub fn has_selector(&self, selector: &Selector) -> bool {
        !messages::match_keys(&self.store, selector, self.config.namespace_wildcard).is_empty()
    }

    /// Number of messages matching `selector`.
    pub fn count(&self, selector: Option<&str>) -> usize {
        let selector = Selector::parse(selector);
        let keys = messages::match_keys(&self.store, &selector, self.config.namespace_wildcard);
        self.store
            .iter()
            .filter(|(key, _)| keys.contains(*key))
            .map(|(_, messages)| messages.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Stored keys in store order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.store.keys()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn into_store(self) -> MessageStore {
        self.store
    }

    // --- Flashing ---

    /// Write the whole store to the session for the next request.
    ///
    /// Fails with [`FeedbackError::SessionInactive`] when no session is
    /// active. The in-memory store is never modified.
    pub fn flash(&self) -> Result<()> {
        if !self.session.is_active() {
            return Err(FeedbackError::SessionInactive);
        }

        let blob = flash::encode(&self.store)?;
        debug!(
            session_key = %self.config.session_key,
            keys = self.store.len(),
            messages = self.store.message_count(),
            bytes = blob.len(),
            "feedback flashed"
        );
        self.session.set(&self.config.session_key, blob)
    }

    /// Replace the store with the flashed one, if the session holds one.
    ///
    /// Returns whether a flashed store was found. With `flush`, the session
    /// key is removed afterwards. A corrupt blob fails with
    /// [`FeedbackError::Deserialization`] before anything is changed: the
    /// in-memory store is untouched and the blob stays in the session.
    pub fn restore(&mut self, flush: bool) -> Result<bool> {
        let key = self.config.session_key.as_str();

        let restored = if self.session.has(key)? {
            match self.session.get(key)? {
                Some(blob) => {
                    let store = flash::decode(&blob).map_err(|e| {
                        warn!(session_key = key, error = %e, "flashed feedback rejected");
                        e
                    })?;
                    debug!(
                        session_key = key,
                        keys = store.len(),
                        messages = store.message_count(),
                        "feedback restored"
                    );
                    self.store = store;
                    true
                }
                None => false,
            }
        } else {
            false
        };

        if flush {
            self.session.remove(key)?;
        }

        Ok(restored)
    }

    /// Whether the session currently holds flashed feedback.
    pub fn has_flashed(&self) -> Result<bool> {
        self.session.has(&self.config.session_key)
    }
}
