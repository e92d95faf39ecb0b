//! Ordered key to message-list storage.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All messages stored under one key, in append order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageGroup {
    pub key: String,
    pub messages: Vec<String>,
}

/// Mapping from lowercase key (`type` or `type.namespace`) to messages.
///
/// Keys are kept in the order they were first written to. A key only exists
/// once at least one message has been appended under it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageStore {
    /// Keys in first-append order.
    keys: Vec<String>,

    /// Messages by key.
    messages: HashMap<String, Vec<String>>,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from groups, keeping their order.
    ///
    /// Keys are lowercased and groups that collapse onto the same key are
    /// appended in order. Empty groups create no key.
    pub fn from_groups(groups: impl IntoIterator<Item = MessageGroup>) -> Self {
        let mut store = Self::new();
        for group in groups {
            for message in group.messages {
                store.set(&group.key, message);
            }
        }
        store
    }

    /// Append a message under `key`. No deduplication is done.
    pub fn set(&mut self, key: &str, message: impl Into<String>) {
        let key = key.to_lowercase();
        match self.messages.get_mut(&key) {
            Some(list) => list.push(message.into()),
            None => {
                self.keys.push(key.clone());
                self.messages.insert(key, vec![message.into()]);
            }
        }
    }

    /// Messages stored under exactly `key`.
    pub fn messages(&self, key: &str) -> Option<&[String]> {
        self.messages.get(&key.to_lowercase()).map(Vec::as_slice)
    }

    /// Keys in store order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// `(key, messages)` pairs in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.keys.iter().filter_map(move |key| {
            self.messages
                .get(key)
                .map(|messages| (key.as_str(), messages.as_slice()))
        })
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Number of messages across all keys.
    pub fn message_count(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drop every key and message.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.messages.clear();
    }

    /// Snapshot the store as ordered groups.
    pub fn to_groups(&self) -> Vec<MessageGroup> {
        self.iter()
            .map(|(key, messages)| MessageGroup {
                key: key.to_string(),
                messages: messages.to_vec(),
            })
            .collect()
    }
}
