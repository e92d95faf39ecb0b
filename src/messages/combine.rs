//! Flattening matched keys into one message sequence.

use super::store::MessageStore;
use std::collections::HashSet;

/// Concatenate the messages of `keys`, walking keys in store order.
///
/// Messages keep their append order within a key. Nothing is deduplicated
/// across keys.
pub fn combine(store: &MessageStore, keys: &HashSet<&str>) -> Vec<String> {
    store
        .iter()
        .filter(|(key, _)| keys.contains(*key))
        .flat_map(|(_, messages)| messages.iter().cloned())
        .collect()
}
