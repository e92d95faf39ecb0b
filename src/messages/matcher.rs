//! Selector to key matching.
//!
//! Type and namespace are matched by substring, not equality. A selector
//! type `error` covers the key `errors`, and `err` covers `error.email`.
//! Callers relying on distinct type names should pick names that are not
//! substrings of each other.

use super::store::MessageStore;
use crate::selector::{Selector, NAMESPACE_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Namespace that may act as a wildcard, see [`NamespaceWildcard`].
pub const WILDCARD_NAMESPACE: &str = "*";

/// How a `*` namespace is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceWildcard {
    /// `*` is matched as a plain substring like any other namespace.
    #[default]
    Disabled,

    /// A positive selector with namespace `*` (`error.*`, `.*`) matches every
    /// key that has a namespace. Negated selectors still treat `*` literally.
    AnyNamespace,
}

/// Compute the keys of `store` covered by `selector`.
pub fn match_keys<'a>(
    store: &'a MessageStore,
    selector: &Selector,
    wildcard: NamespaceWildcard,
) -> HashSet<&'a str> {
    let message_type = selector.message_type.as_str();
    let candidates: HashSet<&str> = store
        .keys()
        .filter(|key| message_type.is_empty() || key.contains(message_type))
        .collect();

    let namespace = match selector.namespace {
        Some(ref namespace) => namespace.as_str(),
        None => return candidates,
    };

    let any_namespace = !selector.negate
        && wildcard == NamespaceWildcard::AnyNamespace
        && namespace == WILDCARD_NAMESPACE;

    let of_namespace: HashSet<&str> = candidates
        .iter()
        .copied()
        .filter(|key| (any_namespace && key.contains(NAMESPACE_SEPARATOR)) || key.contains(namespace))
        .collect();

    if selector.negate {
        candidates.difference(&of_namespace).copied().collect()
    } else {
        of_namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> MessageStore {
        let mut store = MessageStore::new();
        store.set("error", "A");
        store.set("error.email", "B");
        store.set("warning.email", "C");
        store
    }

    fn matched(store: &MessageStore, selector: &str) -> Vec<String> {
        let mut keys: Vec<String> = match_keys(store, &Selector::from(selector), NamespaceWildcard::Disabled)
            .into_iter()
            .map(str::to_string)
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_match_all() {
        let store = sample_store();
        let keys = match_keys(&store, &Selector::all(), NamespaceWildcard::Disabled);
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_match_type() {
        let store = sample_store();
        assert_eq!(matched(&store, "error"), vec!["error", "error.email"]);
        assert_eq!(matched(&store, "warning"), vec!["warning.email"]);
    }

    #[test]
    fn test_match_namespace_any_type() {
        let store = sample_store();
        assert_eq!(matched(&store, ".email"), vec!["error.email", "warning.email"]);
    }

    #[test]
    fn test_match_type_and_namespace() {
        let store = sample_store();
        assert_eq!(matched(&store, "error.email"), vec!["error.email"]);
    }

    #[test]
    fn test_match_negated() {
        let store = sample_store();
        assert_eq!(matched(&store, "error!email"), vec!["error"]);
        assert_eq!(matched(&store, "!email"), vec!["error"]);
        assert!(matched(&store, "warning!email").is_empty());
    }

    #[test]
    fn test_substring_type_match() {
        let mut store = MessageStore::new();
        store.set("errors", "plural");
        store.set("error", "singular");

        assert_eq!(matched(&store, "error"), vec!["error", "errors"]);
        assert_eq!(matched(&store, "err"), vec!["error", "errors"]);
    }

    #[test]
    fn test_namespace_matches_anywhere_in_key() {
        // The namespace is a substring of the whole key, type included.
        let mut store = MessageStore::new();
        store.set("email", "type named email");
        store.set("error.email", "B");

        assert_eq!(matched(&store, ".email"), vec!["email", "error.email"]);
    }

    #[test]
    fn test_no_match() {
        let store = sample_store();
        assert!(matched(&store, "notice").is_empty());
        assert!(matched(&store, "error.phone").is_empty());
    }

    #[test]
    fn test_wildcard_disabled_by_default() {
        assert_eq!(NamespaceWildcard::default(), NamespaceWildcard::Disabled);
    }

    #[test]
    fn test_wildcard_disabled_is_literal() {
        let store = sample_store();
        assert!(matched(&store, "error.*").is_empty());
    }

    #[test]
    fn test_wildcard_any_namespace() {
        let store = sample_store();
        let keys = match_keys(&store, &Selector::from("error.*"), NamespaceWildcard::AnyNamespace);
        assert_eq!(keys, ["error.email"].into_iter().collect::<HashSet<_>>());

        let keys = match_keys(&store, &Selector::from(".*"), NamespaceWildcard::AnyNamespace);
        assert_eq!(keys, ["error.email", "warning.email"].into_iter().collect::<HashSet<_>>());
    }

    #[test]
    fn test_wildcard_ignored_when_negated() {
        let store = sample_store();
        let keys = match_keys(&store, &Selector::from("error!*"), NamespaceWildcard::AnyNamespace);
        assert_eq!(keys, ["error", "error.email"].into_iter().collect::<HashSet<_>>());
    }
}
