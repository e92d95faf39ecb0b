//! Message storage and selector evaluation.
//!
//! Reading messages is a three-step pipeline:
//! - [`Selector::parse`](crate::Selector::parse) decodes the selector string
//! - [`match_keys`] picks the keys the selector covers
//! - [`combine`] flattens those keys' messages in store order

mod combine;
mod matcher;
mod store;

pub use combine::combine;
pub use matcher::{match_keys, NamespaceWildcard, WILDCARD_NAMESPACE};
pub use store::{MessageGroup, MessageStore};

use crate::selector::Selector;

/// Run a selector against a store, returning the matching messages in order.
pub fn select(store: &MessageStore, selector: &Selector, wildcard: NamespaceWildcard) -> Vec<String> {
    let keys = match_keys(store, selector, wildcard);
    combine(store, &keys)
}
