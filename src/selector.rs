//! Selector parsing.
//!
//! A selector names a subset of the stored messages:
//!
//! - `error`: every key containing `error`
//! - `error.email`: the `error` keys narrowed to those containing `email`
//! - `.email`: keys of any type containing `email`
//! - `error!email`: the `error` keys that do not contain `email`
//! - `!email`: every key that does not contain `email`
//!
//! Only the first separator is significant. `a.b.c` parses to type `a` and
//! namespace `b.c`, and `a.b!c` is a positive selector with namespace `b!c`.
//! Older selector parsers kept only the segment between the first two
//! separators as the namespace and negated whenever a `!` appeared anywhere;
//! this parser does neither.

use std::fmt;

/// Separates a type from its namespace, both in keys and in selectors.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Separates a type from an excluded namespace in selectors.
pub const NEGATION_SEPARATOR: char = '!';

/// A parsed selector.
///
/// An empty `message_type` matches every type. A `None` namespace applies no
/// namespace filter at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selector {
    pub message_type: String,
    pub namespace: Option<String>,
    pub negate: bool,
}

impl Selector {
    /// Selector matching every stored message.
    pub fn all() -> Self {
        Self::default()
    }

    /// Decode an optional selector string. `None` selects everything.
    pub fn parse(selector: Option<&str>) -> Self {
        match selector {
            Some(selector) => Self::parse_str(selector),
            None => Self::all(),
        }
    }

    fn parse_str(selector: &str) -> Self {
        let selector = selector.to_lowercase();

        let separator = selector.find(|c: char| c == NAMESPACE_SEPARATOR || c == NEGATION_SEPARATOR);
        match separator {
            Some(idx) => Self {
                message_type: selector[..idx].to_string(),
                // Both separators are single-byte.
                namespace: Some(selector[idx + 1..].to_string()),
                negate: selector[idx..].starts_with(NEGATION_SEPARATOR),
            },
            None => Self {
                message_type: selector,
                namespace: None,
                negate: false,
            },
        }
    }

    /// Every message whose key contains `message_type`.
    pub fn of_type(message_type: &str) -> Self {
        Self {
            message_type: message_type.to_lowercase(),
            namespace: None,
            negate: false,
        }
    }

    /// Messages of `message_type` narrowed to `namespace`.
    pub fn namespaced(message_type: &str, namespace: &str) -> Self {
        Self {
            message_type: message_type.to_lowercase(),
            namespace: Some(namespace.to_lowercase()),
            negate: false,
        }
    }

    /// Messages of `message_type` outside of `namespace`.
    pub fn excluding(message_type: &str, namespace: &str) -> Self {
        Self {
            message_type: message_type.to_lowercase(),
            namespace: Some(namespace.to_lowercase()),
            negate: true,
        }
    }

    /// True if this selector applies no filter.
    pub fn is_all(&self) -> bool {
        self.message_type.is_empty() && self.namespace.is_none()
    }
}

impl From<&str> for Selector {
    fn from(selector: &str) -> Self {
        Self::parse_str(selector)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message_type)?;
        if let Some(ref namespace) = self.namespace {
            let separator = if self.negate {
                NEGATION_SEPARATOR
            } else {
                NAMESPACE_SEPARATOR
            };
            write!(f, "{}{}", separator, namespace)?;
        }
        Ok(())
    }
}

/// Build a selector string from a type and an optional argument.
///
/// An argument that already starts with a separator is appended as-is, so
/// `("error", "!email")` gives `error!email`. Any other argument is taken as
/// a namespace: `("error", "email")` gives `error.email`.
pub fn compose(message_type: &str, arg: Option<&str>) -> String {
    match arg {
        None => message_type.to_string(),
        Some(arg) if arg.starts_with(NAMESPACE_SEPARATOR) || arg.starts_with(NEGATION_SEPARATOR) => {
            format!("{}{}", message_type, arg)
        }
        Some(arg) => format!("{}{}{}", message_type, NAMESPACE_SEPARATOR, arg),
    }
}
