//! Selector-keyed collection of validation failures.
//!
//! This module provides [`ErrorBag`], an insertion-ordered multimap from
//! selector to the messages recorded for it.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use stillwater::prelude::*;

/// Validation failures grouped by the selector they were recorded for.
///
/// Keys keep the order in which their first failure was recorded, and each
/// message list keeps append order. A selector with no key simply had no
/// failure recorded; it was not necessarily evaluated.
///
/// # Combining Bags
///
/// `ErrorBag` implements `Semigroup`. Combining appends the messages of
/// shared keys and keeps the left bag's key order:
///
/// ```rust
/// use verdict::ErrorBag;
/// use stillwater::prelude::*;
///
/// let mut left = ErrorBag::new();
/// left.add("email", "The field email is required.");
///
/// let mut right = ErrorBag::new();
/// right.add("email", "The field email must be a valid email.");
/// right.add("name", "The field name is required.");
///
/// let combined = left.combine(right);
/// assert_eq!(combined.len(), 2);
/// assert_eq!(combined.get("email").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorBag(IndexMap<String, Vec<String>>);

impl ErrorBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for the given selector.
    pub fn add(&mut self, selector: impl Into<String>, message: impl Into<String>) {
        self.0
            .entry(selector.into())
            .or_default()
            .push(message.into());
    }

    /// Records several messages for the given selector, in order.
    pub fn add_all<I, S>(&mut self, selector: impl Into<String>, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(selector.into())
            .or_default()
            .extend(messages.into_iter().map(Into::into));
    }

    /// Returns true if no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of selectors with recorded failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the total number of messages across all selectors.
    pub fn message_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Returns true if at least one message is recorded for the selector.
    pub fn has(&self, selector: &str) -> bool {
        self.0.get(selector).is_some_and(|msgs| !msgs.is_empty())
    }

    /// Returns the first message recorded for the selector.
    pub fn first_of(&self, selector: &str) -> Option<&str> {
        self.0
            .get(selector)
            .and_then(|msgs| msgs.first())
            .map(String::as_str)
    }

    /// Returns all messages recorded for the selector.
    pub fn get(&self, selector: &str) -> Option<&[String]> {
        self.0.get(selector).map(Vec::as_slice)
    }

    /// Returns the whole selector-to-messages map.
    pub fn all(&self) -> &IndexMap<String, Vec<String>> {
        &self.0
    }

    /// Returns an iterator over selectors and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns the selectors with recorded failures, in order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Appends every message of `other` into this bag without consuming it.
    pub fn merge(&mut self, other: &ErrorBag) {
        for (selector, messages) in &other.0 {
            self.add_all(selector.clone(), messages.iter().cloned());
        }
    }

    /// Returns a copy with every key re-keyed as `"<prefix>.<key>"`.
    ///
    /// List entry points use this to tag each element's failures with the
    /// element index.
    pub fn prefixed(&self, prefix: impl Display) -> ErrorBag {
        ErrorBag(
            self.0
                .iter()
                .map(|(k, v)| (format!("{}.{}", prefix, k), v.clone()))
                .collect(),
        )
    }

    /// Consumes the bag, returning the underlying map.
    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.0
    }
}

impl Semigroup for ErrorBag {
    fn combine(mut self, other: Self) -> Self {
        for (selector, messages) in other.0 {
            self.add_all(selector, messages);
        }
        self
    }
}

impl Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed for {} field(s):", self.len())?;
        for (selector, messages) in &self.0 {
            for message in messages {
                writeln!(f, "  {}: {}", selector, message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ErrorBag {}

impl From<IndexMap<String, Vec<String>>> for ErrorBag {
    fn from(map: IndexMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl IntoIterator for ErrorBag {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// Reports are handed across threads by callers.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ErrorBag>();
    assert_sync::<ErrorBag>();
};
