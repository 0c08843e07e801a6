//! Dot-notation selectors for locating values in nested input.
//!
//! This module provides [`Selector`] and [`SelectorSegment`] for parsing
//! selectors such as `users.0.email` or `users.*.email`.

use std::fmt::{self, Display};

/// The raw text of a wildcard segment.
pub(crate) const WILDCARD: &str = "*";

/// Returns true if a raw selector segment is a wildcard.
///
/// Only a segment that is exactly `*` qualifies: `*x` is a field name.
pub(crate) fn is_wildcard(raw: &str) -> bool {
    raw == WILDCARD
}

/// A segment of a selector.
///
/// Segments are classified once, when the selector is parsed: a segment made
/// only of ASCII digits is an index, the literal `*` is a wildcard, and
/// everything else is a field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorSegment {
    /// A mapping key (e.g. `user`, `email`)
    Field(String),
    /// A sequence index (e.g. `0`, `42`)
    Index(usize),
    /// Every index of the sequence at this position (`*`)
    Wildcard,
}

impl SelectorSegment {
    /// Classifies a single raw segment.
    pub fn parse(raw: &str) -> Self {
        if is_wildcard(raw) {
            return SelectorSegment::Wildcard;
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(idx) = raw.parse::<usize>() {
                return SelectorSegment::Index(idx);
            }
        }
        SelectorSegment::Field(raw.to_string())
    }

    /// Returns true for the `*` segment.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, SelectorSegment::Wildcard)
    }
}

impl Display for SelectorSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorSegment::Field(name) => write!(f, "{}", name),
            SelectorSegment::Index(idx) => write!(f, "{}", idx),
            SelectorSegment::Wildcard => write!(f, "{}", WILDCARD),
        }
    }
}

/// A parsed selector addressing a value inside nested input.
///
/// `Selector` keeps the segments of a dot-separated selector string and
/// renders them back in the same notation, so `users.0.email` round-trips.
///
/// # Example
///
/// ```rust
/// use verdict::{Selector, SelectorSegment};
///
/// let selector = Selector::parse("users.0.email");
/// let segments: Vec<_> = selector.segments().cloned().collect();
///
/// assert_eq!(
///     segments,
///     vec![
///         SelectorSegment::Field("users".to_string()),
///         SelectorSegment::Index(0),
///         SelectorSegment::Field("email".to_string()),
///     ]
/// );
/// assert_eq!(selector.to_string(), "users.0.email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    segments: Vec<SelectorSegment>,
}

impl Selector {
    /// Parses a dot-separated selector.
    ///
    /// Every dot-separated part becomes a segment, including empty ones, so
    /// the result always has at least one segment.
    pub fn parse(selector: &str) -> Self {
        Self {
            segments: selector.split('.').map(SelectorSegment::parse).collect(),
        }
    }

    /// Returns true if any segment is a wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(SelectorSegment::is_wildcard)
    }

    /// Returns an iterator over the segments.
    pub fn segments(&self) -> impl Iterator<Item = &SelectorSegment> {
        self.segments.iter()
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<&str> for Selector {
    fn from(selector: &str) -> Self {
        Selector::parse(selector)
    }
}
