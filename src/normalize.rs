//! Wildcard expansion for selector patterns.
//!
//! A pattern such as `users.*.email` addresses the `email` of every element
//! of `users`. [`normalize`] turns it into one concrete selector per element
//! actually present in the input, in array order.

use crate::input::InputBag;
use crate::path::is_wildcard;

/// Expands every `*` segment of a pattern against the input.
///
/// A pattern without a wildcard segment is returned unchanged, whether or not
/// it resolves. Otherwise the part before the first wildcard must resolve to
/// an array; each of its indices is substituted in turn and the rest of the
/// pattern is expanded recursively. A prefix that is absent, `null` or not an
/// array expands to nothing, and so does a pattern that starts with `*`
/// (the top level of the input is an object).
///
/// Only a segment that is exactly `*` is a wildcard: `users.*x` is a plain
/// field selector.
///
/// # Example
///
/// ```rust
/// use verdict::{normalize, InputBag};
/// use serde_json::json;
///
/// let input = InputBag::from_value(json!({
///     "teams": [
///         {"members": [{"id": 1}, {"id": 2}]},
///         {"members": []},
///         {"members": [{"id": 3}]}
///     ]
/// }))
/// .unwrap();
///
/// assert_eq!(
///     normalize("teams.*.members.*.id", &input),
///     vec!["teams.0.members.0.id", "teams.0.members.1.id", "teams.2.members.0.id"]
/// );
/// assert!(normalize("missing.*.id", &input).is_empty());
/// ```
pub fn normalize(pattern: &str, input: &InputBag) -> Vec<String> {
    let segments: Vec<&str> = pattern.split('.').collect();
    let mut expanded = Vec::new();
    expand(&segments, input, &mut expanded);
    expanded
}

fn expand(segments: &[&str], input: &InputBag, out: &mut Vec<String>) {
    let Some(position) = segments.iter().position(|s| is_wildcard(s)) else {
        out.push(segments.join("."));
        return;
    };

    if position == 0 {
        return;
    }

    let head = segments[..position].join(".");
    let len = input
        .get(&head)
        .and_then(|value| value.as_array())
        .map_or(0, Vec::len);

    let tail = &segments[position + 1..];
    for index in 0..len {
        let index = index.to_string();
        let mut concrete: Vec<&str> = Vec::with_capacity(segments.len());
        concrete.extend_from_slice(&segments[..position]);
        concrete.push(&index);
        concrete.extend_from_slice(tail);
        expand(&concrete, input, out);
    }
}
