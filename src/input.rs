//! Read-only access to the data under validation.
//!
//! [`InputBag`] wraps a string-keyed JSON object and resolves dot-notation
//! selectors against it, tolerating absence at any depth.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ValidatorError;
use crate::path::{Selector, SelectorSegment, WILDCARD};
use crate::shape::non_struct_kind;

/// The input of one validation run.
///
/// Selectors are resolved segment by segment. A segment that parses as a
/// non-negative integer indexes into an array; any other segment looks up a
/// key in an object. Anything that does not line up (a missing key, an index
/// past the end, indexing a non-array, keying a non-object) resolves to
/// nothing.
///
/// An explicit `null` is reported exactly like a missing value: `get` returns
/// `None` and `has` returns `false`.
///
/// # Example
///
/// ```rust
/// use verdict::InputBag;
/// use serde_json::json;
///
/// let input = InputBag::from_value(json!({
///     "users": [{"email": "a@example.com"}, {"email": null}]
/// }))
/// .unwrap();
///
/// assert_eq!(input.get("users.0.email"), Some(&json!("a@example.com")));
/// assert!(!input.has("users.1.email"));
/// assert!(!input.has("users.2.email"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputBag {
    values: Map<String, Value>,
}

impl InputBag {
    /// Creates an input bag over the given object.
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Creates an input bag from a JSON value, if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(values) => Some(Self { values }),
            _ => None,
        }
    }

    /// Copies a JSON object into an input bag.
    ///
    /// # Errors
    ///
    /// Returns `ValidatorError::NotAnObject` for any other JSON type.
    pub fn try_from_value(value: &Value) -> Result<Self, ValidatorError> {
        match value {
            Value::Object(values) => Ok(Self {
                values: values.clone(),
            }),
            other => Err(ValidatorError::NotAnObject {
                kind: value_kind(other),
            }),
        }
    }

    /// Marshals a serializable struct into an input bag.
    ///
    /// The bag keys are the serialized field names, so serde renames apply.
    /// Only values that serialize as a named-field struct are accepted, seen
    /// through `Option`, newtype wrappers and pointers. Maps are rejected even
    /// though they would produce an object; so are structs using
    /// `#[serde(flatten)]`, which serde emits as maps. Hand those to
    /// [`InputBag::try_from_value`] after `serde_json::to_value` instead.
    ///
    /// # Errors
    ///
    /// Returns `ValidatorError::NotAStruct` for anything that is not a
    /// struct (maps, scalars, sequences, unit structs, externally tagged
    /// enums) and `ValidatorError::Serialization` if serialization fails.
    pub fn from_serializable<T>(input: &T) -> Result<Self, ValidatorError>
    where
        T: Serialize + ?Sized,
    {
        if let Some(kind) = non_struct_kind(input) {
            return Err(ValidatorError::NotAStruct { kind });
        }
        let value = serde_json::to_value(input)?;
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(ValidatorError::NotAStruct {
                kind: value_kind(&other),
            }),
        }
    }

    /// Wraps a standalone value as a single field of a new bag.
    pub fn single(key: impl Into<String>, value: Value) -> Self {
        let mut values = Map::new();
        values.insert(key.into(), value);
        Self { values }
    }

    /// Resolves a selector to its value.
    ///
    /// Returns `None` when the path is absent, broken, or ends in `null`.
    pub fn get(&self, selector: &str) -> Option<&Value> {
        if !selector.contains('.') {
            return non_null(self.values.get(selector));
        }
        self.resolve(&Selector::parse(selector))
    }

    /// Resolves an already parsed selector.
    pub fn resolve(&self, selector: &Selector) -> Option<&Value> {
        let mut segments = selector.segments();
        let mut current = match segments.next()? {
            SelectorSegment::Field(name) => self.values.get(name)?,
            other => self.values.get(&other.to_string())?,
        };

        for segment in segments {
            current = match segment {
                SelectorSegment::Index(idx) => current.as_array()?.get(*idx)?,
                SelectorSegment::Field(name) => current.as_object()?.get(name)?,
                SelectorSegment::Wildcard => current.as_object()?.get(WILDCARD)?,
            };
        }

        non_null(Some(current))
    }

    /// Returns true if the selector resolves to a non-null value.
    pub fn has(&self, selector: &str) -> bool {
        self.get(selector).is_some()
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the bag has no top-level keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the underlying object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consumes the bag, returning the underlying object.
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for InputBag {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Returns a short name for the JSON type of a value.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
