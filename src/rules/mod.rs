//! Built-in rules.
//!
//! Every rule here is a small struct embedding
//! [`Messages`](crate::translation::Messages) plus whatever its
//! token parameters configure. Rules are grouped by concern:
//!
//! - [`presence`]: `required` and its conditional variants, `notEmpty`
//! - [`types`]: `string`, `integer`, `numeric`, `boolean`, `array`
//! - [`size`]: value-or-length comparisons (`between`, `gt`, `maxLength`, ...)
//! - [`text`]: character classes, patterns and well-known formats
//! - [`digits`]: digit-count rules
//! - [`compare`]: membership and cross-field equality
//! - [`datetime`]: date/time parsing and ordering
//!
//! [`register_defaults`] installs all of them under their token names.

use serde_json::Value;

use crate::registry::RuleRegistry;

macro_rules! translatable {
    () => {
        fn as_translatable_mut(
            &mut self,
        ) -> Option<&mut dyn $crate::translation::TranslatableRule> {
            Some(&mut self.messages)
        }
    };
}

macro_rules! with_params {
    () => {
        fn as_params_mut(&mut self) -> Option<&mut dyn $crate::rule::RuleWithParams> {
            Some(self)
        }
    };
}

pub mod compare;
pub mod datetime;
pub mod digits;
pub mod presence;
pub mod size;
pub mod text;
pub mod types;

/// Installs every built-in rule into the registry.
pub fn register_defaults(registry: &RuleRegistry) {
    registry.register_type::<presence::Required>("required");
    registry.register_type::<presence::RequiredIf>("requiredIf");
    registry.register_type::<presence::RequiredUnless>("requiredUnless");
    registry.register_type::<presence::RequiredWith>("requiredWith");
    registry.register_type::<presence::RequiredWithAll>("requiredWithAll");
    registry.register_type::<presence::RequiredWithout>("requiredWithout");
    registry.register_type::<presence::RequiredWithoutAll>("requiredWithoutAll");
    registry.register_type::<presence::NotEmpty>("notEmpty");

    registry.register_type::<types::StringRule>("string");
    registry.register_type::<types::Integer>("integer");
    registry.register_type::<types::Numeric>("numeric");
    registry.register_type::<types::Boolean>("boolean");
    registry.register_type::<types::Array>("array");

    registry.register_type::<size::Between>("between");
    registry.register_type::<size::GreaterThan>("gt");
    registry.register_type::<size::GreaterThanEqual>("gte");
    registry.register_type::<size::LessThan>("lt");
    registry.register_type::<size::LessThanEqual>("lte");
    registry.register_type::<size::Min>("min");
    registry.register_type::<size::Max>("max");
    registry.register_type::<size::Length>("length");
    registry.register_type::<size::MinLength>("minLength");
    registry.register_type::<size::MaxLength>("maxLength");

    registry.register_type::<text::Alpha>("alpha");
    registry.register_type::<text::AlphaDash>("alphaDash");
    registry.register_type::<text::AlphaNum>("alphaNum");
    registry.register_type::<text::AlphaSpace>("alphaSpace");
    registry.register_type::<text::Lowercase>("lowercase");
    registry.register_type::<text::Uppercase>("uppercase");
    registry.register_type::<text::StartsWith>("startsWith");
    registry.register_type::<text::EndsWith>("endsWith");
    registry.register_type::<text::RegexRule>("regex");
    registry.register_type::<text::NotRegex>("notRegex");
    registry.register_type::<text::Email>("email");
    registry.register_type::<text::Url>("url");
    registry.register_type::<text::Uuid>("uuid");
    registry.register_type::<text::Ip>("ip");
    registry.register_type::<text::Ipv4>("ipv4");
    registry.register_type::<text::Ipv6>("ipv6");
    registry.register_type::<text::MacAddress>("macAddress");

    registry.register_type::<digits::Digits>("digits");
    registry.register_type::<digits::DigitsBetween>("digitsBetween");
    registry.register_type::<digits::MinDigits>("minDigits");
    registry.register_type::<digits::MaxDigits>("maxDigits");

    registry.register_type::<compare::SameAs>("sameAs");
    registry.register_type::<compare::Different>("different");
    registry.register_type::<compare::In>("in");
    registry.register_type::<compare::NotIn>("notIn");
    registry.register_type::<compare::NotEqual>("neq");
    registry.register_type::<compare::InArrayField>("inArrayField");
    registry.register_type::<compare::Distinct>("distinct");

    registry.register_type::<datetime::DateTime>("datetime");
    registry.register_type::<datetime::DateTimeFormat>("datetimeFormat");
    registry.register_type::<datetime::After>("after");
    registry.register_type::<datetime::AfterOrEqual>("afterOrEqual");
    registry.register_type::<datetime::Before>("before");
    registry.register_type::<datetime::BeforeOrEqual>("beforeOrEqual");
    registry.register_type::<datetime::DateTimeAfter>("dateTimeAfter");
    registry.register_type::<datetime::DateTimeBefore>("dateTimeBefore");
    registry.register_type::<datetime::DateTimeBetween>("dateTimeBetween");
    registry.register_type::<datetime::Timezone>("timezone");
}

/// Casts a scalar to text.
///
/// Strings pass through, numbers use their shortest form, booleans become
/// `true`/`false` and `null` becomes the empty string. Arrays and objects do
/// not cast.
pub(crate) fn cast_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Casts an optional value to text, treating anything uncastable as empty.
pub(crate) fn cast_string_lossy(value: Option<&Value>) -> String {
    value.and_then(cast_string).unwrap_or_default()
}

/// Casts a value to a float: numbers directly, strings by parsing.
pub(crate) fn cast_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parses a numeric rule parameter; malformed parameters read as zero.
pub(crate) fn param_f64(param: &str) -> f64 {
    param.trim().parse::<f64>().unwrap_or(0.0)
}

/// Parses a count rule parameter; malformed parameters read as zero.
pub(crate) fn param_usize(param: &str) -> usize {
    param.trim().parse::<usize>().unwrap_or(0)
}

/// Renders a float parameter the way it appears in messages (`5`, `2.5`).
pub(crate) fn format_number(n: f64) -> String {
    n.to_string()
}

/// The semantic category a size rule compares.
///
/// Numbers are compared by value; strings, arrays and objects by length
/// (characters for strings). Booleans and `null` have no size, and size rules
/// treat them as vacuously valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    /// A numeric value.
    Value(f64),
    /// The length of a string, array or object.
    Length(usize),
    /// A kind with no meaningful size.
    Unsupported,
}

impl Measure {
    /// Classifies a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(Measure::Unsupported, Measure::Value),
            Value::String(s) => Measure::Length(s.chars().count()),
            Value::Array(items) => Measure::Length(items.len()),
            Value::Object(map) => Measure::Length(map.len()),
            Value::Bool(_) | Value::Null => Measure::Unsupported,
        }
    }

    /// Returns the value or length as a float, if the kind has a size.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Measure::Value(v) => Some(*v),
            Measure::Length(len) => Some(*len as f64),
            Measure::Unsupported => None,
        }
    }

    /// Returns the length, only for sized collections and text.
    pub fn length(&self) -> Option<usize> {
        match self {
            Measure::Length(len) => Some(*len),
            _ => None,
        }
    }
}

/// Joins field names for messages: `a and b`, `a, b, and c`.
pub(crate) fn join_fields(fields: &[String]) -> String {
    match fields {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}
