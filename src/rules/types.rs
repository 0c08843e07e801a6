//! Type rules.

use serde_json::Value;

use crate::input::InputBag;
use crate::rule::{Rule, RuleOutcome};
use crate::translation::Messages;

/// `string`: the value must be a string.
#[derive(Debug, Default)]
pub struct StringRule {
    messages: Messages,
}

impl Rule for StringRule {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        RuleOutcome::check(matches!(value, None | Some(Value::String(_))), || {
            self.messages.render_field("validation.string", selector)
        })
    }

    translatable!();
}

/// `integer`: the value must be an integral JSON number.
///
/// Floats fail even when they have no fractional part, and numeric strings
/// fail too; use `numeric` to accept those.
#[derive(Debug, Default)]
pub struct Integer {
    messages: Messages,
}

impl Rule for Integer {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let valid = match value {
            None => true,
            Some(Value::Number(n)) => n.is_i64() || n.is_u64(),
            Some(_) => false,
        };
        RuleOutcome::check(valid, || {
            self.messages.render_field("validation.integer", selector)
        })
    }

    translatable!();
}

/// `numeric`: the value must be a number or a string that parses as one.
#[derive(Debug, Default)]
pub struct Numeric {
    messages: Messages,
}

impl Rule for Numeric {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let valid = match value {
            None | Some(Value::Number(_)) => true,
            Some(Value::String(s)) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            Some(_) => false,
        };
        RuleOutcome::check(valid, || {
            self.messages.render_field("validation.numeric", selector)
        })
    }

    translatable!();
}

/// `boolean`: the value must be a boolean or cast cleanly to one.
///
/// Integers and the strings `1`, `0`, `t`, `f`, `true` and `false` (in their
/// usual casings) are accepted.
#[derive(Debug, Default)]
pub struct Boolean {
    messages: Messages,
}

const BOOLEAN_STRINGS: &[&str] = &[
    "1", "t", "T", "TRUE", "true", "True", "0", "f", "F", "FALSE", "false", "False",
];

impl Rule for Boolean {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let valid = match value {
            None | Some(Value::Bool(_)) => true,
            Some(Value::Number(n)) => n.is_i64() || n.is_u64(),
            Some(Value::String(s)) => BOOLEAN_STRINGS.contains(&s.as_str()),
            Some(_) => false,
        };
        RuleOutcome::check(valid, || {
            self.messages.render_field("validation.boolean", selector)
        })
    }

    translatable!();
}

/// `array`: the value must be a JSON array.
#[derive(Debug, Default)]
pub struct Array {
    messages: Messages,
}

impl Rule for Array {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        RuleOutcome::check(matches!(value, None | Some(Value::Array(_))), || {
            self.messages.render_field("validation.array", selector)
        })
    }

    translatable!();
}
