//! Membership and cross-field comparison rules.

use std::collections::HashSet;

use serde_json::Value;

use crate::input::InputBag;
use crate::rule::{Rule, RuleOutcome, RuleWithParams};
use crate::rules::{cast_string, cast_string_lossy};
use crate::translation::{params, Messages};

/// `sameAs:otherField`: the value equals the value of `otherField`.
///
/// Values are compared structurally, so `1` and `"1"` differ.
#[derive(Debug, Default)]
pub struct SameAs {
    messages: Messages,
    other_field: String,
}

impl Rule for SameAs {
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
        RuleOutcome::check(value == input.get(&self.other_field), || {
            self.messages.render(
                "validation.same_as",
                &params([("field", selector), ("otherField", self.other_field.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for SameAs {
    fn add_params(&mut self, params: Vec<String>) {
        self.other_field = params[0].clone();
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `different:otherField`: the value differs from the value of `otherField`.
#[derive(Debug, Default)]
pub struct Different {
    messages: Messages,
    other_field: String,
}

impl Rule for Different {
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
        RuleOutcome::check(value != input.get(&self.other_field), || {
            self.messages.render(
                "validation.different",
                &params([("field", selector), ("otherField", self.other_field.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for Different {
    fn add_params(&mut self, params: Vec<String>) {
        self.other_field = params[0].clone();
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `in:a,b,...`: the value, cast to text, is one of the listed values.
#[derive(Debug, Default)]
pub struct In {
    messages: Messages,
    values: Vec<String>,
}

impl Rule for In {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let text = cast_string_lossy(value);
        RuleOutcome::check(self.values.contains(&text), || {
            self.messages.render_field("validation.in", selector)
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for In {
    fn add_params(&mut self, params: Vec<String>) {
        self.values = params;
    }

    fn min_required_params(&self) -> usize {
        2
    }
}

/// `notIn:a,b,...`: the value, cast to text, is none of the listed values.
#[derive(Debug, Default)]
pub struct NotIn {
    messages: Messages,
    values: Vec<String>,
}

impl Rule for NotIn {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let text = cast_string_lossy(value);
        RuleOutcome::check(!self.values.contains(&text), || {
            self.messages.render_field("validation.not_in", selector)
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for NotIn {
    fn add_params(&mut self, params: Vec<String>) {
        self.values = params;
    }

    fn min_required_params(&self) -> usize {
        2
    }
}

/// `neq:value`: the value, cast to text, is not `value`.
#[derive(Debug, Default)]
pub struct NotEqual {
    messages: Messages,
    value: String,
}

impl Rule for NotEqual {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        RuleOutcome::check(cast_string_lossy(value) != self.value, || {
            self.messages.render(
                "validation.neq",
                &params([("field", selector), ("value", self.value.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for NotEqual {
    fn add_params(&mut self, params: Vec<String>) {
        self.value = params[0].clone();
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// Text used to compare values of any kind: scalars cast, composites serialize.
fn comparable(value: &Value) -> String {
    cast_string(value).unwrap_or_else(|| value.to_string())
}

/// `inArrayField:otherField`: the value appears in the array at `otherField`.
///
/// Comparison is case-insensitive on the text form of each element. An absent
/// `otherField` fails with a `required` message naming it; a non-array or
/// empty `otherField` fails every value.
#[derive(Debug, Default)]
pub struct InArrayField {
    messages: Messages,
    other_field: String,
}

impl Rule for InArrayField {
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
        let Some(other) = input.get(&self.other_field) else {
            return RuleOutcome::failed(
                self.messages.render_field("validation.required", &self.other_field),
            );
        };

        let needle = value.map(comparable).unwrap_or_default().to_lowercase();
        let found = other
            .as_array()
            .is_some_and(|items| items.iter().any(|item| comparable(item).to_lowercase() == needle));
        RuleOutcome::check(found, || self.messages.render_field("validation.in", selector))
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for InArrayField {
    fn add_params(&mut self, params: Vec<String>) {
        self.other_field = params[0].clone();
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `distinct`: an array holds no duplicate elements. Non-arrays pass.
#[derive(Debug, Default)]
pub struct Distinct {
    messages: Messages,
}

impl Rule for Distinct {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let Some(items) = value.and_then(Value::as_array) else {
            return RuleOutcome::passed();
        };
        let mut seen = HashSet::with_capacity(items.len());
        let unique = items.iter().all(|item| seen.insert(item.to_string()));
        RuleOutcome::check(unique, || {
            self.messages.render_field("validation.distinct", selector)
        })
    }

    translatable!();
}
