//! Presence rules.
//!
//! These are the only built-in rules that run on absent fields: a field that
//! does not resolve (missing or `null`) is exactly what they look for.

use serde_json::Value;

use crate::input::InputBag;
use crate::rule::{Rule, RuleOutcome, RuleWithParams};
use crate::rules::{cast_string_lossy, join_fields};
use crate::translation::{params, Messages};

/// `required`: the field must be present and not `null`.
#[derive(Debug, Default)]
pub struct Required {
    messages: Messages,
}

impl Rule for Required {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        RuleOutcome::check(value.is_some(), || {
            self.messages.render_field("validation.required", selector)
        })
    }

    fn requires_field(&self) -> bool {
        true
    }

    translatable!();
}

/// `requiredIf:otherField,value`: required when `otherField` casts to `value`.
///
/// An absent `otherField` fails the rule with a `required` message naming the
/// other field.
#[derive(Debug, Default)]
pub struct RequiredIf {
    messages: Messages,
    other_field: String,
    expected: String,
}

impl Rule for RequiredIf {
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
        let Some(other) = input.get(&self.other_field) else {
            return RuleOutcome::failed(
                self.messages.render_field("validation.required", &self.other_field),
            );
        };

        let triggered = cast_string_lossy(Some(other)) == self.expected;
        RuleOutcome::check(!triggered || value.is_some(), || {
            self.messages.render(
                "validation.required_if",
                &params([
                    ("field", selector),
                    ("otherField", self.other_field.as_str()),
                    ("value", self.expected.as_str()),
                ]),
            )
        })
    }

    fn requires_field(&self) -> bool {
        true
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for RequiredIf {
    fn add_params(&mut self, params: Vec<String>) {
        let mut params = params.into_iter();
        self.other_field = params.next().unwrap_or_default();
        self.expected = params.next().unwrap_or_default();
    }

    fn min_required_params(&self) -> usize {
        2
    }
}

/// `requiredUnless:otherField,value`: required unless `otherField` casts to `value`.
#[derive(Debug, Default)]
pub struct RequiredUnless {
    messages: Messages,
    other_field: String,
    expected: String,
}

impl Rule for RequiredUnless {
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
        let exempt = cast_string_lossy(input.get(&self.other_field)) == self.expected;
        RuleOutcome::check(exempt || value.is_some(), || {
            self.messages.render(
                "validation.required_unless",
                &params([
                    ("field", selector),
                    ("otherField", self.other_field.as_str()),
                    ("value", self.expected.as_str()),
                ]),
            )
        })
    }

    fn requires_field(&self) -> bool {
        true
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for RequiredUnless {
    fn add_params(&mut self, params: Vec<String>) {
        let mut params = params.into_iter();
        self.other_field = params.next().unwrap_or_default();
        self.expected = params.next().unwrap_or_default();
    }

    fn min_required_params(&self) -> usize {
        2
    }
}

/// `requiredWith:a,b,...`: required when any of the listed fields is present.
#[derive(Debug, Default)]
pub struct RequiredWith {
    messages: Messages,
    fields: Vec<String>,
}

impl Rule for RequiredWith {
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
        if value.is_some() {
            return RuleOutcome::passed();
        }
        match self.fields.iter().find(|field| input.has(field)) {
            Some(present) => RuleOutcome::failed(self.messages.render(
                "validation.required_with",
                &params([("field", selector), ("otherField", present.as_str())]),
            )),
            None => RuleOutcome::passed(),
        }
    }

    fn requires_field(&self) -> bool {
        true
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for RequiredWith {
    fn add_params(&mut self, params: Vec<String>) {
        self.fields = params;
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `requiredWithAll:a,b,...`: required when every listed field is present.
#[derive(Debug, Default)]
pub struct RequiredWithAll {
    messages: Messages,
    fields: Vec<String>,
}

impl Rule for RequiredWithAll {
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
        let all_present = self.fields.iter().all(|field| input.has(field));
        RuleOutcome::check(!all_present || value.is_some(), || {
            self.messages.render(
                "validation.required_with_all",
                &params([
                    ("field", selector.to_string()),
                    ("otherFields", join_fields(&self.fields)),
                ]),
            )
        })
    }

    fn requires_field(&self) -> bool {
        true
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for RequiredWithAll {
    fn add_params(&mut self, params: Vec<String>) {
        self.fields = params;
    }

    fn min_required_params(&self) -> usize {
        2
    }
}

/// `requiredWithout:a,b,...`: required when any listed field is absent.
#[derive(Debug, Default)]
pub struct RequiredWithout {
    messages: Messages,
    fields: Vec<String>,
}

impl Rule for RequiredWithout {
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
        if value.is_some() {
            return RuleOutcome::passed();
        }
        match self.fields.iter().find(|field| !input.has(field)) {
            Some(missing) => RuleOutcome::failed(self.messages.render(
                "validation.required_without",
                &params([("field", selector), ("otherField", missing.as_str())]),
            )),
            None => RuleOutcome::passed(),
        }
    }

    fn requires_field(&self) -> bool {
        true
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for RequiredWithout {
    fn add_params(&mut self, params: Vec<String>) {
        self.fields = params;
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `requiredWithoutAll:a,b,...`: required when none of the listed fields is present.
#[derive(Debug, Default)]
pub struct RequiredWithoutAll {
    messages: Messages,
    fields: Vec<String>,
}

impl Rule for RequiredWithoutAll {
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
        let none_present = !self.fields.iter().any(|field| input.has(field));
        RuleOutcome::check(!none_present || value.is_some(), || {
            self.messages.render(
                "validation.required_without_all",
                &params([
                    ("field", selector.to_string()),
                    ("otherFields", join_fields(&self.fields)),
                ]),
            )
        })
    }

    fn requires_field(&self) -> bool {
        true
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for RequiredWithoutAll {
    fn add_params(&mut self, params: Vec<String>) {
        self.fields = params;
    }

    fn min_required_params(&self) -> usize {
        2
    }
}

/// `notEmpty`: the field must be present and hold a non-zero value.
///
/// Empty strings, empty arrays and objects, `0` and `false` are all empty.
#[derive(Debug, Default)]
pub struct NotEmpty {
    messages: Messages,
}

impl Rule for NotEmpty {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        RuleOutcome::check(value.is_some_and(|v| !is_empty(v)), || {
            self.messages.render_field("validation.not_empty", selector)
        })
    }

    fn requires_field(&self) -> bool {
        true
    }

    translatable!();
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::test_support::{run, run_on};
    use serde_json::json;

    #[test]
    fn test_required() {
        assert!(run_on("required", "name", json!("x")).is_valid());
        assert!(run_on("required", "name", json!("")).is_valid());
        assert_eq!(
            run_on("required", "name", json!(null)).message(),
            "The field name is required."
        );
        assert!(run("required", "name", json!({})).is_failed());
    }

    #[test]
    fn test_required_if() {
        let token = "requiredIf:type,user";
        assert!(run(token, "email", json!({"type": "admin"})).is_valid());
        assert!(run(token, "email", json!({"type": "user", "email": "a@b.co"})).is_valid());
        assert_eq!(
            run(token, "email", json!({"type": "user"})).message(),
            "The field email is required when type is user."
        );
        assert_eq!(
            run(token, "email", json!({})).message(),
            "The field type is required."
        );
    }

    #[test]
    fn test_required_if_casts_other_field() {
        assert!(run("requiredIf:age,18", "consent", json!({"age": 18})).is_failed());
        assert!(run("requiredIf:age,18", "consent", json!({"age": 17})).is_valid());
    }

    #[test]
    fn test_required_unless() {
        let token = "requiredUnless:role,guest";
        assert!(run(token, "password", json!({"role": "guest"})).is_valid());
        assert!(run(token, "password", json!({"role": "user", "password": "x"})).is_valid());
        assert_eq!(
            run(token, "password", json!({"role": "user"})).message(),
            "The field password is required unless role is guest."
        );
        assert!(run(token, "password", json!({})).is_failed());
    }

    #[test]
    fn test_required_with() {
        let token = "requiredWith:first,last";
        assert!(run(token, "title", json!({})).is_valid());
        assert_eq!(
            run(token, "title", json!({"last": "Doe"})).message(),
            "The field title is required when last is present."
        );
        assert!(run(token, "title", json!({"last": "Doe", "title": "Dr"})).is_valid());
    }

    #[test]
    fn test_required_with_all() {
        let token = "requiredWithAll:a,b,c";
        assert!(run(token, "x", json!({"a": 1, "b": 2})).is_valid());
        assert_eq!(
            run(token, "x", json!({"a": 1, "b": 2, "c": 3})).message(),
            "The field x is required when a, b, and c are present."
        );
    }

    #[test]
    fn test_required_without() {
        let token = "requiredWithout:phone";
        assert!(run(token, "email", json!({"phone": "123"})).is_valid());
        assert_eq!(
            run(token, "email", json!({})).message(),
            "The field email is required when phone is not present."
        );
    }

    #[test]
    fn test_required_without_all() {
        let token = "requiredWithoutAll:phone,fax";
        assert!(run(token, "email", json!({"fax": "1"})).is_valid());
        assert_eq!(
            run(token, "email", json!({})).message(),
            "The field email is required when phone and fax are not present."
        );
        assert!(run(token, "email", json!({"email": "a@b.co"})).is_valid());
    }

    #[test]
    fn test_not_empty() {
        assert!(run_on("notEmpty", "v", json!("x")).is_valid());
        assert!(run_on("notEmpty", "v", json!([0])).is_valid());
        for empty in [json!(""), json!(0), json!(false), json!([]), json!({}), json!(null)] {
            assert_eq!(
                run_on("notEmpty", "v", empty).message(),
                "The field v must not be empty."
            );
        }
    }
}
