//! Size rules.
//!
//! `between`, `gt`, `gte`, `lt` and `lte` compare a number's value or the
//! length of a string, array or object; values of other kinds pass. The
//! `*Length` rules compare lengths only. `min` and `max` compare the numeric
//! cast of the value, where anything that is not a number or numeric string
//! counts as `0`.

use serde_json::Value;

use crate::input::InputBag;
use crate::rule::{Rule, RuleOutcome, RuleWithParams};
use crate::rules::{cast_f64, format_number, param_f64, param_usize, Measure};
use crate::translation::{params, Messages};

/// `between:min,max`: value or length within the inclusive range.
#[derive(Debug, Default)]
pub struct Between {
    messages: Messages,
    min: f64,
    max: f64,
}

impl Rule for Between {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let Some(size) = value.and_then(|v| Measure::of(v).as_f64()) else {
            return RuleOutcome::passed();
        };
        RuleOutcome::check(size >= self.min && size <= self.max, || {
            self.messages.render(
                "validation.between",
                &params([
                    ("field", selector.to_string()),
                    ("min", format_number(self.min)),
                    ("max", format_number(self.max)),
                ]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for Between {
    fn add_params(&mut self, params: Vec<String>) {
        self.min = param_f64(&params[0]);
        self.max = param_f64(&params[1]);
    }

    fn min_required_params(&self) -> usize {
        2
    }
}

macro_rules! bound_rule {
    ($(#[$doc:meta])* $name:ident, $key:literal, |$size:ident, $bound:ident| $cmp:expr) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $name {
            messages: Messages,
            bound: f64,
        }

        impl Rule for $name {
            fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
                let Some($size) = value.and_then(|v| Measure::of(v).as_f64()) else {
                    return RuleOutcome::passed();
                };
                let $bound = self.bound;
                RuleOutcome::check($cmp, || {
                    self.messages.render(
                        $key,
                        &params([
                            ("field", selector.to_string()),
                            ("value", format_number(self.bound)),
                        ]),
                    )
                })
            }

            with_params!();
            translatable!();
        }

        impl RuleWithParams for $name {
            fn add_params(&mut self, params: Vec<String>) {
                self.bound = param_f64(&params[0]);
            }

            fn min_required_params(&self) -> usize {
                1
            }
        }
    };
}

bound_rule!(
    /// `gt:n`: value or length strictly greater than `n`.
    GreaterThan, "validation.gt", |size, bound| size > bound
);
bound_rule!(
    /// `gte:n`: value or length greater than or equal to `n`.
    GreaterThanEqual, "validation.gte", |size, bound| size >= bound
);
bound_rule!(
    /// `lt:n`: value or length strictly less than `n`.
    LessThan, "validation.lt", |size, bound| size < bound
);
bound_rule!(
    /// `lte:n`: value or length less than or equal to `n`.
    LessThanEqual, "validation.lte", |size, bound| size <= bound
);

/// `min:n`: numeric value not below `n`.
#[derive(Debug, Default)]
pub struct Min {
    messages: Messages,
    bound: f64,
}

impl Rule for Min {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let n = value.and_then(cast_f64).unwrap_or(0.0);
        RuleOutcome::check(n >= self.bound, || {
            self.messages.render(
                "validation.min",
                &params([
                    ("field", selector.to_string()),
                    ("value", format_number(self.bound)),
                ]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for Min {
    fn add_params(&mut self, params: Vec<String>) {
        self.bound = param_f64(&params[0]);
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `max:n`: numeric value not above `n`.
#[derive(Debug, Default)]
pub struct Max {
    messages: Messages,
    bound: f64,
}

impl Rule for Max {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let n = value.and_then(cast_f64).unwrap_or(0.0);
        RuleOutcome::check(n <= self.bound, || {
            self.messages.render(
                "validation.max",
                &params([
                    ("field", selector.to_string()),
                    ("value", format_number(self.bound)),
                ]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for Max {
    fn add_params(&mut self, params: Vec<String>) {
        self.bound = param_f64(&params[0]);
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

macro_rules! length_rule {
    ($(#[$doc:meta])* $name:ident, $key:literal, |$len:ident, $limit:ident| $cmp:expr) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $name {
            messages: Messages,
            limit: usize,
        }

        impl Rule for $name {
            fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
                let Some($len) = value.and_then(|v| Measure::of(v).length()) else {
                    return RuleOutcome::passed();
                };
                let $limit = self.limit;
                RuleOutcome::check($cmp, || {
                    self.messages.render(
                        $key,
                        &params([
                            ("field", selector.to_string()),
                            ("value", self.limit.to_string()),
                        ]),
                    )
                })
            }

            with_params!();
            translatable!();
        }

        impl RuleWithParams for $name {
            fn add_params(&mut self, params: Vec<String>) {
                self.limit = param_usize(&params[0]);
            }

            fn min_required_params(&self) -> usize {
                1
            }
        }
    };
}

length_rule!(
    /// `length:n`: exact length of a string, array or object.
    Length, "validation.length", |len, limit| len == limit
);
length_rule!(
    /// `minLength:n`: length of at least `n`.
    MinLength, "validation.min_length", |len, limit| len >= limit
);
length_rule!(
    /// `maxLength:n`: length of at most `n`.
    MaxLength, "validation.max_length", |len, limit| len <= limit
);
