//! Digit-count rules.
//!
//! The value is cast to text and must consist of numeric characters only;
//! the rules then bound how many there are. A count parameter that is not a
//! non-negative integer fails every value.

use serde_json::Value;

use crate::input::InputBag;
use crate::rule::{Rule, RuleOutcome, RuleWithParams};
use crate::rules::cast_string_lossy;
use crate::translation::{params, Messages};

/// Returns the number of characters if the text is all digits.
fn digit_count(value: Option<&Value>) -> Option<usize> {
    let text = cast_string_lossy(value);
    if text.is_empty() || !text.chars().all(char::is_numeric) {
        return None;
    }
    Some(text.chars().count())
}

fn parse_count(param: &str) -> Option<usize> {
    param.trim().parse().ok()
}

/// `digits:n`: exactly `n` digits.
#[derive(Debug, Default)]
pub struct Digits {
    messages: Messages,
    raw: String,
    count: Option<usize>,
}

impl Rule for Digits {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let valid = matches!((digit_count(value), self.count), (Some(n), Some(c)) if n == c);
        RuleOutcome::check(valid, || {
            self.messages.render(
                "validation.digits",
                &params([("field", selector), ("digitCount", self.raw.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for Digits {
    fn add_params(&mut self, params: Vec<String>) {
        self.count = parse_count(&params[0]);
        self.raw = params[0].clone();
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `digitsBetween:min,max`: between `min` and `max` digits, inclusive.
#[derive(Debug, Default)]
pub struct DigitsBetween {
    messages: Messages,
    raw_min: String,
    raw_max: String,
    range: Option<(usize, usize)>,
}

impl Rule for DigitsBetween {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let valid = match (digit_count(value), self.range) {
            (Some(n), Some((min, max))) => n >= min && n <= max,
            _ => false,
        };
        RuleOutcome::check(valid, || {
            self.messages.render(
                "validation.digits_between",
                &params([
                    ("field", selector),
                    ("min", self.raw_min.as_str()),
                    ("max", self.raw_max.as_str()),
                ]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for DigitsBetween {
    fn add_params(&mut self, params: Vec<String>) {
        self.range = parse_count(&params[0]).zip(parse_count(&params[1]));
        self.raw_min = params[0].clone();
        self.raw_max = params[1].clone();
    }

    fn min_required_params(&self) -> usize {
        2
    }
}

/// `minDigits:n`: at least `n` digits.
#[derive(Debug, Default)]
pub struct MinDigits {
    messages: Messages,
    raw: String,
    count: Option<usize>,
}

impl Rule for MinDigits {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let valid = matches!((digit_count(value), self.count), (Some(n), Some(c)) if n >= c);
        RuleOutcome::check(valid, || {
            self.messages.render(
                "validation.min_digits",
                &params([("field", selector), ("digitCount", self.raw.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for MinDigits {
    fn add_params(&mut self, params: Vec<String>) {
        self.count = parse_count(&params[0]);
        self.raw = params[0].clone();
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `maxDigits:n`: at most `n` digits.
#[derive(Debug, Default)]
pub struct MaxDigits {
    messages: Messages,
    raw: String,
    count: Option<usize>,
}

impl Rule for MaxDigits {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let valid = matches!((digit_count(value), self.count), (Some(n), Some(c)) if n <= c);
        RuleOutcome::check(valid, || {
            self.messages.render(
                "validation.max_digits",
                &params([("field", selector), ("digitCount", self.raw.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for MaxDigits {
    fn add_params(&mut self, params: Vec<String>) {
        self.count = parse_count(&params[0]);
        self.raw = params[0].clone();
    }

    fn min_required_params(&self) -> usize {
        1
    }
}
