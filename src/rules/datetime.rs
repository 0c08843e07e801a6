//! Date and time rules.
//!
//! Values are parsed leniently: RFC 3339 and RFC 2822 timestamps, ISO-style
//! `YYYY-MM-DD[ HH:MM[:SS[.f]]]` text (with `T` or a space), and integer Unix
//! timestamps. Text without an offset is read in the rule's timezone
//! parameter, UTC by default. Timezone parameters are IANA names; an unknown
//! name falls back to UTC.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use crate::input::InputBag;
use crate::rule::{Rule, RuleOutcome, RuleWithParams};
use crate::rules::cast_string_lossy;
use crate::translation::{params, Messages};

type Instant = chrono::DateTime<Utc>;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Parses a value as a point in time, reading offset-less text in `tz`.
pub fn parse_datetime(value: &Value, tz: Tz) -> Option<Instant> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::String(s) => parse_text(s.trim(), tz),
        _ => None,
    }
}

fn parse_text(text: &str, tz: Tz) -> Option<Instant> {
    if text.is_empty() {
        return None;
    }

    let with_offset = chrono::DateTime::parse_from_rfc3339(text)
        .or_else(|_| chrono::DateTime::parse_from_rfc2822(text))
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| chrono::DateTime::parse_from_str(text, fmt).ok())
        });
    if let Some(dt) = with_offset {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_param(param: &str, tz: Tz) -> Option<Instant> {
    parse_text(param.trim(), tz)
}

/// Timezone used for offset-less text; UTC unless a parameter names another.
#[derive(Debug, Clone, Copy)]
struct Zone(Tz);

impl Default for Zone {
    fn default() -> Self {
        Zone(Tz::UTC)
    }
}

fn timezone_param(params: &[String], index: usize) -> Zone {
    Zone(
        params
            .get(index)
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or(Tz::UTC),
    )
}

fn format_instant(instant: &Instant) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `datetime`: the value parses as a date/time.
#[derive(Debug, Default)]
pub struct DateTime {
    messages: Messages,
}

impl Rule for DateTime {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let valid = value.and_then(|v| parse_datetime(v, Tz::UTC)).is_some();
        RuleOutcome::check(valid, || {
            self.messages.render_field("validation.datetime", selector)
        })
    }

    translatable!();
}

/// `datetimeFormat:format`: the text matches a strftime-style format.
///
/// The format may describe a full timestamp, a date alone or a time alone.
#[derive(Debug, Default)]
pub struct DateTimeFormat {
    messages: Messages,
    format: String,
}

impl DateTimeFormat {
    fn matches(&self, text: &str) -> bool {
        let fmt = self.format.as_str();
        chrono::DateTime::parse_from_str(text, fmt).is_ok()
            || NaiveDateTime::parse_from_str(text, fmt).is_ok()
            || NaiveDate::parse_from_str(text, fmt).is_ok()
            || NaiveTime::parse_from_str(text, fmt).is_ok()
    }
}

impl Rule for DateTimeFormat {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        RuleOutcome::check(self.matches(&cast_string_lossy(value)), || {
            self.messages.render(
                "validation.datetime_format",
                &params([("field", selector), ("format", self.format.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for DateTimeFormat {
    fn add_params(&mut self, params: Vec<String>) {
        self.format = params.join(",");
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

macro_rules! field_order_rule {
    ($(#[$doc:meta])* $name:ident, $key:literal, |$value:ident, $other:ident| $cmp:expr) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $name {
            messages: Messages,
            other_field: String,
            timezone: Zone,
        }

        impl Rule for $name {
            fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome {
                let Some($value) = value.and_then(|v| parse_datetime(v, self.timezone.0)) else {
                    return RuleOutcome::failed(
                        self.messages.render_field("validation.datetime", selector),
                    );
                };
                let Some(other_value) = input.get(&self.other_field) else {
                    return RuleOutcome::failed(
                        self.messages.render_field("validation.required", &self.other_field),
                    );
                };
                let Some($other) = parse_datetime(other_value, self.timezone.0) else {
                    return RuleOutcome::failed(
                        self.messages.render_field("validation.datetime", &self.other_field),
                    );
                };
                RuleOutcome::check($cmp, || {
                    self.messages.render(
                        $key,
                        &params([("field", selector), ("otherField", self.other_field.as_str())]),
                    )
                })
            }

            with_params!();
            translatable!();
        }

        impl RuleWithParams for $name {
            fn add_params(&mut self, params: Vec<String>) {
                self.timezone = timezone_param(&params, 1);
                self.other_field = params[0].clone();
            }

            fn min_required_params(&self) -> usize {
                1
            }
        }
    };
}

field_order_rule!(
    /// `after:otherField[,tz]`: strictly later than the time at `otherField`.
    After, "validation.after", |value, other| value > other
);
field_order_rule!(
    /// `afterOrEqual:otherField[,tz]`: not earlier than the time at `otherField`.
    AfterOrEqual, "validation.after_or_equal", |value, other| value >= other
);
field_order_rule!(
    /// `before:otherField[,tz]`: strictly earlier than the time at `otherField`.
    Before, "validation.before", |value, other| value < other
);
field_order_rule!(
    /// `beforeOrEqual:otherField[,tz]`: not later than the time at `otherField`.
    BeforeOrEqual, "validation.before_or_equal", |value, other| value <= other
);

/// A fixed time from a rule parameter, with the text it was parsed from.
#[derive(Debug, Default, Clone)]
struct Threshold {
    raw: String,
    instant: Option<Instant>,
}

impl Threshold {
    fn parse(raw: &str, tz: Tz) -> Self {
        Self {
            raw: raw.to_string(),
            instant: parse_param(raw, tz),
        }
    }

    /// Rendered form for messages: RFC 3339 in UTC, or the raw text if it never parsed.
    fn display(&self) -> String {
        self.instant
            .as_ref()
            .map_or_else(|| self.raw.clone(), format_instant)
    }
}

/// `dateTimeAfter:threshold[,tz]`: strictly later than a fixed time.
///
/// A threshold that does not parse fails every value.
#[derive(Debug, Default)]
pub struct DateTimeAfter {
    messages: Messages,
    threshold: Threshold,
    timezone: Zone,
}

impl Rule for DateTimeAfter {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let Some(instant) = value.and_then(|v| parse_datetime(v, self.timezone.0)) else {
            return RuleOutcome::failed(self.messages.render_field("validation.datetime", selector));
        };
        let valid = self.threshold.instant.is_some_and(|t| instant > t);
        RuleOutcome::check(valid, || {
            self.messages.render(
                "validation.datetime_after",
                &params([
                    ("field", selector.to_string()),
                    ("value", self.threshold.display()),
                ]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for DateTimeAfter {
    fn add_params(&mut self, params: Vec<String>) {
        self.timezone = timezone_param(&params, 1);
        self.threshold = Threshold::parse(&params[0], self.timezone.0);
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `dateTimeBefore:threshold[,tz]`: strictly earlier than a fixed time.
///
/// A threshold that does not parse fails every value.
#[derive(Debug, Default)]
pub struct DateTimeBefore {
    messages: Messages,
    threshold: Threshold,
    timezone: Zone,
}

impl Rule for DateTimeBefore {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let Some(instant) = value.and_then(|v| parse_datetime(v, self.timezone.0)) else {
            return RuleOutcome::failed(self.messages.render_field("validation.datetime", selector));
        };
        let valid = self.threshold.instant.is_some_and(|t| instant < t);
        RuleOutcome::check(valid, || {
            self.messages.render(
                "validation.datetime_before",
                &params([
                    ("field", selector.to_string()),
                    ("value", self.threshold.display()),
                ]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for DateTimeBefore {
    fn add_params(&mut self, params: Vec<String>) {
        self.timezone = timezone_param(&params, 1);
        self.threshold = Threshold::parse(&params[0], self.timezone.0);
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `dateTimeBetween:min,max[,tz]`: within the inclusive range of two fixed times.
#[derive(Debug, Default)]
pub struct DateTimeBetween {
    messages: Messages,
    min: Threshold,
    max: Threshold,
    timezone: Zone,
}

impl Rule for DateTimeBetween {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let Some(instant) = value.and_then(|v| parse_datetime(v, self.timezone.0)) else {
            return RuleOutcome::failed(self.messages.render_field("validation.datetime", selector));
        };
        let valid = match (self.min.instant, self.max.instant) {
            (Some(min), Some(max)) => instant >= min && instant <= max,
            _ => false,
        };
        RuleOutcome::check(valid, || {
            self.messages.render(
                "validation.datetime_between",
                &params([
                    ("field", selector.to_string()),
                    ("min", self.min.display()),
                    ("max", self.max.display()),
                ]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for DateTimeBetween {
    fn add_params(&mut self, params: Vec<String>) {
        self.timezone = timezone_param(&params, 2);
        self.min = Threshold::parse(&params[0], self.timezone.0);
        self.max = Threshold::parse(&params[1], self.timezone.0);
    }

    fn min_required_params(&self) -> usize {
        2
    }
}

/// `timezone`: a known IANA timezone name.
#[derive(Debug, Default)]
pub struct Timezone {
    messages: Messages,
}

impl Rule for Timezone {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let name = cast_string_lossy(value);
        let valid = !name.is_empty() && name.parse::<Tz>().is_ok();
        RuleOutcome::check(valid, || {
            self.messages.render_field("validation.timezone", selector)
        })
    }

    translatable!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{run, run_on};
    use serde_json::json;

    #[test]
    fn test_parse_datetime_formats() {
        let utc = Tz::UTC;
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        for text in [
            "2024-01-15T10:30:00Z",
            "2024-01-15T12:30:00+02:00",
            "2024-01-15 10:30:00",
            "2024-01-15T10:30",
            "Mon, 15 Jan 2024 10:30:00 +0000",
        ] {
            assert_eq!(parse_datetime(&json!(text), utc), Some(expected), "{}", text);
        }
        assert_eq!(
            parse_datetime(&json!("2024-01-15"), utc),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_datetime(&json!(0), utc),
            Some(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_datetime(&json!("2024-13-01"), utc), None);
        assert_eq!(parse_datetime(&json!(true), utc), None);
    }

    #[test]
    fn test_parse_datetime_in_timezone() {
        let tehran: Tz = "Asia/Tehran".parse().unwrap();
        assert_eq!(
            parse_datetime(&json!("2022-01-01 00:00:00"), tehran),
            Some(Utc.with_ymd_and_hms(2021, 12, 31, 20, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_datetime() {
        assert!(run_on("datetime", "d", json!("2024-01-15")).is_valid());
        assert!(run_on("datetime", "d", json!(1_700_000_000)).is_valid());
        assert_eq!(
            run_on("datetime", "d", json!("not a date")).message(),
            "The field d must be a valid date time string."
        );
    }

    #[test]
    fn test_datetime_format() {
        assert!(run_on("datetimeFormat:%Y-%m-%d", "d", json!("2024-01-15")).is_valid());
        assert!(run_on("datetimeFormat:%H:%M", "t", json!("09:45")).is_valid());
        assert!(run_on("datetimeFormat:%Y-%m-%d %H:%M", "d", json!("2024-01-15 09:45")).is_valid());
        assert_eq!(
            run_on("datetimeFormat:%Y-%m-%d", "d", json!("15/01/2024")).message(),
            "The field d must be in %Y-%m-%d format."
        );
    }

    #[test]
    fn test_field_ordering() {
        let input = json!({"start": "2024-01-01", "end": "2024-02-01"});
        assert!(run("after:start", "end", input.clone()).is_valid());
        assert!(run("before:end", "start", input.clone()).is_valid());
        assert_eq!(
            run("after:end", "start", input).message(),
            "The field start must be after field end."
        );

        let same = json!({"start": "2024-01-01", "end": "2024-01-01T00:00:00Z"});
        assert!(run("after:start", "end", same.clone()).is_failed());
        assert!(run("afterOrEqual:start", "end", same.clone()).is_valid());
        assert!(run("before:start", "end", same.clone()).is_failed());
        assert_eq!(
            run("before:start", "end", same.clone()).message(),
            "The field end must be before field start."
        );
        assert!(run("beforeOrEqual:start", "end", same).is_valid());
    }

    #[test]
    fn test_field_ordering_faults() {
        assert_eq!(
            run("after:start", "end", json!({"end": "2024-01-01"})).message(),
            "The field start is required."
        );
        assert_eq!(
            run("after:start", "end", json!({"start": "2024-01-01", "end": "soon"})).message(),
            "The field end must be a valid date time string."
        );
        assert_eq!(
            run("after:start", "end", json!({"start": "once", "end": "2024-01-01"})).message(),
            "The field start must be a valid date time string."
        );
    }

    #[test]
    fn test_datetime_after_and_before() {
        assert!(run_on("dateTimeAfter:2022-01-01", "d", json!("2022-06-01")).is_valid());
        assert_eq!(
            run_on("dateTimeAfter:2022-01-01", "d", json!("2021-06-01")).message(),
            "The field d must be after 2022-01-01T00:00:00Z."
        );
        assert!(run_on("dateTimeBefore:2022-01-01", "d", json!("2021-06-01")).is_valid());
        assert_eq!(
            run_on("dateTimeBefore:2022-01-01", "d", json!("2022-01-01")).message(),
            "The field d must be before 2022-01-01T00:00:00Z."
        );
        assert!(run_on("dateTimeAfter:someday", "d", json!("2022-06-01")).is_failed());
    }

    #[test]
    fn test_datetime_after_respects_timezone() {
        let token = "dateTimeAfter:2022-01-01 00:00:00,Asia/Tehran";
        assert!(run_on(token, "d", json!("2021-12-31T21:00:00Z")).is_valid());
        assert!(run_on("dateTimeAfter:2022-01-01 00:00:00", "d", json!("2021-12-31T21:00:00Z")).is_failed());
    }

    #[test]
    fn test_datetime_between() {
        let token = "dateTimeBetween:2022-01-01,2022-12-31";
        assert!(run_on(token, "d", json!("2022-06-15")).is_valid());
        assert!(run_on(token, "d", json!("2022-01-01")).is_valid());
        assert_eq!(
            run_on(token, "d", json!("2023-01-01")).message(),
            "The field d must be between 2022-01-01T00:00:00Z and 2022-12-31T00:00:00Z."
        );
    }

    #[test]
    fn test_timezone() {
        assert!(run_on("timezone", "tz", json!("Europe/Berlin")).is_valid());
        assert!(run_on("timezone", "tz", json!("UTC")).is_valid());
        assert_eq!(
            run_on("timezone", "tz", json!("Nowhere/City")).message(),
            "The field tz must be a valid timezone."
        );
        assert!(run_on("timezone", "tz", json!("")).is_failed());
    }
}
