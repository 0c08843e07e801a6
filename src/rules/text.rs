//! Text rules: character classes, patterns and well-known formats.
//!
//! Scalars are cast to text before matching, so `alpha` sees `123` as the
//! string `"123"`. `alphaDash` and `alphaNum` accept actual strings only.

use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::input::InputBag;
use crate::rule::{Rule, RuleOutcome, RuleWithParams};
use crate::rules::{cast_string, cast_string_lossy};
use crate::translation::{params, Messages};

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\pL\pM]+$").unwrap());

static ALPHA_DASH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\pL\pM\pN_-]+$").unwrap());

static ALPHA_NUM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\pL\pM\pN]+$").unwrap());

static ALPHA_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\pL\pM\s]+$").unwrap());

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static MAC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)([0-9A-F]{2}[-:]){5}[0-9A-F]{2}$").unwrap());

macro_rules! pattern_rule {
    ($(#[$doc:meta])* $name:ident, $key:literal, $regex:ident, $cast:expr) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $name {
            messages: Messages,
        }

        impl Rule for $name {
            fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
                let Some(value) = value else {
                    return RuleOutcome::passed();
                };
                let cast: fn(&Value) -> Option<String> = $cast;
                let valid = cast(value).is_some_and(|text| $regex.is_match(&text));
                RuleOutcome::check(valid, || self.messages.render_field($key, selector))
            }

            translatable!();
        }
    };
}

fn strict_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

pattern_rule!(
    /// `alpha`: letters (and combining marks) only.
    Alpha, "validation.alpha", ALPHA_REGEX, cast_string
);
pattern_rule!(
    /// `alphaDash`: letters, digits, dashes and underscores.
    AlphaDash, "validation.alpha_dash", ALPHA_DASH_REGEX, strict_string
);
pattern_rule!(
    /// `alphaNum`: letters and digits.
    AlphaNum, "validation.alpha_num", ALPHA_NUM_REGEX, strict_string
);
pattern_rule!(
    /// `alphaSpace`: letters and whitespace.
    AlphaSpace, "validation.alpha_space", ALPHA_SPACE_REGEX, cast_string
);
pattern_rule!(
    /// `uuid`: a hyphenated hexadecimal UUID of any version.
    Uuid, "validation.uuid", UUID_REGEX, cast_string
);
pattern_rule!(
    /// `macAddress`: six hexadecimal octets separated by `:` or `-`.
    MacAddress, "validation.mac_address", MAC_REGEX, cast_string
);

/// `lowercase`: the text has no uppercase characters.
#[derive(Debug, Default)]
pub struct Lowercase {
    messages: Messages,
}

impl Rule for Lowercase {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let text = cast_string_lossy(value);
        RuleOutcome::check(text.to_lowercase() == text, || {
            self.messages.render_field("validation.lowercase", selector)
        })
    }

    translatable!();
}

/// `uppercase`: the text has no lowercase characters.
#[derive(Debug, Default)]
pub struct Uppercase {
    messages: Messages,
}

impl Rule for Uppercase {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let text = cast_string_lossy(value);
        RuleOutcome::check(text.to_uppercase() == text, || {
            self.messages.render_field("validation.uppercase", selector)
        })
    }

    translatable!();
}

/// `startsWith:prefix`: the value is text starting with `prefix`.
#[derive(Debug, Default)]
pub struct StartsWith {
    messages: Messages,
    prefix: String,
}

impl Rule for StartsWith {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let Some(text) = value.and_then(cast_string) else {
            return RuleOutcome::failed(self.messages.render_field("validation.string", selector));
        };
        RuleOutcome::check(text.starts_with(&self.prefix), || {
            self.messages.render(
                "validation.starts_with",
                &params([("field", selector), ("value", self.prefix.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for StartsWith {
    fn add_params(&mut self, params: Vec<String>) {
        self.prefix = params[0].clone();
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `endsWith:suffix`: the value is text ending with `suffix`.
#[derive(Debug, Default)]
pub struct EndsWith {
    messages: Messages,
    suffix: String,
}

impl Rule for EndsWith {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let Some(text) = value.and_then(cast_string) else {
            return RuleOutcome::failed(self.messages.render_field("validation.string", selector));
        };
        RuleOutcome::check(text.ends_with(&self.suffix), || {
            self.messages.render(
                "validation.ends_with",
                &params([("field", selector), ("value", self.suffix.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for EndsWith {
    fn add_params(&mut self, params: Vec<String>) {
        self.suffix = params[0].clone();
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// Compiles a pattern parameter, rejoining the commas the token parser split on.
fn compile_pattern(params: Vec<String>) -> (String, Option<Regex>) {
    let pattern = params.join(",");
    let compiled = Regex::new(&pattern).ok();
    (pattern, compiled)
}

/// `regex:pattern`: the text matches the pattern.
///
/// A pattern that does not compile fails every value.
#[derive(Debug, Default)]
pub struct RegexRule {
    messages: Messages,
    pattern: String,
    compiled: Option<Regex>,
}

impl Rule for RegexRule {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let text = cast_string_lossy(value);
        let valid = self.compiled.as_ref().is_some_and(|re| re.is_match(&text));
        RuleOutcome::check(valid, || {
            self.messages.render(
                "validation.regex",
                &params([("field", selector), ("pattern", self.pattern.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for RegexRule {
    fn add_params(&mut self, params: Vec<String>) {
        (self.pattern, self.compiled) = compile_pattern(params);
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `notRegex:pattern`: the text does not match the pattern.
///
/// A pattern that does not compile matches nothing, so every value passes.
#[derive(Debug, Default)]
pub struct NotRegex {
    messages: Messages,
    pattern: String,
    compiled: Option<Regex>,
}

impl Rule for NotRegex {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let text = cast_string_lossy(value);
        let matched = self.compiled.as_ref().is_some_and(|re| re.is_match(&text));
        RuleOutcome::check(!matched, || {
            self.messages.render(
                "validation.not_regex",
                &params([("field", selector), ("pattern", self.pattern.as_str())]),
            )
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for NotRegex {
    fn add_params(&mut self, params: Vec<String>) {
        (self.pattern, self.compiled) = compile_pattern(params);
    }

    fn min_required_params(&self) -> usize {
        1
    }
}

/// `email`: a syntactically valid address.
///
/// The local part is limited to 64 bytes and the domain to 255. The `mx`
/// parameter is accepted for compatibility but performs no DNS lookup.
#[derive(Debug, Default)]
pub struct Email {
    messages: Messages,
    mx_requested: bool,
}

impl Email {
    fn is_email(address: &str) -> bool {
        let mut parts = address.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return false;
        };
        local.len() <= 64 && domain.len() <= 255 && EMAIL_REGEX.is_match(address)
    }

    /// Returns true if the token asked for an MX lookup.
    pub fn mx_requested(&self) -> bool {
        self.mx_requested
    }
}

impl Rule for Email {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let address = cast_string_lossy(value);
        RuleOutcome::check(Self::is_email(&address), || {
            self.messages.render_field("validation.email", selector)
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for Email {
    fn add_params(&mut self, params: Vec<String>) {
        self.mx_requested = params.iter().any(|p| p == "mx");
    }

    fn min_required_params(&self) -> usize {
        0
    }
}

/// `url`: an absolute URL, or a bare host that becomes one with `http://`.
///
/// With the `scheme` parameter the scheme must be written out. The host must
/// be an IP address, `localhost`, or a dotted name without empty labels.
/// Empty text passes.
#[derive(Debug, Default)]
pub struct Url {
    messages: Messages,
    require_scheme: bool,
}

impl Url {
    fn is_url(&self, raw: &str) -> bool {
        if raw.is_empty() {
            return true;
        }
        let parsed = url::Url::parse(raw).ok().filter(has_valid_host);
        if parsed.is_some() || self.require_scheme {
            return parsed.is_some();
        }
        url::Url::parse(&format!("http://{}", raw))
            .ok()
            .filter(has_valid_host)
            .is_some()
    }
}

fn has_valid_host(url: &url::Url) -> bool {
    match url.host() {
        Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_)) => true,
        Some(url::Host::Domain(domain)) => {
            domain == "localhost"
                || (domain.contains('.') && domain.split('.').all(|label| !label.is_empty()))
        }
        None => false,
    }
}

impl Rule for Url {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        let raw = cast_string_lossy(value);
        RuleOutcome::check(self.is_url(&raw), || {
            self.messages.render_field("validation.url", selector)
        })
    }

    with_params!();
    translatable!();
}

impl RuleWithParams for Url {
    fn add_params(&mut self, params: Vec<String>) {
        self.require_scheme = params.iter().any(|p| p == "scheme");
    }

    fn min_required_params(&self) -> usize {
        0
    }
}

/// Parses text as an IP address, treating IPv4-mapped IPv6 addresses as IPv4.
fn parse_ip(value: Option<&Value>) -> Option<IpAddr> {
    let ip: IpAddr = cast_string_lossy(value).parse().ok()?;
    match ip {
        IpAddr::V6(v6) => Some(v6.to_ipv4_mapped().map_or(ip, IpAddr::V4)),
        v4 => Some(v4),
    }
}

/// `ip`: an IPv4 or IPv6 address.
#[derive(Debug, Default)]
pub struct Ip {
    messages: Messages,
}

impl Rule for Ip {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        RuleOutcome::check(parse_ip(value).is_some(), || {
            self.messages.render_field("validation.ip", selector)
        })
    }

    translatable!();
}

/// `ipv4`: an IPv4 address.
#[derive(Debug, Default)]
pub struct Ipv4 {
    messages: Messages,
}

impl Rule for Ipv4 {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        RuleOutcome::check(matches!(parse_ip(value), Some(IpAddr::V4(_))), || {
            self.messages.render_field("validation.ipv4", selector)
        })
    }

    translatable!();
}

/// `ipv6`: an IPv6 address that is not an IPv4-mapped one.
#[derive(Debug, Default)]
pub struct Ipv6 {
    messages: Messages,
}

impl Rule for Ipv6 {
    fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
        RuleOutcome::check(matches!(parse_ip(value), Some(IpAddr::V6(_))), || {
            self.messages.render_field("validation.ipv6", selector)
        })
    }

    translatable!();
}
