//! Message rendering for rule failures.
//!
//! Rules never format their own messages. They hand a message key such as
//! `validation.required` and a parameter map to a [`TranslateFn`], which picks
//! a template for the requested locale and fills in `:name:` placeholders.
//!
//! The process-wide default translator renders through [`Catalog::english`];
//! replace it with [`set_default_translator`] to plug in another localization
//! backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Placeholder values handed to a translator.
pub type Params = BTreeMap<String, String>;

/// Renders `(locale, key, params)` into a message.
pub type TranslateFn = Arc<dyn Fn(&str, &str, &Params) -> String + Send + Sync>;

/// Locale every lookup falls back to.
pub const FALLBACK_LOCALE: &str = "en";

static DEFAULT_TRANSLATOR: Lazy<RwLock<TranslateFn>> =
    Lazy::new(|| RwLock::new(Catalog::english().into_translate_fn()));

/// Returns the process-wide default translation function.
pub fn default_translator() -> TranslateFn {
    Arc::clone(&DEFAULT_TRANSLATOR.read())
}

/// Replaces the process-wide default translation function.
///
/// Runs that already started keep the function they captured.
pub fn set_default_translator(translate: TranslateFn) {
    *DEFAULT_TRANSLATOR.write() = translate;
}

/// Replaces every `:name:` placeholder in the template.
pub fn interpolate(template: &str, params: &Params) -> String {
    params.iter().fold(template.to_string(), |acc, (k, v)| {
        acc.replace(&format!(":{}:", k), v)
    })
}

/// Builds a parameter map from `(name, value)` pairs.
pub fn params<K, V, I>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Message templates by locale and key.
///
/// Lookups try the requested locale, then [`FALLBACK_LOCALE`], and finally
/// return the key itself so a missing translation is visible rather than
/// silent.
///
/// # Example
///
/// ```rust
/// use verdict::translation::{params, Catalog};
///
/// let catalog = Catalog::english()
///     .with_message("fr", "validation.required", "Le champ :field: est obligatoire.");
///
/// let p = params([("field", "email")]);
/// assert_eq!(catalog.translate("fr", "validation.required", &p), "Le champ email est obligatoire.");
/// assert_eq!(catalog.translate("de", "validation.required", &p), "The field email is required.");
/// assert_eq!(catalog.translate("en", "validation.unknown", &p), "validation.unknown");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locales: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the built-in English messages.
    pub fn english() -> Self {
        let mut catalog = Self::new();
        catalog.add_messages(FALLBACK_LOCALE, ENGLISH.iter().copied());
        catalog
    }

    /// Adds or replaces templates for a locale.
    pub fn add_messages<I, K, V>(&mut self, locale: &str, messages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.locales.entry(locale.to_string()).or_default();
        for (key, template) in messages {
            table.insert(key.into(), template.into());
        }
    }

    /// Adds a single template and returns self for chaining.
    pub fn with_message(
        mut self,
        locale: &str,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.add_messages(locale, [(key.into(), template.into())]);
        self
    }

    /// Looks up the template for a key, with locale fallback.
    pub fn template(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales
            .get(locale)
            .and_then(|t| t.get(key))
            .or_else(|| self.locales.get(FALLBACK_LOCALE).and_then(|t| t.get(key)))
            .map(String::as_str)
    }

    /// Renders a message.
    pub fn translate(&self, locale: &str, key: &str, params: &Params) -> String {
        match self.template(locale, key) {
            Some(template) => interpolate(template, params),
            None => key.to_string(),
        }
    }

    /// Converts the catalog into a shareable translation function.
    pub fn into_translate_fn(self) -> TranslateFn {
        Arc::new(move |locale: &str, key: &str, params: &Params| {
            self.translate(locale, key, params)
        })
    }
}

const ENGLISH: &[(&str, &str)] = &[
    ("validation.required", "The field :field: is required."),
    ("validation.required_if", "The field :field: is required when :otherField: is :value:."),
    ("validation.required_unless", "The field :field: is required unless :otherField: is :value:."),
    ("validation.required_with", "The field :field: is required when :otherField: is present."),
    ("validation.required_with_all", "The field :field: is required when :otherFields: are present."),
    ("validation.required_without", "The field :field: is required when :otherField: is not present."),
    ("validation.required_without_all", "The field :field: is required when :otherFields: are not present."),
    ("validation.not_empty", "The field :field: must not be empty."),
    ("validation.string", "The field :field: must have an string value."),
    ("validation.integer", "The field :field: must have an integer value."),
    ("validation.numeric", "The field :field: must be a number."),
    ("validation.boolean", "The field :field: must be boolean."),
    ("validation.array", "The field :field: must be an array or slice."),
    ("validation.between", "The field :field: must have a value or length between :min: and :max:."),
    ("validation.gt", "The field :field: must have a value or length greater than :value:."),
    ("validation.gte", "The field :field: must have a value or length greater than or equal to :value:."),
    ("validation.lt", "The field :field: must have a value or length less than :value:."),
    ("validation.lte", "The field :field: must have a value or length less than or equal to :value:."),
    ("validation.min", "The field :field: must not have a value less than :value:."),
    ("validation.max", "The field :field: must not have a value more than :value:."),
    ("validation.length", "The field :field: must have exact length of :value:."),
    ("validation.min_length", "The field :field: must not have a length less than :value:."),
    ("validation.max_length", "The field :field: must not have a length more than :value:."),
    ("validation.alpha", "The field :field: must only contain letters."),
    ("validation.alpha_dash", "The field :field: must only contain letters, numbers, dashes and underscores."),
    ("validation.alpha_num", "The field :field: must only contain letters and numbers."),
    ("validation.alpha_space", "The field :field: must only contain letters and spaces."),
    ("validation.lowercase", "The field :field: must be lowercase."),
    ("validation.uppercase", "The field :field: must be uppercase."),
    ("validation.starts_with", "The field :field: must starts with :value:."),
    ("validation.ends_with", "The field :field: must ends with :value:."),
    ("validation.regex", "The field :field: must match the regex pattern :pattern:."),
    ("validation.not_regex", "The field :field: must not match the regex pattern :pattern:."),
    ("validation.email", "The field :field: must be a valid email."),
    ("validation.url", "The field :field: must be a valid url."),
    ("validation.uuid", "The field :field: is not a valid uuid."),
    ("validation.ip", "The field :field: must be a valid ip."),
    ("validation.ipv4", "The field :field: must be a valid ipv4."),
    ("validation.ipv6", "The field :field: must be a valid ipv6."),
    ("validation.mac_address", "The field :field: must be a valid mac address."),
    ("validation.digits", "The field :field: must have exactly :digitCount: digits."),
    ("validation.digits_between", "The field :field: must be between :min: and :max: digits."),
    ("validation.min_digits", "The field :field: must not have less than :digitCount: digits."),
    ("validation.max_digits", "The field :field: must not have more than :digitCount: digits."),
    ("validation.same_as", "The field :field: and :otherField: must be match."),
    ("validation.different", "The field :field: must be different from the field :otherField:."),
    ("validation.in", "The selected :field: is invalid."),
    ("validation.not_in", "The selected :field: is invalid."),
    ("validation.neq", "The field :field: could not be :value:."),
    ("validation.distinct", "The field :field: must not contain duplicate values."),
    ("validation.datetime", "The field :field: must be a valid date time string."),
    ("validation.datetime_format", "The field :field: must be in :format: format."),
    ("validation.after", "The field :field: must be after field :otherField:."),
    ("validation.after_or_equal", "The field :field: must be after or equal to field :otherField:."),
    ("validation.before", "The field :field: must be before field :otherField:."),
    ("validation.before_or_equal", "The field :field: must be before or equal to field :otherField:."),
    ("validation.datetime_after", "The field :field: must be after :value:."),
    ("validation.datetime_before", "The field :field: must be before :value:."),
    ("validation.datetime_between", "The field :field: must be between :min: and :max:."),
    ("validation.timezone", "The field :field: must be a valid timezone."),
];

/// Locale and translation function injected into a rule before it runs.
///
/// Every built-in rule embeds one of these and renders its failure messages
/// through [`Messages::render`].
#[derive(Clone)]
pub struct Messages {
    locale: String,
    translate: TranslateFn,
}

impl Messages {
    /// Returns the locale messages are rendered in.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Renders the message for a key.
    pub fn render(&self, key: &str, params: &Params) -> String {
        (self.translate)(&self.locale, key, params)
    }

    /// Renders a message whose only placeholder is `:field:`.
    pub fn render_field(&self, key: &str, selector: &str) -> String {
        self.render(key, &params([("field", selector)]))
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            locale: FALLBACK_LOCALE.to_string(),
            translate: default_translator(),
        }
    }
}

impl std::fmt::Debug for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

/// Capability of rules whose messages can be localized.
///
/// The rule loader injects the locale of the current run and the translation
/// function before the rule is invoked.
pub trait TranslatableRule {
    /// Sets the locale failure messages are rendered in.
    fn add_locale(&mut self, locale: &str);

    /// Sets the translation function.
    fn add_translation_function(&mut self, translate: TranslateFn);
}

impl TranslatableRule for Messages {
    fn add_locale(&mut self, locale: &str) {
        self.locale = locale.to_string();
    }

    fn add_translation_function(&mut self, translate: TranslateFn) {
        self.translate = translate;
    }
}
