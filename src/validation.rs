//! The validation orchestrator.
//!
//! A run expands every selector pattern of a [`RulesMap`] against the input,
//! resolves each concrete selector once, and runs its rule chain in declared
//! order, collecting failures into an [`ErrorBag`].
//!
//! Two error classes never mix. Rule failures are data and end up in the
//! returned [`Report`]. Configuration faults (an unknown rule name, missing
//! token parameters, input that is not an object) abort the run with a
//! [`ValidatorError`] and no partial report.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use stillwater::Validation;
use tracing::{debug, trace, warn};

use crate::config::{default_config, ValidatorConfig};
use crate::error::{ErrorBag, ValidatorError};
use crate::input::InputBag;
use crate::normalize::normalize;
use crate::registry::{global_registry, RuleRegistry};
use crate::rule::RuleIndicator;
use crate::translation::{default_translator, TranslateFn};

/// Selector pattern to ordered rule tokens.
pub type RulesMap = IndexMap<String, Vec<String>>;

/// Key a standalone value is validated under by [`Validator::validate_value`].
pub const SCALAR_KEY: &str = "variable";

/// Builds a [`RulesMap`] from `"selector" => ["rule", ...]` pairs.
///
/// # Example
///
/// ```rust
/// use verdict::rules;
///
/// let rules = rules! {
///     "email" => ["required", "email"],
///     "users.*.age" => ["integer", "between:18,99"],
/// };
/// assert_eq!(rules["email"], vec!["required", "email"]);
/// assert_eq!(rules.len(), 2);
/// ```
#[macro_export]
macro_rules! rules {
    () => {
        $crate::RulesMap::new()
    };
    ($($selector:expr => [$($rule:expr),* $(,)?]),+ $(,)?) => {{
        let mut map = $crate::RulesMap::new();
        $(
            map.insert(
                ::std::string::String::from($selector),
                ::std::vec![$(::std::string::String::from($rule)),*],
            );
        )+
        map
    }};
}

/// The outcome of a validation run.
///
/// # Example
///
/// ```rust
/// use verdict::{rules, validate_map};
/// use serde_json::json;
///
/// let report = validate_map(
///     &json!({"email": "invalidEmail"}),
///     &rules! {
///         "email" => ["required", "email"],
///         "password" => ["required", "string"],
///     },
/// )
/// .unwrap();
///
/// assert!(report.failed());
/// assert_eq!(report.errors().first_of("email"), Some("The field email must be a valid email."));
/// assert_eq!(report.errors().first_of("password"), Some("The field password is required."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    errors: ErrorBag,
}

impl Report {
    /// Wraps the failures of a run.
    pub fn new(errors: ErrorBag) -> Self {
        Self { errors }
    }

    /// Returns true if any rule failed.
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if no rule failed.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the recorded failures.
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Consumes the report, returning the recorded failures.
    pub fn into_errors(self) -> ErrorBag {
        self.errors
    }

    /// Converts the report into a stillwater `Validation`.
    pub fn into_validation(self) -> Validation<(), ErrorBag> {
        if self.errors.is_empty() {
            Validation::Success(())
        } else {
            Validation::Failure(self.errors)
        }
    }
}

impl From<Report> for ErrorBag {
    fn from(report: Report) -> Self {
        report.errors
    }
}

/// Runs rule chains against input with a fixed registry, configuration and
/// translation function.
///
/// `Validator::new()` captures the process-wide configuration snapshot and
/// translator once; later calls to `set_default_locale` and friends do not
/// affect a validator that already exists. The registry handle shares storage
/// with [`global_registry`], so rules registered later are visible to it.
///
/// # Example
///
/// ```rust
/// use verdict::{rules, Validator, ValidatorConfig};
/// use serde_json::json;
///
/// let validator = Validator::new()
///     .with_config(ValidatorConfig::new().stop_on_first_failure(true));
///
/// let report = validator
///     .validate_map(
///         &json!({"age": "old"}),
///         &rules! { "age" => ["integer", "between:18,99"] },
///     )
///     .unwrap();
///
/// assert_eq!(report.errors().get("age").unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct Validator {
    registry: RuleRegistry,
    config: Arc<ValidatorConfig>,
    translator: TranslateFn,
}

impl Validator {
    /// Creates a validator from the process-wide defaults.
    pub fn new() -> Self {
        Self {
            registry: global_registry().clone(),
            config: default_config(),
            translator: default_translator(),
        }
    }

    /// Uses the given registry to resolve rule names.
    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Uses the given run configuration.
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Overrides only the locale of the current configuration.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        let config = ValidatorConfig::clone(&self.config).with_locale(locale);
        self.config = Arc::new(config);
        self
    }

    /// Uses the given translation function for failure messages.
    pub fn with_translator(mut self, translator: TranslateFn) -> Self {
        self.translator = translator;
        self
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Returns the registry rule names are resolved against.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Validates a standalone value against a rule chain.
    ///
    /// The value is validated as the single field [`SCALAR_KEY`], so messages
    /// name the field `variable`.
    pub fn validate_value<S: AsRef<str>>(
        &self,
        value: &Value,
        rules: &[S],
    ) -> Result<Report, ValidatorError> {
        let input = InputBag::single(SCALAR_KEY, value.clone());
        let mut map = RulesMap::new();
        map.insert(
            SCALAR_KEY.to_string(),
            rules.iter().map(|r| r.as_ref().to_string()).collect(),
        );
        self.validate_input(&input, &map)
    }

    /// Validates a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ValidatorError::NotAnObject` if `input` is not an object, and
    /// any fault raised while loading rules.
    pub fn validate_map(&self, input: &Value, rules: &RulesMap) -> Result<Report, ValidatorError> {
        let input = InputBag::try_from_value(input)
            .inspect_err(|err| warn!(error = %err, "rejected map input"))?;
        self.validate_input(&input, rules)
    }

    /// Validates every object of a list independently.
    ///
    /// Failures are re-keyed as `"<index>.<selector>"`. Elements run in
    /// index order on the calling thread; the first fault stops the run.
    pub fn validate_map_list(
        &self,
        inputs: &[Value],
        rules: &RulesMap,
    ) -> Result<Report, ValidatorError> {
        merge_indexed(inputs.iter().map(|input| self.validate_map(input, rules)))
    }

    /// Validates a serializable struct through its serialized field names.
    ///
    /// Maps and `#[serde(flatten)]` structs serialize as maps and are
    /// rejected here; convert them with `serde_json::to_value` and use
    /// [`validate_map`](Self::validate_map).
    ///
    /// # Errors
    ///
    /// Returns `ValidatorError::NotAStruct` if the value is not a named-field
    /// struct, `ValidatorError::Serialization` if serialization fails, and
    /// any fault raised while loading rules.
    pub fn validate_struct<T>(&self, input: &T, rules: &RulesMap) -> Result<Report, ValidatorError>
    where
        T: Serialize + ?Sized,
    {
        let input = InputBag::from_serializable(input)
            .inspect_err(|err| warn!(error = %err, "rejected struct input"))?;
        self.validate_input(&input, rules)
    }

    /// Validates every struct of a list independently, keyed like
    /// [`validate_map_list`](Self::validate_map_list).
    pub fn validate_struct_list<T>(
        &self,
        inputs: &[T],
        rules: &RulesMap,
    ) -> Result<Report, ValidatorError>
    where
        T: Serialize,
    {
        merge_indexed(inputs.iter().map(|input| self.validate_struct(input, rules)))
    }

    /// Runs a rules map against an input bag.
    pub fn validate_input(
        &self,
        input: &InputBag,
        rules: &RulesMap,
    ) -> Result<Report, ValidatorError> {
        let locale = self.config.locale();
        let stop_on_first_failure = self.config.stops_on_first_failure();
        debug!(patterns = rules.len(), locale, stop_on_first_failure, "starting validation run");

        let mut errors = ErrorBag::new();
        for (selector, tokens) in expand_rules(input, rules) {
            let value = input.get(&selector);

            for token in tokens {
                let indicator = RuleIndicator::new(token);
                let rule = indicator.load(&self.registry, locale, &self.translator)?;

                if value.is_none() && !rule.requires_field() {
                    trace!(selector = selector.as_str(), rule = indicator.name(), "field absent, rule skipped");
                    continue;
                }

                let outcome = rule.validate(&selector, value, input);
                trace!(
                    selector = selector.as_str(),
                    rule = indicator.name(),
                    valid = outcome.is_valid(),
                    "rule evaluated"
                );

                if let Some(message) = outcome.into_failure() {
                    errors.add(selector.as_str(), message);
                    if stop_on_first_failure {
                        break;
                    }
                }
            }
        }

        debug!(failed_selectors = errors.len(), "validation run finished");
        Ok(Report::new(errors))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Expands every pattern into concrete selectors sharing its rule tokens.
///
/// A selector produced by more than one pattern keeps its first position and
/// the tokens of the last pattern that produced it.
fn expand_rules<'a>(input: &InputBag, rules: &'a RulesMap) -> IndexMap<String, &'a [String]> {
    let mut expanded = IndexMap::new();
    for (pattern, tokens) in rules {
        for selector in normalize(pattern, input) {
            expanded.insert(selector, tokens.as_slice());
        }
    }
    expanded
}

fn merge_indexed<I>(results: I) -> Result<Report, ValidatorError>
where
    I: IntoIterator<Item = Result<Report, ValidatorError>>,
{
    let mut errors = ErrorBag::new();
    for (index, result) in results.into_iter().enumerate() {
        errors.merge(&result?.errors().prefixed(index));
    }
    Ok(Report::new(errors))
}

/// Validates a standalone value with the process-wide defaults.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
///
/// let report = verdict::validate_value(&json!(42), &["integer", "between:1,10"]).unwrap();
/// assert_eq!(
///     report.errors().first_of("variable"),
///     Some("The field variable must have a value or length between 1 and 10.")
/// );
/// ```
pub fn validate_value<S: AsRef<str>>(value: &Value, rules: &[S]) -> Result<Report, ValidatorError> {
    Validator::new().validate_value(value, rules)
}

/// Validates a standalone value, rendering messages in `locale`.
pub fn validate_value_with_locale<S: AsRef<str>>(
    value: &Value,
    rules: &[S],
    locale: &str,
) -> Result<Report, ValidatorError> {
    Validator::new().with_locale(locale).validate_value(value, rules)
}

/// Validates a JSON object with the process-wide defaults.
pub fn validate_map(input: &Value, rules: &RulesMap) -> Result<Report, ValidatorError> {
    Validator::new().validate_map(input, rules)
}

/// Validates a JSON object, rendering messages in `locale`.
pub fn validate_map_with_locale(
    input: &Value,
    rules: &RulesMap,
    locale: &str,
) -> Result<Report, ValidatorError> {
    Validator::new().with_locale(locale).validate_map(input, rules)
}

/// Validates a list of JSON objects with the process-wide defaults.
pub fn validate_map_list(inputs: &[Value], rules: &RulesMap) -> Result<Report, ValidatorError> {
    Validator::new().validate_map_list(inputs, rules)
}

/// Validates a list of JSON objects, rendering messages in `locale`.
pub fn validate_map_list_with_locale(
    inputs: &[Value],
    rules: &RulesMap,
    locale: &str,
) -> Result<Report, ValidatorError> {
    Validator::new().with_locale(locale).validate_map_list(inputs, rules)
}

/// Validates a serializable struct with the process-wide defaults.
pub fn validate_struct<T>(input: &T, rules: &RulesMap) -> Result<Report, ValidatorError>
where
    T: Serialize + ?Sized,
{
    Validator::new().validate_struct(input, rules)
}

/// Validates a serializable struct, rendering messages in `locale`.
pub fn validate_struct_with_locale<T>(
    input: &T,
    rules: &RulesMap,
    locale: &str,
) -> Result<Report, ValidatorError>
where
    T: Serialize + ?Sized,
{
    Validator::new().with_locale(locale).validate_struct(input, rules)
}

/// Validates a list of serializable structs with the process-wide defaults.
pub fn validate_struct_list<T>(inputs: &[T], rules: &RulesMap) -> Result<Report, ValidatorError>
where
    T: Serialize,
{
    Validator::new().validate_struct_list(inputs, rules)
}

/// Validates a list of serializable structs, rendering messages in `locale`.
pub fn validate_struct_list_with_locale<T>(
    inputs: &[T],
    rules: &RulesMap,
    locale: &str,
) -> Result<Report, ValidatorError>
where
    T: Serialize,
{
    Validator::new().with_locale(locale).validate_struct_list(inputs, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputBag;
    use crate::rule::{Rule, RuleOutcome};
    use serde_json::json;

    fn validator() -> Validator {
        Validator::new()
            .with_registry(RuleRegistry::with_defaults())
            .with_config(ValidatorConfig::new())
            .with_translator(default_translator())
    }

    fn login_rules() -> RulesMap {
        rules! {
            "email" => ["required", "email"],
            "password" => ["required", "string"],
        }
    }

    #[test]
    fn test_valid_map_passes() {
        let report = validator()
            .validate_map(
                &json!({"email": "user@example.com", "password": "mySecurePassword"}),
                &login_rules(),
            )
            .unwrap();
        assert!(report.passed());
        assert!(report.errors().is_empty());
    }

    #[test]
    fn test_absent_field_skips_non_presence_rules() {
        let report = validator()
            .validate_map(&json!({"email": "invalidEmail"}), &login_rules())
            .unwrap();

        assert!(report.failed());
        assert_eq!(
            report.errors().get("email").unwrap(),
            ["The field email must be a valid email."]
        );
        assert_eq!(
            report.errors().get("password").unwrap(),
            ["The field password is required."]
        );
    }

    #[test]
    fn test_stop_on_first_failure_is_per_selector() {
        let rules = rules! {
            "a" => ["integer", "between:5,10"],
            "b" => ["integer", "between:5,10"],
        };
        let input = json!({"a": "x", "b": 2.5});

        let all = validator().validate_map(&input, &rules).unwrap();
        assert_eq!(all.errors().get("a").unwrap().len(), 2);
        assert_eq!(all.errors().get("b").unwrap().len(), 2);

        let stopping = validator()
            .with_config(ValidatorConfig::new().stop_on_first_failure(true))
            .validate_map(&input, &rules)
            .unwrap();
        assert_eq!(
            stopping.errors().get("a").unwrap(),
            ["The field a must have an integer value."]
        );
        assert_eq!(stopping.errors().get("b").unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_rule_aborts_run() {
        let err = validator()
            .validate_map(&json!({"a": 1}), &rules! { "a" => ["integer", "nope"] })
            .unwrap_err();
        assert!(matches!(err, ValidatorError::UnknownRule { ref name } if name == "nope"));
    }

    #[test]
    fn test_unknown_rule_faults_even_on_absent_field() {
        let err = validator()
            .validate_map(&json!({}), &rules! { "a" => ["nope"] })
            .unwrap_err();
        assert!(matches!(err, ValidatorError::UnknownRule { .. }));
    }

    #[test]
    fn test_missing_params_aborts_run() {
        let err = validator()
            .validate_map(&json!({"code": 13839}), &rules! { "code" => ["digitsBetween:5"] })
            .unwrap_err();
        assert!(matches!(
            err,
            ValidatorError::MissingParams { ref rule, required: 2, given: 1 } if rule == "digitsBetween"
        ));
    }

    #[test]
    fn test_non_object_input_is_a_fault() {
        let err = validator()
            .validate_map(&json!([1, 2]), &rules! { "a" => ["required"] })
            .unwrap_err();
        assert!(matches!(err, ValidatorError::NotAnObject { kind: "array" }));
    }

    #[test]
    fn test_wildcard_and_dotted_selectors() {
        let report = validator()
            .validate_map(
                &json!({"map": {"field1": "value1"}, "array": ["val1", "val2"]}),
                &rules! {
                    "map.field1" => ["required"],
                    "array.*" => ["string"],
                },
            )
            .unwrap();
        assert!(report.passed());
    }

    #[test]
    fn test_wildcard_errors_use_concrete_selectors() {
        let report = validator()
            .validate_map(
                &json!({"users": [{"email": "a@b.co"}, {"email": "bad"}, {}]}),
                &rules! { "users.*.email" => ["required", "email"] },
            )
            .unwrap();

        let keys: Vec<&str> = report.errors().selectors().collect();
        assert_eq!(keys, vec!["users.1.email", "users.2.email"]);
        assert_eq!(
            report.errors().first_of("users.2.email"),
            Some("The field users.2.email is required.")
        );
    }

    #[test]
    fn test_colliding_selectors_keep_later_rules() {
        let report = validator()
            .validate_map(
                &json!({"list": [5]}),
                &rules! {
                    "list.*" => ["string"],
                    "list.0" => ["integer"],
                },
            )
            .unwrap();
        assert!(report.passed());
    }

    #[test]
    fn test_map_list_prefixes_index() {
        let report = validator()
            .validate_map_list(&[json!({"email": "bad"}), json!({"password": false})], &login_rules())
            .unwrap();

        let keys: Vec<&str> = report.errors().selectors().collect();
        assert_eq!(keys, vec!["0.email", "0.password", "1.email", "1.password"]);
        assert_eq!(
            report.errors().first_of("0.email"),
            Some("The field email must be a valid email.")
        );
        assert_eq!(
            report.errors().first_of("1.password"),
            Some("The field password must have an string value.")
        );
        assert_eq!(
            report.errors().first_of("1.email"),
            Some("The field email is required.")
        );
    }

    #[test]
    fn test_map_list_reports_lowest_index_fault() {
        let err = validator()
            .validate_map_list(&[json!({}), json!("x"), json!(1)], &login_rules())
            .unwrap_err();
        assert!(matches!(err, ValidatorError::NotAnObject { kind: "string" }));
    }

    #[test]
    fn test_validate_value_uses_scalar_key() {
        let report = validator().validate_value(&json!(null), &["required"]).unwrap();
        assert_eq!(
            report.errors().first_of(SCALAR_KEY),
            Some("The field variable is required.")
        );

        let report = validator().validate_value(&json!("a@b.co"), &["email"]).unwrap();
        assert!(report.passed());
    }

    #[test]
    fn test_locale_and_translator_reach_rules() {
        let translate: TranslateFn = Arc::new(|locale: &str, key: &str, _: &crate::translation::Params| {
            format!("[{}] {}", locale, key)
        });
        let report = validator()
            .with_translator(translate)
            .with_locale("fa")
            .validate_map(&json!({}), &rules! { "name" => ["required"] })
            .unwrap();
        assert_eq!(
            report.errors().first_of("name"),
            Some("[fa] validation.required")
        );
    }

    #[test]
    fn test_custom_registry() {
        #[derive(Default)]
        struct Odd;

        impl Rule for Odd {
            fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
                let odd = value.and_then(Value::as_i64).is_some_and(|n| n % 2 != 0);
                RuleOutcome::check(odd, || format!("{} must be odd", selector))
            }
        }

        let registry = RuleRegistry::with_defaults();
        registry.register_type::<Odd>("odd");
        let report = validator()
            .with_registry(registry)
            .validate_map(&json!({"n": 4}), &rules! { "n" => ["required", "odd"] })
            .unwrap();
        assert_eq!(report.errors().first_of("n"), Some("n must be odd"));
    }

    #[test]
    fn test_struct_validation() {
        #[derive(Serialize)]
        struct Signup {
            email: String,
            #[serde(rename = "displayName")]
            display_name: Option<String>,
        }

        let report = validator()
            .validate_struct(
                &Signup {
                    email: "bad".to_string(),
                    display_name: None,
                },
                &rules! {
                    "email" => ["email"],
                    "displayName" => ["required"],
                },
            )
            .unwrap();
        assert!(report.errors().has("email"));
        assert_eq!(
            report.errors().first_of("displayName"),
            Some("The field displayName is required.")
        );

        let err = validator().validate_struct(&5, &rules! {}).unwrap_err();
        assert!(matches!(err, ValidatorError::NotAStruct { kind: "number" }));
    }

    #[test]
    fn test_into_validation() {
        let report = validator()
            .validate_map(&json!({}), &rules! { "a" => ["required"] })
            .unwrap();
        match report.into_validation() {
            Validation::Failure(errors) => assert!(errors.has("a")),
            Validation::Success(_) => panic!("expected failure"),
        }

        let report = validator().validate_map(&json!({}), &rules! {}).unwrap();
        assert!(matches!(report.into_validation(), Validation::Success(())));
    }
}
