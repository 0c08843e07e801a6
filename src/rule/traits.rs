//! Traits for rule polymorphism.
//!
//! [`Rule`] is the base contract every predicate implements. Parameters and
//! localization are optional capabilities, exposed through the
//! `as_params_mut` and `as_translatable_mut` hooks so the loader can probe a
//! boxed rule for them without knowing its concrete type.

use serde_json::Value;

use crate::input::InputBag;
use crate::translation::TranslatableRule;

/// The outcome of running one rule against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    valid: bool,
    message: String,
}

impl RuleOutcome {
    /// A passing outcome.
    pub fn passed() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    /// A failing outcome carrying the rendered message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    /// Builds an outcome from a predicate, rendering the message only on failure.
    pub fn check(valid: bool, message: impl FnOnce() -> String) -> Self {
        if valid {
            Self::passed()
        } else {
            Self::failed(message())
        }
    }

    /// Returns true if the rule passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if the rule failed.
    pub fn is_failed(&self) -> bool {
        !self.valid
    }

    /// Returns the failure message, empty when the rule passed.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes the outcome, returning the failure message if any.
    pub fn into_failure(self) -> Option<String> {
        if self.valid {
            None
        } else {
            Some(self.message)
        }
    }
}

/// A validation predicate over a single field.
///
/// `value` is the resolved field value, `None` when the selector does not
/// resolve (missing or `null`). Rules that return `false` from
/// [`requires_field`](Rule::requires_field) are never invoked with `None` by
/// the orchestrator; rules that return `true` (presence rules) always are.
///
/// # Example
///
/// ```rust
/// use verdict::{InputBag, Rule, RuleOutcome};
/// use serde_json::Value;
///
/// #[derive(Default)]
/// struct Even;
///
/// impl Rule for Even {
///     fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
///         let even = value.and_then(Value::as_i64).is_some_and(|n| n % 2 == 0);
///         RuleOutcome::check(even, || format!("{} must be even", selector))
///     }
/// }
/// ```
pub trait Rule: Send {
    /// Runs the predicate against the field addressed by `selector`.
    fn validate(&self, selector: &str, value: Option<&Value>, input: &InputBag) -> RuleOutcome;

    /// Returns true if the rule must run even when the field is absent.
    fn requires_field(&self) -> bool {
        false
    }

    /// Exposes the parameter capability, if the rule takes parameters.
    fn as_params_mut(&mut self) -> Option<&mut dyn RuleWithParams> {
        None
    }

    /// Exposes the localization capability, if the rule renders translated messages.
    fn as_translatable_mut(&mut self) -> Option<&mut dyn TranslatableRule> {
        None
    }
}

/// Capability of rules configured by token parameters (`between:5,10`).
pub trait RuleWithParams {
    /// Stores the parameters of the current token.
    ///
    /// The loader guarantees `params.len() >= self.min_required_params()`.
    fn add_params(&mut self, params: Vec<String>);

    /// Minimum number of parameters the token must carry.
    fn min_required_params(&self) -> usize;
}
