//! Rule-token parsing and loading.

use tracing::{trace, warn};

use crate::error::ValidatorError;
use crate::registry::RuleRegistry;
use crate::rule::Rule;
use crate::translation::TranslateFn;

/// A single rule token such as `required` or `between:5, 10`.
///
/// The token is split on its first `:` into a rule name and a raw parameter
/// section; the parameter section is split on `,` and every parameter is
/// trimmed. Because only the first `:` separates, parameters may contain
/// colons (`regex:^\d{2}:\d{2}$`).
///
/// # Example
///
/// ```rust
/// use verdict::RuleIndicator;
///
/// let token = RuleIndicator::new("requiredIf: type , user");
/// assert_eq!(token.name(), "requiredIf");
/// assert_eq!(token.params(), vec!["type", "user"]);
///
/// assert!(RuleIndicator::new("required").params().is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleIndicator<'a> {
    raw: &'a str,
}

impl<'a> RuleIndicator<'a> {
    /// Wraps a raw rule token.
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// Returns the token as written.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Returns the rule name, trimmed.
    pub fn name(&self) -> &'a str {
        self.split().0
    }

    /// Returns the trimmed parameters; empty when the token has no `:`.
    pub fn params(&self) -> Vec<String> {
        match self.split().1 {
            Some(raw) => raw.split(',').map(|p| p.trim().to_string()).collect(),
            None => Vec::new(),
        }
    }

    fn split(&self) -> (&'a str, Option<&'a str>) {
        match self.raw.split_once(':') {
            Some((name, params)) => (name.trim(), Some(params)),
            None => (self.raw.trim(), None),
        }
    }

    /// Builds a configured rule instance for the current run.
    ///
    /// The registry factory produces a fresh instance; parameters are checked
    /// against the rule's declared minimum and handed over, then the locale
    /// and translation function are injected.
    ///
    /// # Errors
    ///
    /// Returns `ValidatorError::UnknownRule` if no rule is registered under
    /// the name and `ValidatorError::MissingParams` if the token carries fewer
    /// parameters than the rule requires.
    pub fn load(
        &self,
        registry: &RuleRegistry,
        locale: &str,
        translate: &TranslateFn,
    ) -> Result<Box<dyn Rule>, ValidatorError> {
        let name = self.name();
        let mut rule = registry.create(name).ok_or_else(|| {
            warn!(rule = name, "rule is not registered");
            ValidatorError::UnknownRule {
                name: name.to_string(),
            }
        })?;

        if let Some(with_params) = rule.as_params_mut() {
            let params = self.params();
            let required = with_params.min_required_params();
            if params.len() < required {
                warn!(rule = name, required, given = params.len(), "rule token is missing parameters");
                return Err(ValidatorError::MissingParams {
                    rule: name.to_string(),
                    required,
                    given: params.len(),
                });
            }
            with_params.add_params(params);
        }

        if let Some(translatable) = rule.as_translatable_mut() {
            translatable.add_locale(locale);
            translatable.add_translation_function(translate.clone());
        }

        trace!(rule = name, token = self.raw, "loaded rule");
        Ok(rule)
    }
}

impl<'a> From<&'a str> for RuleIndicator<'a> {
    fn from(raw: &'a str) -> Self {
        Self::new(raw)
    }
}
