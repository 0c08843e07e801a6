//! Run configuration.
//!
//! Every validation run works from one immutable [`ValidatorConfig`]. Runs
//! started through the free functions read the process-wide snapshot once, at
//! their start; the setters swap in a new snapshot and never mutate one that
//! a run may be holding.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::translation::FALLBACK_LOCALE;

static DEFAULT_CONFIG: Lazy<RwLock<Arc<ValidatorConfig>>> =
    Lazy::new(|| RwLock::new(Arc::new(ValidatorConfig::default())));

/// Settings that apply to a whole validation run.
///
/// # Example
///
/// ```rust
/// use verdict::ValidatorConfig;
///
/// let config = ValidatorConfig::new()
///     .with_locale("fr")
///     .stop_on_first_failure(true);
///
/// assert_eq!(config.locale(), "fr");
/// assert!(config.stops_on_first_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    locale: String,
    stop_on_first_failure: bool,
}

impl ValidatorConfig {
    /// Creates a configuration with locale `en` that runs every rule.
    pub fn new() -> Self {
        Self {
            locale: FALLBACK_LOCALE.to_string(),
            stop_on_first_failure: false,
        }
    }

    /// Sets the locale failure messages are rendered in.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets whether a selector's rule chain stops at its first failure.
    ///
    /// The early exit is per selector: other selectors still run their full
    /// chains.
    pub fn stop_on_first_failure(mut self, stop: bool) -> Self {
        self.stop_on_first_failure = stop;
        self
    }

    /// Returns the locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Returns true if rule chains stop at their first failure.
    pub fn stops_on_first_failure(&self) -> bool {
        self.stop_on_first_failure
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the current process-wide configuration snapshot.
pub fn default_config() -> Arc<ValidatorConfig> {
    Arc::clone(&DEFAULT_CONFIG.read())
}

/// Replaces the process-wide configuration snapshot.
pub fn set_default_config(config: ValidatorConfig) {
    *DEFAULT_CONFIG.write() = Arc::new(config);
}

/// Sets the process-wide default locale.
pub fn set_default_locale(locale: impl Into<String>) {
    let locale = locale.into();
    update(|config| config.with_locale(locale));
}

/// Sets the process-wide stop-on-first-failure policy.
pub fn set_stop_on_first_failure(stop: bool) {
    update(|config| config.stop_on_first_failure(stop));
}

fn update(f: impl FnOnce(ValidatorConfig) -> ValidatorConfig) {
    let mut guard = DEFAULT_CONFIG.write();
    let next = f(ValidatorConfig::clone(&guard));
    *guard = Arc::new(next);
}
