//! # Verdict
//!
//! A declarative validation engine for nested JSON-like data, driven by rule
//! strings.
//!
//! ## Overview
//!
//! Callers describe what valid data looks like as a map from selector
//! patterns to ordered rule tokens:
//!
//! ```text
//! "users.*.email" => ["required", "email"]
//! "age"           => ["integer", "between:18,99"]
//! ```
//!
//! A run expands wildcard selectors against the input, resolves every
//! concrete selector once, and runs its rules in order. Failures are
//! collected per selector into an [`ErrorBag`] of localized messages instead
//! of stopping at the first one. Configuration faults (unknown rule names,
//! tokens with too few parameters, input that is not an object) abort the
//! run with a [`ValidatorError`].
//!
//! ## Core Types
//!
//! - [`InputBag`]: the data under validation, addressed by dotted selectors (`users.0.email`)
//! - [`RuleRegistry`]: rule names mapped to rule factories, seeded with the built-in rules
//! - [`Validator`]: runs a [`RulesMap`] with a fixed registry, configuration and translator
//! - [`Report`]: the outcome of a run, wrapping an [`ErrorBag`]
//!
//! ## Example
//!
//! ```rust
//! use verdict::{rules, validate_map_list};
//! use serde_json::json;
//!
//! let rules = rules! {
//!     "email" => ["required", "email"],
//!     "password" => ["required", "string"],
//! };
//!
//! let report = validate_map_list(
//!     &[json!({"email": "invalidEmail"}), json!({"password": false})],
//!     &rules,
//! )
//! .unwrap();
//!
//! assert!(report.failed());
//! assert_eq!(report.errors().first_of("0.email"), Some("The field email must be a valid email."));
//! assert_eq!(report.errors().first_of("1.email"), Some("The field email is required."));
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod normalize;
pub mod path;
pub mod registry;
pub mod rule;
pub mod rules;
mod shape;
pub mod translation;
pub mod validation;

pub use config::{
    default_config, set_default_config, set_default_locale, set_stop_on_first_failure,
    ValidatorConfig,
};
pub use error::{ErrorBag, ValidatorError};
pub use input::InputBag;
pub use normalize::normalize;
pub use path::{Selector, SelectorSegment};
pub use registry::{global_registry, register_rule, RuleFactory, RuleRegistry};
pub use rule::{Rule, RuleIndicator, RuleOutcome, RuleWithParams};
pub use translation::{
    default_translator, set_default_translator, Catalog, Messages, Params, TranslatableRule,
    TranslateFn,
};
pub use validation::{
    validate_map, validate_map_list, validate_map_list_with_locale, validate_map_with_locale,
    validate_struct, validate_struct_list, validate_struct_list_with_locale,
    validate_struct_with_locale, validate_value, validate_value_with_locale, Report, RulesMap,
    Validator, SCALAR_KEY,
};
