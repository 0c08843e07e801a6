//! Error types for validation runs.
//!
//! This module provides [`ErrorBag`], the selector-keyed collection of
//! validation failures, and [`ValidatorError`], the configuration faults that
//! abort a run.

mod error_bag;
mod validator_error;

pub use error_bag::ErrorBag;
pub use validator_error::ValidatorError;
