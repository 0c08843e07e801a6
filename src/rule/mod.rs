//! The rule contract and the rule-token loader.
//!
//! A rule is a single predicate over one resolved field. Rules are created
//! fresh for every use by a [`RuleRegistry`](crate::RuleRegistry) factory,
//! configured with the parameters and locale of the current run by
//! [`RuleIndicator::load`], invoked once and dropped.

mod indicator;
mod traits;

pub use indicator::RuleIndicator;
pub use traits::{Rule, RuleOutcome, RuleWithParams};
