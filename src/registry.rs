//! Rule registry mapping rule names to rule factories.
//!
//! This module provides the [`RuleRegistry`] type that the rule loader
//! resolves token names against, plus the process-wide registry used by the
//! free validation functions.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::rule::Rule;

/// Builds a fresh, unconfigured rule instance.
pub type RuleFactory = Arc<dyn Fn() -> Box<dyn Rule> + Send + Sync>;

/// Type alias for the factory storage map.
type FactoryMap = Arc<RwLock<HashMap<String, RuleFactory>>>;

static GLOBAL: Lazy<RuleRegistry> = Lazy::new(RuleRegistry::with_defaults);

/// Returns the process-wide registry, seeded with the built-in rules.
pub fn global_registry() -> &'static RuleRegistry {
    &GLOBAL
}

/// Registers a rule in the process-wide registry, replacing any rule of the same name.
///
/// # Example
///
/// ```rust
/// use verdict::{register_rule, rules, InputBag, Rule, RuleOutcome};
/// use serde_json::{json, Value};
///
/// struct NonZero;
///
/// impl Rule for NonZero {
///     fn validate(&self, selector: &str, value: Option<&Value>, _: &InputBag) -> RuleOutcome {
///         let ok = value.and_then(Value::as_f64).is_some_and(|n| n != 0.0);
///         RuleOutcome::check(ok, || format!("{} must not be zero", selector))
///     }
/// }
///
/// register_rule("nonZero", || Box::new(NonZero));
///
/// let report = verdict::validate_map(
///     &json!({"count": 0}),
///     &rules! { "count" => ["nonZero"] },
/// )
/// .unwrap();
/// assert_eq!(report.errors().first_of("count"), Some("count must not be zero"));
/// ```
pub fn register_rule<F>(name: impl Into<String>, factory: F)
where
    F: Fn() -> Box<dyn Rule> + Send + Sync + 'static,
{
    GLOBAL.register(name, factory);
}

/// A thread-safe name-to-factory registry.
///
/// The registry never hands out shared rule instances. Every lookup calls the
/// factory and returns a new instance, so two runs using the same rule name
/// configure separate objects.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can load rules concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use verdict::RuleRegistry;
///
/// let registry = RuleRegistry::with_defaults();
/// assert!(registry.contains("required"));
/// assert!(registry.contains("digitsBetween"));
///
/// let empty = RuleRegistry::new();
/// assert!(empty.create("required").is_none());
/// ```
pub struct RuleRegistry {
    factories: FactoryMap,
}

impl RuleRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a registry seeded with every built-in rule.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        crate::rules::register_defaults(&registry);
        registry
    }

    /// Registers a factory under the given name.
    ///
    /// An existing entry of the same name, built-in or not, is replaced.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Rule> + Send + Sync + 'static,
    {
        self.factories.write().insert(name.into(), Arc::new(factory));
    }

    /// Registers a rule type whose `Default` value is the unconfigured rule.
    pub fn register_type<R>(&self, name: impl Into<String>)
    where
        R: Rule + Default + 'static,
    {
        self.register(name, || Box::new(R::default()) as Box<dyn Rule>);
    }

    /// Retrieves the factory registered under a name.
    pub fn get(&self, name: &str) -> Option<RuleFactory> {
        self.factories.read().get(name).cloned()
    }

    /// Builds a fresh instance of the named rule.
    pub fn create(&self, name: &str) -> Option<Box<dyn Rule>> {
        // Release the lock before running the factory.
        let factory = self.get(name)?;
        Some(factory())
    }

    /// Returns true if a rule is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Removes a rule, returning true if it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.factories.write().remove(name).is_some()
    }

    /// Returns the registered rule names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered rules.
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    /// Returns true if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Clone for RuleRegistry {
    fn clone(&self) -> Self {
        Self {
            factories: Arc::clone(&self.factories),
        }
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
