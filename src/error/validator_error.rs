//! Configuration faults.

/// A fault in how the engine was invoked, as opposed to a finding about the data.
///
/// These are programming mistakes on the caller's side (a misspelled rule
/// name, a rule token missing parameters, a scalar handed to the map or
/// struct entry points). They abort the whole run: no partial report is produced.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// A rule token names a rule that is not registered.
    #[error("rule {name} is not registered")]
    UnknownRule {
        /// The rule name as written in the token.
        name: String,
    },

    /// A rule token carries fewer parameters than the rule requires.
    #[error("rule {rule} need at least {required} parameter, got {given}")]
    MissingParams {
        /// The rule name.
        rule: String,
        /// Minimum parameter count declared by the rule.
        required: usize,
        /// Parameter count found in the token.
        given: usize,
    },

    /// A map entry point was given something that is not an object.
    #[error("validation input must be an object or a struct, got {kind}")]
    NotAnObject {
        /// JSON type of the value.
        kind: &'static str,
    },

    /// A struct entry point was given something that is not a named-field struct.
    #[error("struct validation input must be a struct, got {kind}")]
    NotAStruct {
        /// Serde shape of the value (`map`, `array`, `enum`, ...).
        kind: &'static str,
    },

    /// The value could not be serialized into an input bag.
    #[error("failed to marshal input: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ValidatorError {
    /// Returns the rule name for rule-related faults.
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            ValidatorError::UnknownRule { name } => Some(name),
            ValidatorError::MissingParams { rule, .. } => Some(rule),
            _ => None,
        }
    }
}
