//! Tests for concurrent validation over shared registries.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use serde_json::{json, Value};
use verdict::{
    rules, InputBag, Rule, RuleOutcome, RuleRegistry, Validator, ValidatorConfig, ValidatorError,
};

/// Records the thread every invocation runs on.
struct ThreadRecorder(Arc<Mutex<Vec<ThreadId>>>);

impl Rule for ThreadRecorder {
    fn validate(&self, _: &str, _: Option<&Value>, _: &InputBag) -> RuleOutcome {
        self.0.lock().push(thread::current().id());
        RuleOutcome::passed()
    }
}

fn recording_validator() -> (Validator, Arc<Mutex<Vec<ThreadId>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = RuleRegistry::with_defaults();
    let shared = Arc::clone(&seen);
    registry.register("recordThread", move || Box::new(ThreadRecorder(Arc::clone(&shared))));
    (Validator::new().with_registry(registry), seen)
}

#[test]
fn test_concurrent_runs_keep_their_own_params() {
    let validator = Arc::new(Validator::new().with_config(ValidatorConfig::new()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let low = i * 10;
                let high = low + 5;
                let token = format!("between:{},{}", low, high);
                let rules = rules! { "n" => [token.as_str()] };

                for _ in 0..50 {
                    let inside = validator.validate_map(&json!({"n": low + 2}), &rules).unwrap();
                    assert!(inside.passed(), "run {} saw foreign params", i);

                    let outside = validator.validate_map(&json!({"n": high + 1}), &rules).unwrap();
                    assert_eq!(
                        outside.errors().first_of("n"),
                        Some(format!("The field n must have a value or length between {} and {}.", low, high).as_str())
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_runs_keep_their_own_locale() {
    let registry = RuleRegistry::with_defaults();

    let handles: Vec<_> = ["en", "fa", "de", "ja"]
        .into_iter()
        .map(|locale| {
            let registry = registry.clone();
            thread::spawn(move || {
                let translate: verdict::TranslateFn =
                    Arc::new(|locale: &str, key: &str, _: &verdict::Params| format!("{}:{}", locale, key));
                let validator = Validator::new()
                    .with_registry(registry)
                    .with_translator(translate)
                    .with_config(ValidatorConfig::new().with_locale(locale));

                for _ in 0..100 {
                    let report = validator
                        .validate_map(&json!({}), &rules! { "name" => ["required"] })
                        .unwrap();
                    assert_eq!(
                        report.errors().first_of("name"),
                        Some(format!("{}:validation.required", locale).as_str())
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_registration_during_validation() {
    let registry = RuleRegistry::with_defaults();
    let validator = Validator::new().with_registry(registry.clone());

    let writer = {
        let registry = registry.clone();
        thread::spawn(move || {
            for i in 0..100 {
                registry.register_type::<verdict::rules::types::StringRule>(format!("alias{}", i));
            }
        })
    };

    let reader = thread::spawn(move || {
        for _ in 0..100 {
            let report = validator
                .validate_map(&json!({"email": "bad"}), &rules! { "email" => ["required", "email"] })
                .unwrap();
            assert!(report.errors().has("email"));
        }
    });

    writer.join().unwrap();
    reader.join().unwrap();
    assert!(registry.contains("alias99"));
}

#[test]
fn test_validator_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Validator>();
    assert_send_sync::<RuleRegistry>();
}

#[test]
fn test_list_entry_points_run_on_calling_thread() {
    let (validator, seen) = recording_validator();
    let caller = thread::current().id();
    let rules = rules! { "x" => ["recordThread"] };

    let inputs: Vec<Value> = (0..64).map(|i| json!({"x": i})).collect();
    assert!(validator.validate_map_list(&inputs, &rules).unwrap().passed());

    #[derive(serde::Serialize)]
    struct Row {
        x: i32,
    }
    let rows: Vec<Row> = (0..16).map(|x| Row { x }).collect();
    assert!(validator.validate_struct_list(&rows, &rules).unwrap().passed());

    let seen = seen.lock();
    assert_eq!(seen.len(), 80);
    assert!(seen.iter().all(|id| *id == caller));
}

#[test]
fn test_list_fault_stops_remaining_elements() {
    let (validator, seen) = recording_validator();
    let rules = rules! { "x" => ["recordThread"] };

    let err = validator
        .validate_map_list(&[json!({"x": 1}), json!("bad"), json!({"x": 3})], &rules)
        .unwrap_err();

    assert!(matches!(err, ValidatorError::NotAnObject { kind: "string" }));
    assert_eq!(seen.lock().len(), 1);
}
