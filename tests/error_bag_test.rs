//! Integration tests for ErrorBag accumulation.

use stillwater::Semigroup;
use verdict::ErrorBag;

fn bag(entries: &[(&str, &str)]) -> ErrorBag {
    let mut bag = ErrorBag::new();
    for (selector, message) in entries {
        bag.add(*selector, *message);
    }
    bag
}

#[test]
fn test_keys_keep_first_failure_order() {
    let bag = bag(&[
        ("password", "The field password is required."),
        ("email", "The field email must be a valid email."),
        ("password", "The field password must have an string value."),
    ]);

    let keys: Vec<&str> = bag.selectors().collect();
    assert_eq!(keys, vec!["password", "email"]);
    assert_eq!(bag.get("password").unwrap().len(), 2);
    assert_eq!(bag.first_of("password"), Some("The field password is required."));
    assert_eq!(bag.message_count(), 3);
}

#[test]
fn test_absent_selector() {
    let bag = bag(&[("a", "x")]);
    assert!(!bag.has("b"));
    assert!(bag.first_of("b").is_none());
    assert!(bag.get("b").is_none());
}

#[test]
fn test_combine_appends_matching_keys() {
    let left = bag(&[("email", "one"), ("name", "two")]);
    let right = bag(&[("email", "three"), ("age", "four")]);

    let combined = left.combine(right);
    assert_eq!(combined.get("email").unwrap(), ["one", "three"]);
    let keys: Vec<&str> = combined.selectors().collect();
    assert_eq!(keys, vec!["email", "name", "age"]);
}

#[test]
fn test_prefixed_rekeys_every_selector() {
    let element = bag(&[("email", "bad"), ("tags.0", "worse")]);
    let prefixed = element.prefixed(3);

    let keys: Vec<&str> = prefixed.selectors().collect();
    assert_eq!(keys, vec!["3.email", "3.tags.0"]);
    assert_eq!(prefixed.first_of("3.email"), Some("bad"));
    assert!(element.has("email"));
}

#[test]
fn test_merge_leaves_source_intact() {
    let mut target = bag(&[("a", "1")]);
    let source = bag(&[("a", "2"), ("b", "3")]);
    target.merge(&source);

    assert_eq!(target.get("a").unwrap(), ["1", "2"]);
    assert_eq!(source.len(), 2);
}

#[test]
fn test_display_lists_every_message() {
    let bag = bag(&[("email", "bad email"), ("email", "too long")]);
    let rendered = bag.to_string();
    assert!(rendered.contains("1 field(s)"));
    assert!(rendered.contains("email: bad email"));
    assert!(rendered.contains("email: too long"));
}

#[test]
fn test_into_iter_yields_owned_entries() {
    let entries: Vec<(String, Vec<String>)> = bag(&[("x", "1")]).into_iter().collect();
    assert_eq!(entries, vec![("x".to_string(), vec!["1".to_string()])]);
}
