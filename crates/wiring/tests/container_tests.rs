//! Container registration and lookup tests

use pretty_assertions::assert_eq;
use wiring::*;

// ═══════════════════════════════════════════════════════════════════════
// Registration
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_container_new_is_empty() {
    let container = Container::new();
    assert!(container.is_empty());
    assert_eq!(container.len(), 0);
}

#[test]
fn test_add_rejects_empty_address() {
    let container = Container::new();
    let err = container.add("", Value::Int(1)).unwrap_err();
    assert!(matches!(err, ContainerError::InvalidArgument(_)));
    assert!(container.is_empty());
}

#[test]
fn test_add_rejects_duplicate_address() {
    let container = Container::new();
    container.add("my-value", Value::string("foo")).unwrap();

    let err = container.add("my-value", Value::string("bar")).unwrap_err();
    assert!(matches!(
        err,
        ContainerError::DuplicateAddress { ref address } if address == "my-value"
    ));

    // Registry unchanged
    assert_eq!(container.len(), 1);
    assert_eq!(container.get("my-value").unwrap(), Value::string("foo"));
}

#[test]
fn test_add_returns_the_added_definition() {
    let container = Container::new();
    let definition = Def::new("a");

    let returned = container.add("a", definition.clone()).unwrap();
    assert!(Definition::ptr_eq(&returned, &definition));
}

#[test]
fn test_add_returns_the_added_value() {
    let container = Container::new();
    let object = Value::empty_object();

    let returned = container.add("object", object.clone()).unwrap();
    assert!(Value::ptr_eq(&returned, &object));
}

#[test]
fn test_contains_only_sees_own_registry() {
    let parent = Container::new();
    parent.add("inherited", Value::Int(1)).unwrap();

    let container = Container::new();
    container.inherits_from(&parent);
    container.add("own", Value::Int(2)).unwrap();

    assert!(container.contains("own"));
    assert!(!container.contains("inherited"));
    assert_eq!(container.len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Lookup
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_get_rejects_empty_address() {
    let container = Container::new();
    let err = container.get("").unwrap_err();
    assert!(matches!(err, ContainerError::InvalidArgument(_)));
}

#[test]
fn test_get_missing_address() {
    let container = Container::new();
    let err = container.get("foo").unwrap_err();
    assert!(matches!(
        err,
        ContainerError::AddressNotFound { ref address } if address == "foo"
    ));
    assert_eq!(err.to_string(), "A definition for \"foo\" does not exist");
}

#[test]
fn test_add_and_get_values() {
    let container = Container::new();
    let object = Value::empty_object();

    container.add("string", Value::string("foo")).unwrap();
    container.add("number", Value::Int(1234567890)).unwrap();
    container.add("object", object.clone()).unwrap();

    assert_eq!(container.get("string").unwrap(), Value::string("foo"));
    assert_eq!(container.get("number").unwrap(), Value::Int(1234567890));
    assert!(Value::ptr_eq(&container.get("object").unwrap(), &object));
}

#[test]
fn test_unit_is_a_legal_entry() {
    let container = Container::new();
    container.add("nothing", Value::Unit).unwrap();
    assert_eq!(container.get("nothing").unwrap(), Value::Unit);
}

#[test]
fn test_get_resolves_definitions() {
    let container = Container::new();
    let object = Value::empty_object();

    container.add("string", Def::new("foo")).unwrap();
    container.add("number", Def::new(1234567890i64)).unwrap();
    container.add("object", Def::new(object.clone())).unwrap();

    assert_eq!(container.get("string").unwrap(), Value::string("foo"));
    assert_eq!(container.get("number").unwrap(), Value::Int(1234567890));
    assert!(Value::ptr_eq(&container.get("object").unwrap(), &object));
}

#[test]
fn test_get_does_not_change_registry() {
    let container = Container::new();
    container.add("a", Def::new(1)).unwrap();
    container.get("a").unwrap();
    container.get("a").unwrap();
    assert_eq!(container.len(), 1);
    assert_eq!(container.depth(), 0);
}

// ═══════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_default_config() {
    let container = Container::new();
    assert_eq!(container.config(), &ContainerConfig::default());
}

#[test]
fn test_depth_limit() {
    let container = Container::with_config(ContainerConfig::with_max_depth(3));
    container.add("a", Ref::new("b")).unwrap();
    container.add("b", Ref::new("c")).unwrap();
    container.add("c", Ref::new("d")).unwrap();
    container.add("d", Value::Int(4)).unwrap();

    let err = container.get("a").unwrap_err();
    assert!(matches!(err, ContainerError::DepthExceeded { depth: 3, max: 3 }));

    // Shorter chains still fit
    assert_eq!(container.get("b").unwrap(), Value::Int(4));
    assert_eq!(container.depth(), 0);
}

#[test]
fn test_long_acyclic_chain_resolves_with_default_config() {
    const HOPS: usize = 300;

    // Deep chains need more stack than the default test thread provides
    let resolved = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let container = Container::new();
            container.add("n0", Value::Int(7)).unwrap();
            for i in 1..HOPS {
                container
                    .add(&format!("n{}", i), Ref::new(format!("n{}", i - 1)))
                    .unwrap();
            }
            container.get(&format!("n{}", HOPS - 1))
        })
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(resolved.unwrap(), Value::Int(7));
}

#[test]
fn test_traced_container_resolves_normally() {
    let container = Container::with_config(ContainerConfig::new().trace(true));
    container
        .add("object", Def::new(Value::empty_object()))
        .unwrap()
        .set_prop("x", 1)
        .unwrap();

    let object = container.get("object").unwrap();
    assert_eq!(object.member("x"), Some(Value::Int(1)));
}

#[test]
fn test_container_debug() {
    let container = Container::new();
    container.add("a", Value::Int(1)).unwrap();
    assert_eq!(
        format!("{:?}", container),
        "Container { entries: 1, parents: 0 }"
    );
}
