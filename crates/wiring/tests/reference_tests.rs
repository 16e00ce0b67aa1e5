//! Reference resolution and cycle detection tests

use pretty_assertions::assert_eq;
use wiring::*;

fn passthrough(name: &str) -> Value {
    Value::function(name, |args, _| Ok(Value::list(args.to_vec())))
}

// ═══════════════════════════════════════════════════════════════════════
// Resolution
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_resolves_references() {
    let container = Container::new();
    let a = Value::empty_object();
    let b = Value::empty_object();

    container.add("a", a.clone()).unwrap();
    container.add("a-ref", Ref::new("a")).unwrap();

    container.add("b", b.clone()).unwrap();
    container.add("b-ref", Ref::new("b")).unwrap();
    container.add("b-ref-ref", Ref::new("b-ref")).unwrap();

    assert!(Value::ptr_eq(&container.get("a-ref").unwrap(), &a));
    assert!(Value::ptr_eq(&container.get("b-ref-ref").unwrap(), &b));
}

#[test]
fn test_reference_transitivity_keeps_identity() {
    let container = Container::new();
    container.add("a", Def::new(Value::empty_object())).unwrap();
    container.add("a-ref", Ref::new("a")).unwrap();

    let direct = container.get("a").unwrap();
    let through_ref = container.get("a-ref").unwrap();
    assert!(Value::ptr_eq(&direct, &through_ref));
}

#[test]
fn test_reference_to_missing_address() {
    let container = Container::new();
    container.add("dangling", Ref::new("nowhere")).unwrap();

    let err = container.get("dangling").unwrap_err();
    assert!(matches!(
        err,
        ContainerError::AddressNotFound { ref address } if address == "nowhere"
    ));
}

#[test]
fn test_resolve_reference_passes_plain_values_through() {
    let container = Container::new();
    let object = Value::empty_object();

    let resolved = container.resolve_reference(&object).unwrap();
    assert!(Value::ptr_eq(&resolved, &object));
    assert_eq!(
        container.resolve_reference(&Value::Int(3)).unwrap(),
        Value::Int(3)
    );
}

#[test]
fn test_resolve_reference_follows_references() {
    let container = Container::new();
    container.add("port", Value::Int(8080)).unwrap();

    let resolved = container
        .resolve_reference(&Ref::new("port").into())
        .unwrap();
    assert_eq!(resolved, Value::Int(8080));
}

#[test]
fn test_reference_resolve_directly() {
    let container = Container::new();
    container.add("x", Value::string("value")).unwrap();

    let reference = Reference::new("x");
    assert_eq!(reference.address(), "x");
    assert_eq!(
        reference.resolve(&container, &["x".to_string()]).unwrap(),
        Value::string("value")
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Cycle Detection
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_circular_references_fail() {
    let container = Container::new();
    container.add("a", Ref::new("b")).unwrap();
    container.add("b", Ref::new("c")).unwrap();
    container.add("c", Ref::new("a")).unwrap();

    let err = container.get("a").unwrap_err();
    assert!(matches!(err, ContainerError::ReferenceRecursion(_)));
    assert_eq!(
        err.address_chain().unwrap().to_vec(),
        vec!["a", "b", "c", "a"]
    );
}

#[test]
fn test_cycle_chain_reflects_entry_point() {
    let container = Container::new();
    container.add("a", Ref::new("b")).unwrap();
    container.add("b", Ref::new("c")).unwrap();
    container.add("c", Ref::new("a")).unwrap();

    let err = container.get("b").unwrap_err();
    assert_eq!(
        err.address_chain().unwrap().to_vec(),
        vec!["b", "c", "a", "b"]
    );
}

#[test]
fn test_self_reference_fails() {
    let container = Container::new();
    container.add("me", Ref::new("me")).unwrap();

    let err = container.get("me").unwrap_err();
    assert_eq!(err.address_chain().unwrap().to_vec(), vec!["me", "me"]);
}

#[test]
fn test_cycle_through_reference_object() {
    let container = Container::new();
    container
        .add("node", RefObj::new().with_field("next", Ref::new("node")))
        .unwrap();

    let err = container.get("node").unwrap_err();
    assert_eq!(err.address_chain().unwrap().to_vec(), vec!["node", "node"]);
}

#[test]
fn test_diamond_is_not_a_cycle() {
    let container = Container::new();
    container.add("shared", Def::new(Value::empty_object())).unwrap();
    container.add("left", Ref::new("shared")).unwrap();
    container.add("right", Ref::new("shared")).unwrap();
    container
        .add("top", Def::new(passthrough("pair")))
        .unwrap()
        .call_with(
            vec![Value::from(Ref::new("left")), Value::from(Ref::new("right"))],
            (),
        )
        .unwrap();

    let top = container.get("top").unwrap();
    let pair = top.as_list().unwrap();
    assert_eq!(pair.len(), 2);
    assert!(Value::ptr_eq(&pair[0], &pair[1]));
}

#[test]
fn test_independent_gets_share_no_stack() {
    let container = Container::new();
    container.add("leaf", Value::Int(1)).unwrap();
    container.add("via", Ref::new("leaf")).unwrap();

    for _ in 0..3 {
        assert_eq!(container.get("via").unwrap(), Value::Int(1));
    }
    assert_eq!(container.depth(), 0);
}

#[test]
fn test_definition_requesting_itself_fails() {
    let container = Container::new();
    container
        .add("loop", Def::new(passthrough("loop")))
        .unwrap()
        .call_with(vec![Value::from(Ref::new("loop"))], ())
        .unwrap();

    let err = container.get("loop").unwrap_err();
    assert_eq!(err.address_chain().unwrap().to_vec(), vec!["loop", "loop"]);
}

#[test]
fn test_mutually_dependent_definitions_fail() {
    let container = Container::new();
    container
        .add("a", Def::new(passthrough("a")))
        .unwrap()
        .call_with(vec![Value::from(Ref::new("b"))], ())
        .unwrap();
    container
        .add("b", Def::new(passthrough("b")))
        .unwrap()
        .call_with(vec![Value::from(Ref::new("a"))], ())
        .unwrap();

    let err = container.get("a").unwrap_err();
    assert_eq!(err.address_chain().unwrap().to_vec(), vec!["a", "b", "a"]);

    // Neither definition was left half-resolved
    let err = container.get("b").unwrap_err();
    assert_eq!(err.address_chain().unwrap().to_vec(), vec!["b", "a", "b"]);
}
