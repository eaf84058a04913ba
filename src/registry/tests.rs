use super::*;
use crate::binder::BoundArguments;
use crate::meta::{DocBlockResolver, MetadataError, ScalarType};
use serde_json::{json, Value};

fn noop(_: &BoundArguments) -> anyhow::Result<Value> {
    Ok(Value::Null)
}

#[test]
fn test_operation_defaults_to_public_static() {
    let op = Operation::new("find", noop);
    assert!(op.is_public());
    assert!(op.is_static());
    assert_eq!(op.required_params(), 0);
    assert!(op.params().is_empty());
}

#[test]
fn test_required_params_ignore_optional_formals() {
    let op = Operation::new("search", noop)
        .formal("term")
        .formal_optional("limit")
        .formal("page");
    assert_eq!(op.formals().len(), 3);
    assert_eq!(op.required_params(), 2);
}

#[test]
fn test_declare_resolves_metadata() {
    let op = Operation::new("find", noop)
        .declare("@param int $id @source PATH.0", &DocBlockResolver::new())
        .expect("declare");
    let meta = op.params().get("id").expect("id meta");
    assert_eq!(meta.ty, ScalarType::Integer);
    assert_eq!(meta.source.as_deref(), Some("PATH.0"));
}

#[test]
fn test_declare_propagates_metadata_errors() {
    let err = Operation::new("find", noop)
        .declare("@param money $amount", &DocBlockResolver::new())
        .unwrap_err();
    assert!(matches!(err, MetadataError::UnknownType { .. }));
}

#[test]
fn test_flags_can_be_cleared() {
    let op = Operation::new("secret", noop).private().instance();
    assert_eq!(op.visibility(), Visibility::Private);
    assert!(!op.is_static());
}

#[test]
fn test_module_marker_and_lookup() {
    let registry = Registry::new()
        .with_module(Module::new("app::catalog").callable().operation(Operation::new("find", noop)))
        .with_module(Module::new("app::helpers").operation(Operation::new("slugify", noop)));

    assert_eq!(registry.len(), 2);
    let catalog = registry.module("app::catalog").expect("catalog");
    assert!(registry.implements_marker(catalog));
    assert!(catalog.get_operation("find").is_some());
    assert!(catalog.get_operation("missing").is_none());

    let helpers = registry.module("app::helpers").expect("helpers");
    assert!(!registry.implements_marker(helpers));
    assert!(registry.module("app::Catalog").is_none());
}

#[test]
fn test_re_registration_replaces_module_and_operation() {
    let mut registry = Registry::new();
    registry.register(Module::new("m").operation(Operation::new("a", noop)));
    registry.register(
        Module::new("m")
            .callable()
            .operation(Operation::new("b", |_| Ok(json!(1))))
            .operation(Operation::new("b", |_| Ok(json!(2)))),
    );

    assert_eq!(registry.len(), 1);
    let module = registry.module("m").expect("m");
    assert!(module.is_callable());
    assert!(module.get_operation("a").is_none());
    let op = module.get_operation("b").expect("b");
    assert_eq!(op.call(&BoundArguments::new()).unwrap(), json!(2));
}
