use super::*;
use crate::coerce::ArgValue;
use crate::meta::{ParamMetaList, ScalarType};
use serde_json::json;

fn residue(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_path_index_binds_integer() {
    let params = ParamMetaList::new().param("id", ScalarType::Integer, Some("PATH.0"));
    let path = residue(&["7"]);
    let empty = json!({});
    let sources = DataSources {
        body: &empty,
        query: &empty,
        path: &path,
    };
    let bound = bind_arguments(&params, &sources);
    assert_eq!(bound.get("id"), Some(&ArgValue::Int(7)));
    assert_eq!(bound.len(), 1);
}

#[test]
fn test_nested_body_lookup_and_omission() {
    let params = ParamMetaList::new().param("id", ScalarType::Integer, Some("POST.user.id"));
    let body = json!({"user": {"id": "42"}});
    let empty = json!({});
    let bound = bind_arguments(
        &params,
        &DataSources {
            body: &body,
            query: &empty,
            path: &[],
        },
    );
    assert_eq!(bound.get("id"), Some(&ArgValue::Int(42)));

    let body = json!({"account": {"id": "42"}});
    let bound = bind_arguments(
        &params,
        &DataSources {
            body: &body,
            query: &empty,
            path: &[],
        },
    );
    assert!(bound.is_empty());
}

#[test]
fn test_one_missing_source_does_not_block_others() {
    let params = ParamMetaList::new()
        .param("a", ScalarType::String, Some("GET.a"))
        .param("b", ScalarType::String, Some("GET.missing"))
        .param("c", ScalarType::Boolean, Some("GET.c"))
        .param("d", ScalarType::Integer, None)
        .param("e", ScalarType::Integer, Some("COOKIE.e"));
    let query = json!({"a": "x", "c": "1", "e": "5"});
    let empty = json!({});
    let bound = bind_arguments(
        &params,
        &DataSources {
            body: &empty,
            query: &query,
            path: &[],
        },
    );
    let names: Vec<&str> = bound.names().collect();
    assert_eq!(names, vec!["a", "c"]);
    assert_eq!(bound.get_index(0), Some(&ArgValue::Str("x".into())));
    assert_eq!(bound.get_index(1), Some(&ArgValue::Bool(true)));
    assert_eq!(bound.get_index(2), None);
}

#[test]
fn test_array_index_null_and_scalar_lookup() {
    let params = ParamMetaList::new()
        .param("second", ScalarType::String, Some("POST.tags.1"))
        .param("nothing", ScalarType::String, Some("POST.gone"))
        .param("deeper", ScalarType::String, Some("POST.name.first"))
        .param("out_of_range", ScalarType::String, Some("POST.tags.9"));
    let body = json!({"tags": ["a", "b"], "gone": null, "name": "ann"});
    let empty = json!({});
    let bound = bind_arguments(
        &params,
        &DataSources {
            body: &body,
            query: &empty,
            path: &[],
        },
    );
    assert_eq!(bound.len(), 1);
    assert_eq!(bound.get("second"), Some(&ArgValue::Str("b".into())));
}

#[test]
fn test_bare_roots_bind_whole_sources() {
    let params = ParamMetaList::new()
        .param("rest", ScalarType::Array, Some("PATH"))
        .param("filters", ScalarType::Array, Some("GET"))
        .param("has_body", ScalarType::Boolean, Some("POST"));
    let path = residue(&["x", "y"]);
    let query = json!({"q": "rust"});
    let body = json!({});
    let bound = bind_arguments(
        &params,
        &DataSources {
            body: &body,
            query: &query,
            path: &path,
        },
    );
    assert_eq!(bound.get("rest"), Some(&ArgValue::Array(json!(["x", "y"]))));
    assert_eq!(bound.get("filters"), Some(&ArgValue::Array(json!({"q": "rust"}))));
    assert_eq!(bound.get("has_body"), Some(&ArgValue::Bool(false)));
}

#[test]
fn test_path_segments_are_not_indexable() {
    let params = ParamMetaList::new().param("c", ScalarType::String, Some("PATH.0.0"));
    let path = residue(&["42"]);
    let empty = json!({});
    let bound = bind_arguments(
        &params,
        &DataSources {
            body: &empty,
            query: &empty,
            path: &path,
        },
    );
    assert!(bound.is_empty());
}

#[test]
fn test_binding_is_idempotent() {
    let params = ParamMetaList::new()
        .param("id", ScalarType::Integer, Some("PATH.0"))
        .param("q", ScalarType::String, Some("GET.q"));
    let path = residue(&["3"]);
    let query = json!({"q": "z"});
    let body = json!({});
    let sources = DataSources {
        body: &body,
        query: &query,
        path: &path,
    };
    assert_eq!(bind_arguments(&params, &sources), bind_arguments(&params, &sources));
}

#[test]
fn test_bound_arguments_serialize_in_order() {
    let mut bound = BoundArguments::new();
    bound.insert("z", ArgValue::Int(1));
    bound.insert("a", ArgValue::Str("b".into()));
    bound.insert("z", ArgValue::Int(2));
    assert_eq!(
        serde_json::to_string(&bound).unwrap(),
        r#"{"z":2,"a":"b"}"#
    );
    assert!(bound.contains("a"));
    assert_eq!(
        bound.into_values(),
        vec![ArgValue::Int(2), ArgValue::Str("b".into())]
    );
}

#[test]
fn test_non_canonical_indices_are_absent() {
    let params = ParamMetaList::new()
        .param("plain", ScalarType::String, Some("PATH.1"))
        .param("signed", ScalarType::String, Some("PATH.+1"))
        .param("padded", ScalarType::String, Some("PATH.01"))
        .param("listed", ScalarType::String, Some("GET.tags.01"))
        .param("first", ScalarType::String, Some("GET.tags.0"));
    let path = residue(&["x", "y"]);
    let query = json!({"tags": ["a", "b"]});
    let empty = json!({});
    let bound = bind_arguments(
        &params,
        &DataSources {
            body: &empty,
            query: &query,
            path: &path,
        },
    );
    let names: Vec<&str> = bound.names().collect();
    assert_eq!(names, ["plain", "first"]);
    assert_eq!(bound.get("plain"), Some(&ArgValue::Str("y".into())));
    assert_eq!(bound.get("first"), Some(&ArgValue::Str("a".into())));
}
