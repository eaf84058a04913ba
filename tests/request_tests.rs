//! Tests for building request contexts from `http::Request`s and dispatching them

mod common;

use brrtrpc::ids::RequestId;
use brrtrpc::request::parse_form;
use brrtrpc::RequestContext;
use common::catalog_dispatcher;
use http::{Method, Request};
use serde_json::json;

#[test]
fn test_from_http_strips_script_path_and_parses_query() {
    let req = Request::builder()
        .method(Method::GET)
        .uri("/api.php/catalog/search?q=red%20lamp&tags[]=a&tags[]=b&page[limit]=5")
        .body(Vec::new())
        .unwrap();
    let ctx = RequestContext::from_http(&req, Some("/api.php"));

    assert_eq!(ctx.path_info, "/catalog/search");
    assert_eq!(
        ctx.query,
        json!({ "q": "red lamp", "tags": ["a", "b"], "page": { "limit": "5" } })
    );
    assert_eq!(ctx.body, json!({}));
}

#[test]
fn test_from_http_decodes_path_segments() {
    let req = Request::builder()
        .uri("/catalog/find/4%32")
        .body(Vec::new())
        .unwrap();
    let ctx = RequestContext::from_http(&req, None);
    assert_eq!(ctx.path_info, "/catalog/find/42");
}

#[test]
fn test_from_http_form_body() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/catalog/create")
        .header("content-type", "application/x-www-form-urlencoded; charset=utf-8")
        .body(b"item[name]=desk&item[active]=1".to_vec())
        .unwrap();
    let ctx = RequestContext::from_http(&req, None);
    assert_eq!(ctx.body, json!({ "item": { "name": "desk", "active": "1" } }));

    let dispatch = catalog_dispatcher().dispatch(&ctx).expect("dispatch");
    assert_eq!(
        dispatch.invoke().expect("invoke"),
        json!({ "name": "desk", "active": true })
    );
}

#[test]
fn test_from_http_json_body() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/catalog/create")
        .header("content-type", "application/json")
        .body(br#"{"item":{"name":"chair","active":0}}"#.to_vec())
        .unwrap();
    let ctx = RequestContext::from_http(&req, None);

    let dispatch = catalog_dispatcher().dispatch(&ctx).expect("dispatch");
    assert_eq!(
        dispatch.invoke().expect("invoke"),
        json!({ "name": "chair", "active": false })
    );
}

#[test]
fn test_request_id_header_is_reused() {
    let id = RequestId::new();
    let req = Request::builder()
        .uri("/catalog")
        .header("x-request-id", id.to_string())
        .body(Vec::new())
        .unwrap();
    assert_eq!(RequestContext::from_http(&req, None).request_id, id);

    let invalid = Request::builder()
        .uri("/catalog")
        .header("x-request-id", "not-a-ulid")
        .body(Vec::new())
        .unwrap();
    assert_ne!(RequestContext::from_http(&invalid, None).request_id, id);
}

#[test]
fn test_parse_form_keeps_last_scalar() {
    assert_eq!(parse_form(b"a=1&a=2"), json!({ "a": "2" }));
    assert_eq!(parse_form(b""), json!({}));
}
