#![allow(dead_code)]

use brrtrpc::{DocBlockResolver, Dispatcher, Module, Operation, Registry};
use serde_json::json;
use std::sync::Arc;

pub const NAMESPACE: &str = "ns";

/// Catalog fixture shared by the integration tests.
///
/// - `ns::catalog` (dispatchable): `find`, `search`, `create`, `pair`, `get`, `fail`
/// - `ns::internal` (not dispatchable): `find`
/// - `ns::hidden` (dispatchable): private `secret`, instance `method`
pub fn catalog_registry() -> Registry {
    let resolver = DocBlockResolver::new();

    let find = Operation::new("find", |args| {
        Ok(json!({ "id": args.get("id").and_then(|v| v.as_i64()) }))
    })
    .declare("/** @param int $id @source PATH.0 */", &resolver)
    .expect("find declaration")
    .formal("id");

    let search = Operation::new("search", |args| {
        Ok(json!({
            "q": args.get("q").and_then(|v| v.as_str()),
            "limit": args.get("limit").and_then(|v| v.as_i64()),
        }))
    })
    .declare(
        "/**
          * Full text search.
          *
          * @param string $q query text @source GET.q
          * @param int $limit
          * @source $limit GET.page.limit
          */",
        &resolver,
    )
    .expect("search declaration")
    .formal("q")
    .formal_optional("limit");

    let create = Operation::new("create", |args| {
        Ok(json!({
            "name": args.get("name").and_then(|v| v.as_str()),
            "active": args.get("active").and_then(|v| v.as_bool()),
        }))
    })
    .declare(
        "/**
          * @param string $name @source POST.item.name
          * @param bool $active @source POST.item.active
          */",
        &resolver,
    )
    .expect("create declaration")
    .formal("name")
    .formal("active");

    let pair = Operation::new("pair", |args| {
        Ok(json!([
            args.get_index(0).and_then(|v| v.as_i64()),
            args.get_index(1).and_then(|v| v.as_i64()),
        ]))
    })
    .declare(
        "/**
          * @param int $a @source PATH.0
          * @param int $b @source PATH.1
          */",
        &resolver,
    )
    .expect("pair declaration")
    .formal("a")
    .formal("b");

    let get = Operation::new("get", |_| Ok(json!("listing")));

    let fail = Operation::new("fail", |_| Err(anyhow::anyhow!("backend unavailable")));

    let internal_find = Operation::new("find", |_| Ok(json!(null)));

    let secret = Operation::new("secret", |_| Ok(json!("leaked"))).private();
    let method = Operation::new("method", |_| Ok(json!("needs receiver"))).instance();

    Registry::new()
        .with_module(
            Module::new("ns::catalog")
                .callable()
                .operation(find)
                .operation(search)
                .operation(create)
                .operation(pair)
                .operation(get)
                .operation(fail),
        )
        .with_module(Module::new("ns::internal").operation(internal_find))
        .with_module(
            Module::new("ns::hidden")
                .callable()
                .operation(secret)
                .operation(method),
        )
}

pub fn catalog_dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(catalog_registry()), Some(NAMESPACE))
}
