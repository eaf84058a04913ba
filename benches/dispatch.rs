use brrtrpc::{DocBlockResolver, Dispatcher, Module, Operation, Registry, RequestContext};
use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;

const DOC_BLOCK: &str = "/**
  * Look up an item.
  *
  * @param int $id @source PATH.0
  * @param string $format @source GET.format
  * @param int $limit
  * @source $limit POST.page.limit
  */";

fn registry() -> Registry {
    let resolver = DocBlockResolver::new();
    let mut registry = Registry::new();
    for module in ["catalog", "orders", "users", "inventory"] {
        let op = Operation::new("find", |args| Ok(json!(args.len())))
            .declare(DOC_BLOCK, &resolver)
            .expect("valid doc block")
            .formal("id")
            .formal_optional("format")
            .formal_optional("limit");
        registry.register(
            Module::new(&format!("shop::{module}"))
                .callable()
                .operation(op),
        );
    }
    registry
}

fn bench_dispatch(c: &mut Criterion) {
    let dispatcher = Dispatcher::new(Arc::new(registry()), Some("shop"));
    let requests = [
        RequestContext::new(Method::GET, "/catalog/find/42"),
        RequestContext::new(Method::GET, "/orders/find/7").with_query_string("format=json"),
        RequestContext::new(Method::POST, "/inventory/find/1/extra/segments")
            .with_body(json!({ "page": { "limit": "25" } })),
        RequestContext::new(Method::GET, "/missing/find/1"),
    ];

    c.bench_function("dispatch_resolve_bind", |b| {
        b.iter(|| {
            for ctx in &requests {
                let res = dispatcher.dispatch(ctx);
                black_box(&res);
            }
        })
    });
}

fn bench_doc_block_resolve(c: &mut Criterion) {
    use brrtrpc::MetadataResolver;
    let resolver = DocBlockResolver::new();
    c.bench_function("doc_block_resolve", |b| {
        b.iter(|| black_box(resolver.resolve(black_box(DOC_BLOCK))))
    });
}

criterion_group!(benches, bench_dispatch, bench_doc_block_resolve);
criterion_main!(benches);
