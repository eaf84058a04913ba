//! # brrtrpc
//!
//! **brrtrpc** maps HTTP resource paths onto registered operations. A request
//! for `/catalog/find/42` resolves to the operation `find` on the module
//! `catalog` (optionally under a namespace), binds its declared parameters from
//! the request body, the query string and the remaining path segments, checks
//! the call is legal, and hands back a ready-to-invoke [`Dispatch`].
//!
//! ## Architecture
//!
//! - **[`router`]** - Splits a resource path into module, operation and residue
//! - **[`registry`]** - Modules, operations and the dispatchable marker
//! - **[`meta`]** - Per-parameter metadata (type, source expression) and the doc-block resolver
//! - **[`binder`]** - Resolves source expressions against request data
//! - **[`coerce`]** - Permissive conversion to the declared scalar types
//! - **[`dispatcher`]** - Ties it together and classifies failures (404/400)
//! - **[`request`]** - Request context, query/form parsing, `http::Request` adapter
//! - **[`config`]** - YAML and environment configuration
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Request Handling Flow
//!
//! ```text
//! http::Request ─► RequestContext::from_http ─► Dispatcher::dispatch ─► Dispatch::invoke
//!                    (path_info, GET, POST)        route, lookup,          handler result
//!                                                  bind, legality          passed through
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtrpc::{DocBlockResolver, Dispatcher, Module, Operation, Registry, RequestContext};
//! use http::Method;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let resolver = DocBlockResolver::new();
//! let add = Operation::new("add", |args| {
//!     let a = args.get("a").and_then(|v| v.as_i64()).unwrap_or(0);
//!     let b = args.get("b").and_then(|v| v.as_i64()).unwrap_or(0);
//!     Ok(json!(a + b))
//! })
//! .declare(
//!     "/**
//!       * @param int $a @source PATH.0
//!       * @param int $b @source GET.b
//!       */",
//!     &resolver,
//! )
//! .expect("valid doc block")
//! .formal("a")
//! .formal("b");
//!
//! let registry = Registry::new().with_module(Module::new("math").callable().operation(add));
//! let dispatcher = Dispatcher::new(Arc::new(registry), None);
//!
//! let ctx = RequestContext::new(Method::GET, "/math/add/2").with_query_string("b=40");
//! let result = dispatcher.dispatch(&ctx).expect("dispatch").invoke().expect("invoke");
//! assert_eq!(result, json!(42));
//! ```
//!
//! ## Error Handling
//!
//! Rejections are typed [`DispatchError`]s carrying a 404 or 400 classification
//! and a diagnostic that includes the resource path; use
//! [`DispatchError::to_response`] to render one. Handler errors are never
//! caught or wrapped.

pub mod binder;
pub mod coerce;
pub mod config;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod meta;
pub mod registry;
pub mod request;
pub mod router;

pub use binder::BoundArguments;
pub use coerce::ArgValue;
pub use config::DispatchConfig;
pub use dispatcher::{Dispatch, DispatchError, Dispatcher};
pub use meta::{DocBlockResolver, MetadataResolver, ParamMetaList, ScalarType};
pub use registry::{Module, Operation, Registry};
pub use request::RequestContext;
