//! # Dispatcher Module
//!
//! The dispatcher is the heart of brrtrpc. For every request it:
//!
//! 1. parses the resource path into a target `(module, operation)` and a path residue
//! 2. looks the module up in the [`Registry`](crate::registry::Registry) and checks
//!    its dispatchable marker
//! 3. looks up the operation on the module
//! 4. binds request data to the operation's declared parameters
//! 5. checks the call is legal (public, static, enough arguments)
//!
//! and returns a [`Dispatch`] the caller invokes. Each step fails fast with a
//! typed [`DispatchError`]; nothing is invoked unless every step passed.
//!
//! ## Request Flow
//!
//! ```text
//! RequestContext ──► Router::route ──► registry lookup ──► bind_arguments ──► check_legality
//!                                        │ 404 / 400           (total)            │ 400
//!                                        ▼                                        ▼
//!                                  DispatchError                          Dispatch::invoke
//! ```
//!
//! ## Example
//!
//! ```rust
//! use brrtrpc::dispatcher::Dispatcher;
//! use brrtrpc::meta::{ParamMetaList, ScalarType};
//! use brrtrpc::registry::{Module, Operation, Registry};
//! use brrtrpc::request::RequestContext;
//! use http::Method;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let find = Operation::new("find", |args| {
//!     Ok(json!({ "id": args.get("id").and_then(|v| v.as_i64()) }))
//! })
//! .with_params(ParamMetaList::new().param("id", ScalarType::Integer, Some("PATH.0")))
//! .formal("id");
//!
//! let registry = Registry::new().with_module(Module::new("ns::catalog").callable().operation(find));
//! let dispatcher = Dispatcher::new(Arc::new(registry), Some("ns"));
//!
//! let ctx = RequestContext::new(Method::GET, "/catalog/find/42");
//! let dispatch = dispatcher.dispatch(&ctx).expect("dispatch");
//! assert_eq!(dispatch.invoke().expect("invoke"), json!({ "id": 42 }));
//! ```
//!
//! ## Error Handling
//!
//! | failure                                   | error                | status |
//! |-------------------------------------------|----------------------|--------|
//! | unknown module                            | `TargetNotFound`     | 404    |
//! | module without dispatchable marker        | `NotDispatchable`    | 400    |
//! | unknown operation                         | `OperationNotFound`  | 400    |
//! | not public static, too few arguments      | `IllegalInvocation`  | 400    |
//!
//! Handler errors returned from [`Dispatch::invoke`] are passed through unchanged.

mod core;
mod error;

pub use self::core::{check_legality, Dispatch, Dispatcher};
pub use error::{DispatchError, ERROR_HEADER};
