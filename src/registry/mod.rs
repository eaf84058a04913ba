//! # Registry Module
//!
//! The registry replaces runtime reflection: every dispatchable operation is a
//! typed descriptor holding its handler closure, declared parameter metadata,
//! formal parameters and visibility/static flags.
//!
//! ```rust
//! use brrtrpc::meta::DocBlockResolver;
//! use brrtrpc::registry::{Module, Operation, Registry};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let find = Operation::new("find", |args| {
//!     let id = args.get("id").and_then(|v| v.as_i64()).unwrap_or_default();
//!     Ok(json!({ "id": id }))
//! })
//! .declare("@param int $id @source PATH.0", &DocBlockResolver::new())?
//! .formal("id");
//!
//! let registry = Registry::new().with_module(Module::new("shop::catalog").callable().operation(find));
//! assert!(registry.module("shop::catalog").is_some());
//! # Ok(())
//! # }
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{FormalParam, HandlerFn, Module, Operation, Registry, Visibility};
