//! # Router Module
//!
//! The router turns a resource path into a target reference and a path residue.
//!
//! ## Overview
//!
//! ```text
//! /catalog/find/42/full
//!  │       │    └──┴── residue ["42", "full"]  (PATH.0, PATH.1)
//!  │       └────────── operation "find"        (falls back to the verb, e.g. "get")
//!  └────────────────── module "catalog"        (qualified as "<namespace>::catalog")
//! ```
//!
//! Routing is a pure parse: there is no routing table. Target existence,
//! the dispatchable marker and the operation lookup are checked by the
//! [`Dispatcher`](crate::dispatcher::Dispatcher) against its registry.
//!
//! ## Example
//!
//! ```rust
//! use brrtrpc::router::Router;
//!
//! let router = Router::new(Some("shop"));
//! let m = router.route("/catalog/find/42", "get");
//! assert_eq!(m.target.module, "shop::catalog");
//! assert_eq!(m.target.operation, "find");
//! assert_eq!(m.residue, vec!["42".to_string()]);
//! ```

mod core;

pub use self::core::{Route, RouteMatch, Router, TargetRef, NAMESPACE_SEPARATOR};
