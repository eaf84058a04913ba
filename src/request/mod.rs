//! # Request Module
//!
//! Builds the explicit [`RequestContext`] the dispatcher consumes: verb,
//! resource path, query map and posted-body map. Query strings and form bodies
//! are decoded into nested JSON objects so that dotted source expressions such
//! as `GET.filter.tags.0` can walk them.

mod context;
mod form;

pub use context::RequestContext;
pub use form::parse_form;
