//! # Binder Module
//!
//! Builds an operation's [`BoundArguments`] from its parameter metadata and the
//! request's data sources. A source expression names a root and a chain of
//! keys:
//!
//! | expression        | reads                                   |
//! |-------------------|-----------------------------------------|
//! | `PATH.0`          | first path residue segment              |
//! | `GET.page`        | `page` in the query map                 |
//! | `POST.user.id`    | `id` inside `user` in the posted body   |
//! | `GET.tags.1`      | second element of the `tags` list       |
//!
//! The terminal value is coerced to the declared type with the permissive rules
//! of [`crate::coerce`].

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{bind_arguments, ArgVec, BoundArguments, DataSources, MAX_INLINE_ARGS};
