//! # Parameter Metadata Module
//!
//! Declared metadata says, for every parameter of an operation, where its value
//! comes from and which scalar type it is coerced to:
//!
//! ```text
//! @param int $id @source PATH.0
//!        │    │          └─ source expression: root (POST | GET | PATH) + dotted keys
//!        │    └─ parameter name
//!        └─ target type (int, float, bool, string, array)
//! ```
//!
//! The [`MetadataResolver`] trait is the seam between the declaration format and
//! the dispatcher. [`DocBlockResolver`] reads doc-comment style blocks; any other
//! format can be plugged in by implementing the trait, or metadata can be built
//! directly with [`ParamMetaList::param`].

use std::fmt;

mod resolver;
mod types;

pub use resolver::{DocBlockResolver, MetadataResolver};
pub use types::{ParamMeta, ParamMetaList, ScalarType, SourceRoot};

/// Error raised while resolving a declaration into parameter metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// Type tag is not one of the supported target types
    UnknownType {
        /// The tag as written in the declaration
        tag: String,
    },
    /// A `@param`/`@source` tag that could not be parsed
    MalformedTag {
        /// The offending line, comment decoration removed
        line: String,
    },
    /// `@source` names a parameter that has no `@param` tag
    UndeclaredSource {
        /// Name of the parameter
        param: String,
    },
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataError::UnknownType { tag } => {
                write!(f, "unknown parameter type '{tag}'")
            }
            MetadataError::MalformedTag { line } => {
                write!(f, "malformed declaration tag: '{line}'")
            }
            MetadataError::UndeclaredSource { param } => {
                write!(f, "@source given for undeclared parameter '${param}'")
            }
        }
    }
}

impl std::error::Error for MetadataError {}
