use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::MetadataError;

/// Target type a bound value is coerced to before invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Integer,
    Float,
    Boolean,
    String,
    /// Containers pass through, scalars are wrapped in a one-element array.
    Array,
}

impl FromStr for ScalarType {
    type Err = MetadataError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(ScalarType::Integer),
            "float" | "double" => Ok(ScalarType::Float),
            "bool" | "boolean" => Ok(ScalarType::Boolean),
            "string" => Ok(ScalarType::String),
            "array" => Ok(ScalarType::Array),
            _ => Err(MetadataError::UnknownType {
                tag: tag.to_string(),
            }),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScalarType::Integer => "integer",
            ScalarType::Float => "float",
            ScalarType::Boolean => "boolean",
            ScalarType::String => "string",
            ScalarType::Array => "array",
        };
        f.write_str(s)
    }
}

/// Root data source named by the first segment of a source expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRoot {
    /// Posted body (`POST`)
    Body,
    /// Query string (`GET`)
    Query,
    /// Path residue (`PATH`)
    Path,
}

impl SourceRoot {
    /// Roots are matched case-sensitively; anything else resolves to nothing.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "POST" => Some(SourceRoot::Body),
            "GET" => Some(SourceRoot::Query),
            "PATH" => Some(SourceRoot::Path),
            _ => None,
        }
    }
}

impl fmt::Display for SourceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRoot::Body => write!(f, "POST"),
            SourceRoot::Query => write!(f, "GET"),
            SourceRoot::Path => write!(f, "PATH"),
        }
    }
}

/// Declared metadata for one operation parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamMeta {
    pub name: String,
    /// Dotted source expression such as `POST.user.id`; `None` means never bound
    pub source: Option<String>,
    pub ty: ScalarType,
}

impl ParamMeta {
    /// Split the source expression into its root and the remaining lookup keys.
    ///
    /// Returns `None` when no source is declared. An unknown root yields
    /// `Some((None, ..))` so callers can tell "no source" from "dead source".
    #[must_use]
    pub fn source_path(&self) -> Option<(Option<SourceRoot>, Vec<&str>)> {
        let source = self.source.as_deref()?;
        let mut segments = source.split('.');
        let root = segments.next().and_then(SourceRoot::parse);
        Some((root, segments.collect()))
    }
}

/// Ordered parameter metadata, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamMetaList(Vec<ParamMeta>);

impl ParamMetaList {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder-style insert, see [`ParamMetaList::insert`].
    #[must_use]
    pub fn param(mut self, name: &str, ty: ScalarType, source: Option<&str>) -> Self {
        self.insert(ParamMeta {
            name: name.to_string(),
            source: source.map(str::to_string),
            ty,
        });
        self
    }

    /// Insert or replace metadata for a parameter.
    ///
    /// Re-declaring a name overwrites its metadata but keeps its original position.
    pub fn insert(&mut self, meta: ParamMeta) {
        match self.0.iter_mut().find(|m| m.name == meta.name) {
            Some(existing) => *existing = meta,
            None => self.0.push(meta),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamMeta> {
        self.0.iter().find(|m| m.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ParamMeta> {
        self.0.iter_mut().find(|m| m.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParamMeta> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParamMetaList {
    type Item = &'a ParamMeta;
    type IntoIter = std::slice::Iter<'a, ParamMeta>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
