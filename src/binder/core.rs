use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::trace;

use crate::coerce::{coerce, ArgValue};
use crate::meta::{ParamMeta, ParamMetaList, SourceRoot};

/// Maximum number of bound arguments before heap allocation.
/// Most operations take ≤8 parameters.
pub const MAX_INLINE_ARGS: usize = 8;

/// Stack-allocated argument storage for the dispatch path.
///
/// Names are `Arc<str>` so that cloning a dispatch result does not copy them.
pub type ArgVec = SmallVec<[(Arc<str>, ArgValue); MAX_INLINE_ARGS]>;

/// Ordered mapping of parameter name to coerced value.
///
/// Order is the declaration order of the operation's parameter metadata;
/// handlers may read arguments positionally ([`BoundArguments::get_index`])
/// or by name ([`BoundArguments::get`]). Parameters whose source could not be
/// resolved are absent, not defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    args: ArgVec,
}

impl BoundArguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing an existing value of the same name in place.
    pub fn insert(&mut self, name: &str, value: ArgValue) {
        match self.args.iter_mut().find(|(k, _)| k.as_ref() == name) {
            Some((_, existing)) => *existing = value,
            None => self.args.push((Arc::from(name), value)),
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.args
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Argument at a position, in declaration order
    #[inline]
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&ArgValue> {
        self.args.get(index).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.args.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|(k, _)| k.as_ref())
    }

    /// Positional values, consuming the arguments.
    #[must_use]
    pub fn into_values(self) -> Vec<ArgValue> {
        self.args.into_iter().map(|(_, v)| v).collect()
    }
}

impl Serialize for BoundArguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.args.len()))?;
        for (k, v) in &self.args {
            map.serialize_entry(k.as_ref(), v)?;
        }
        map.end()
    }
}

/// The three conventional request data sources, borrowed for one binding pass.
#[derive(Debug, Clone, Copy)]
pub struct DataSources<'a> {
    /// Posted body (`POST`)
    pub body: &'a Value,
    /// Query map (`GET`)
    pub query: &'a Value,
    /// Route segments left after module and operation (`PATH`)
    pub path: &'a [String],
}

/// Position reached while walking a source expression
#[derive(Debug, Clone, Copy)]
enum Cursor<'a> {
    Json(&'a Value),
    Residue(&'a [String]),
    Segment(&'a str),
}

impl<'a> Cursor<'a> {
    fn step(self, key: &str) -> Option<Cursor<'a>> {
        let next = match self {
            Cursor::Json(Value::Object(map)) => Cursor::Json(map.get(key)?),
            Cursor::Json(Value::Array(items)) => Cursor::Json(items.get(parse_index(key)?)?),
            Cursor::Residue(segments) => Cursor::Segment(segments.get(parse_index(key)?)?),
            // scalars are not indexable
            Cursor::Json(_) | Cursor::Segment(_) => return None,
        };
        next.present()
    }

    /// `null` counts as absent
    fn present(self) -> Option<Cursor<'a>> {
        match self {
            Cursor::Json(Value::Null) => None,
            other => Some(other),
        }
    }

    fn to_value(self) -> Value {
        match self {
            Cursor::Json(v) => v.clone(),
            Cursor::Residue(segments) => {
                Value::Array(segments.iter().cloned().map(Value::String).collect())
            }
            Cursor::Segment(s) => Value::String(s.to_string()),
        }
    }
}

/// Positional key in canonical decimal form: no sign, no leading zeros.
fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

/// Walk a parameter's source expression; `None` means "no source".
fn resolve_source(meta: &ParamMeta, sources: &DataSources<'_>) -> Option<Value> {
    let (root, keys) = meta.source_path()?;
    let mut cursor = match root? {
        SourceRoot::Body => Cursor::Json(sources.body),
        SourceRoot::Query => Cursor::Json(sources.query),
        SourceRoot::Path => Cursor::Residue(sources.path),
    }
    .present()?;

    for key in keys {
        cursor = cursor.step(key)?;
    }
    Some(cursor.to_value())
}

/// Bind request data to declared parameters.
///
/// Each parameter is resolved independently, in declaration order: a missing
/// source only omits that parameter. Binding never fails and has no side
/// effects; rejecting an incomplete call is the legality check's job.
#[must_use]
pub fn bind_arguments(params: &ParamMetaList, sources: &DataSources<'_>) -> BoundArguments {
    let mut bound = BoundArguments::new();
    for meta in params {
        match resolve_source(meta, sources) {
            Some(raw) => {
                let value = coerce(&raw, meta.ty);
                trace!(
                    param = %meta.name,
                    source = ?meta.source,
                    target_type = %meta.ty,
                    value = %value,
                    "Parameter bound"
                );
                bound.insert(&meta.name, value);
            }
            None => {
                trace!(
                    param = %meta.name,
                    source = ?meta.source,
                    "Parameter has no resolvable source - omitted"
                );
            }
        }
    }
    bound
}
