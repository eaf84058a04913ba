//! Router core module - route parsing on the dispatch path.

use std::fmt;
use tracing::debug;

/// Separator between namespace and module short name (`shop::catalog`)
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Path segments of a resource path, in order.
///
/// Leading and trailing `/` are stripped before splitting, interior empty
/// segments are kept: `/a//b/` → `["a", "", "b"]`. An empty path yields a
/// single empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    segments: Vec<String>,
}

impl Route {
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let segments = path
            .trim_matches('/')
            .split('/')
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Consume the route left-to-right: module, operation, residue.
    fn into_parts(self) -> (String, Option<String>, Vec<String>) {
        let mut segments = self.segments.into_iter();
        let module = segments.next().unwrap_or_default();
        let operation = segments.next();
        (module, operation, segments.collect())
    }
}

/// Resolved `(module, operation)` pair selected for invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetRef {
    /// Fully qualified module name (namespace prefix + short name)
    pub module: String,
    pub operation: String,
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.operation)
    }
}

/// Result of parsing a resource path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub target: TargetRef,
    /// Segments after module and operation; the `PATH` data source
    pub residue: Vec<String>,
}

/// Turns resource paths into [`RouteMatch`]es under a configured namespace.
///
/// The router only parses; whether the target exists is decided by the
/// dispatcher against its registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Router {
    namespace_prefix: String,
}

impl Router {
    /// Create a router for an optional namespace.
    ///
    /// The namespace is normalized to end with [`NAMESPACE_SEPARATOR`]:
    /// `"shop"` and `"shop::"` both yield module names like `shop::catalog`.
    #[must_use]
    pub fn new(namespace: Option<&str>) -> Self {
        Self {
            namespace_prefix: normalize_namespace(namespace),
        }
    }

    #[must_use]
    pub fn namespace_prefix(&self) -> &str {
        &self.namespace_prefix
    }

    /// Qualify a module short name with the namespace prefix
    #[must_use]
    pub fn qualify(&self, short_name: &str) -> String {
        let mut name = String::with_capacity(self.namespace_prefix.len() + short_name.len());
        name.push_str(&self.namespace_prefix);
        name.push_str(short_name);
        name
    }

    /// Parse a resource path into target and residue.
    ///
    /// The operation name falls back to `verb` (expected lower-cased) when the
    /// second segment is absent, empty or `"0"`.
    #[must_use]
    pub fn route(&self, path_info: &str, verb: &str) -> RouteMatch {
        let (short_module, operation, residue) = Route::parse(path_info).into_parts();
        let operation = match operation {
            Some(op) if !op.is_empty() && op != "0" => op,
            _ => verb.to_string(),
        };
        let target = TargetRef {
            module: self.qualify(&short_module),
            operation,
        };

        debug!(
            path_info = %path_info,
            module = %target.module,
            operation = %target.operation,
            residue = ?residue,
            "Route parsed"
        );

        RouteMatch { target, residue }
    }
}

fn normalize_namespace(namespace: Option<&str>) -> String {
    match namespace {
        None | Some("") => String::new(),
        Some(ns) if ns.ends_with(NAMESPACE_SEPARATOR) => ns.to_string(),
        Some(ns) => format!("{ns}{NAMESPACE_SEPARATOR}"),
    }
}
