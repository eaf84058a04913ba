use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{MetadataError, ParamMeta, ParamMetaList, ScalarType};

/// Turns an operation's raw declaration text into ordered parameter metadata.
///
/// Implementations may read any declaration format (doc blocks, sidecar tables,
/// generated code) as long as they produce the same ordered mapping.
pub trait MetadataResolver: Send + Sync {
    /// Resolve a declaration into parameter metadata
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] when the declaration is malformed.
    fn resolve(&self, declaration: &str) -> Result<ParamMetaList, MetadataError>;
}

// `@param <type> $<name> [text] [@source <EXPR>]`
static PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@param\s+(\S+)\s+\$(\w+)(?:.*?@source\s+(\S+))?")
        .expect("@param regex should be valid")
});

// `@source $<name> <EXPR>`
static SOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@source\s+\$(\w+)\s+(\S+)").expect("@source regex should be valid")
});

/// Resolver for doc-comment style declaration blocks.
///
/// ```text
/// /**
///  * Look up a catalog entry.
///  * @param int $id
///  * @source $id PATH.0
///  * @param bool $verbose @source GET.verbose
///  */
/// ```
///
/// Lines that are not `@param`/`@source` tags are ignored, so free-form
/// description text and unrelated tags (`@return`, `@throws`) are allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocBlockResolver;

impl DocBlockResolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Strip comment decoration (`/**`, `*/`, `*`, `///`, `//!`) from a line.
fn clean_line(line: &str) -> &str {
    let mut line = line.trim();
    for prefix in ["/**", "/*", "//!", "///", "//"] {
        if let Some(rest) = line.strip_prefix(prefix) {
            line = rest;
            break;
        }
    }
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest;
    }
    line.trim().trim_start_matches('*').trim()
}

impl MetadataResolver for DocBlockResolver {
    fn resolve(&self, declaration: &str) -> Result<ParamMetaList, MetadataError> {
        let mut params = ParamMetaList::new();
        // @source lines may precede the @param they refer to
        let mut pending_sources: Vec<(String, String)> = Vec::new();

        for raw in declaration.lines() {
            let line = clean_line(raw);
            if line.starts_with("@param") {
                let caps = PARAM_RE
                    .captures(line)
                    .ok_or_else(|| MetadataError::MalformedTag {
                        line: line.to_string(),
                    })?;
                let (Some(tag), Some(name)) = (caps.get(1), caps.get(2)) else {
                    return Err(MetadataError::MalformedTag {
                        line: line.to_string(),
                    });
                };
                let ty: ScalarType = tag.as_str().parse()?;
                params.insert(ParamMeta {
                    name: name.as_str().to_string(),
                    source: caps.get(3).map(|m| m.as_str().to_string()),
                    ty,
                });
            } else if line.starts_with("@source") {
                let caps = SOURCE_RE
                    .captures(line)
                    .ok_or_else(|| MetadataError::MalformedTag {
                        line: line.to_string(),
                    })?;
                if let (Some(name), Some(expr)) = (caps.get(1), caps.get(2)) {
                    pending_sources.push((name.as_str().to_string(), expr.as_str().to_string()));
                }
            }
        }

        for (name, expr) in pending_sources {
            match params.get_mut(&name) {
                Some(meta) => meta.source = Some(expr),
                None => return Err(MetadataError::UndeclaredSource { param: name }),
            }
        }

        debug!(
            params_count = params.len(),
            params = ?params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "Declaration resolved"
        );
        Ok(params)
    }
}
