use http::header::CONTENT_TYPE;
use http::Method;
use serde_json::{Map, Value};
use tracing::debug;

use super::form::parse_form;
use crate::ids::{RequestId, REQUEST_ID_HEADER};

/// Everything the dispatcher reads from an inbound request.
///
/// The three conventional data sources are the query map (`GET`), the posted
/// body map (`POST`) and the path residue (`PATH`, derived from `path_info`
/// during routing). The context is an explicit value: nothing is read from or
/// written to process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// Correlation id for log events
    pub request_id: RequestId,
    /// Request verb; its lower-cased name is the fallback operation name
    pub method: Method,
    /// Resource path after the script path, e.g. `/catalog/find/42`
    pub path_info: String,
    /// Parsed query string (nested object)
    pub query: Value,
    /// Parsed posted body (nested object or array)
    pub body: Value,
}

impl RequestContext {
    /// Create a context with empty query and body maps.
    #[must_use]
    pub fn new(method: Method, path_info: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path_info: path_info.into(),
            query: Value::Object(Map::new()),
            body: Value::Object(Map::new()),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Parse and attach a raw query string (`a=1&user[id]=2`).
    #[must_use]
    pub fn with_query_string(self, query: &str) -> Self {
        self.with_query(parse_form(query.as_bytes()))
    }

    /// Build a context from an `http::Request`.
    ///
    /// `script_path` is stripped from the front of the URI path when present
    /// (`/api.php/catalog/find` with script path `/api.php` → `/catalog/find`).
    /// The remaining path is percent-decoded. The body is read as a form for
    /// `application/x-www-form-urlencoded`, as JSON for `application/json`,
    /// and ignored otherwise. An `x-request-id` header is reused when valid.
    #[must_use]
    pub fn from_http<B: AsRef<[u8]>>(req: &http::Request<B>, script_path: Option<&str>) -> Self {
        let uri_path = req.uri().path();
        let path_info = percent_decode(strip_script_path(uri_path, script_path));

        let query = req
            .uri()
            .query()
            .map_or_else(|| Value::Object(Map::new()), |q| parse_form(q.as_bytes()));

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let body = parse_body(content_type, req.body().as_ref());

        let request_id = RequestId::from_header_or_new(
            req.headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
        );

        debug!(
            request_id = %request_id,
            method = %req.method(),
            path_info = %path_info,
            content_type = %content_type,
            "Request context built"
        );

        Self {
            request_id,
            method: req.method().clone(),
            path_info,
            query,
            body,
        }
    }

    /// Lower-cased verb, used as the operation name when the route has none.
    #[must_use]
    pub fn verb(&self) -> String {
        self.method.as_str().to_ascii_lowercase()
    }

    /// Drop the query and body data after a successful dispatch.
    pub fn clear(&mut self) {
        self.query = Value::Object(Map::new());
        self.body = Value::Object(Map::new());
    }
}

fn strip_script_path<'a>(path: &'a str, script_path: Option<&str>) -> &'a str {
    let Some(script) = script_path.map(|s| s.trim_end_matches('/')) else {
        return path;
    };
    if script.is_empty() {
        return path;
    }
    match path.strip_prefix(script) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

fn percent_decode(path: &str) -> String {
    urlencoding::decode(path).map_or_else(|_| path.to_string(), |p| p.into_owned())
}

fn parse_body(content_type: &str, body: &[u8]) -> Value {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "application/x-www-form-urlencoded" => parse_form(body),
        "application/json" => match serde_json::from_slice::<Value>(body) {
            Ok(v @ (Value::Object(_) | Value::Array(_))) => v,
            Ok(_) => Value::Object(Map::new()),
            Err(e) => {
                debug!(error = %e, "Ignoring unparseable JSON body");
                Value::Object(Map::new())
            }
        },
        _ => Value::Object(Map::new()),
    }
}
