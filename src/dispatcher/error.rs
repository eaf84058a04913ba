use http::{HeaderValue, Response, StatusCode};
use std::fmt;

/// Response header carrying the rejection message
pub const ERROR_HEADER: &str = "x-error";

/// Why a request was rejected before invocation.
///
/// Every variant carries a human-readable diagnostic that includes the
/// resource path of the rejected request. Rejections are never fatal to the
/// process; the caller decides how to render them (see [`DispatchError::to_response`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No module registered under the resolved name (404)
    TargetNotFound {
        module: String,
        path_info: String,
    },
    /// Module exists but lacks the dispatchable marker (400)
    NotDispatchable {
        module: String,
        path_info: String,
    },
    /// Module has no operation with the resolved name (400)
    OperationNotFound {
        module: String,
        operation: String,
        path_info: String,
    },
    /// Operation is not public and static, or too few arguments could be bound (400)
    IllegalInvocation {
        operation: String,
        required: usize,
        bound: usize,
        path_info: String,
    },
}

impl DispatchError {
    /// Status classification of the rejection
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::TargetNotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::NotDispatchable { .. }
            | DispatchError::OperationNotFound { .. }
            | DispatchError::IllegalInvocation { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Numeric status code (400, 404)
    #[must_use]
    pub fn code(&self) -> u16 {
        self.status().as_u16()
    }

    /// Resource path of the rejected request
    #[must_use]
    pub fn path_info(&self) -> &str {
        match self {
            DispatchError::TargetNotFound { path_info, .. }
            | DispatchError::NotDispatchable { path_info, .. }
            | DispatchError::OperationNotFound { path_info, .. }
            | DispatchError::IllegalInvocation { path_info, .. } => path_info,
        }
    }

    /// Status line as sent on the wire, e.g. `HTTP/1.0 404 Not Found`
    #[must_use]
    pub fn status_line(&self) -> String {
        let status = self.status();
        format!(
            "HTTP/1.0 {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
    }

    /// Build an empty-bodied response with the status and an `X-Error` header.
    ///
    /// Messages that are not valid header values (control characters,
    /// non-visible bytes) are sent without the header.
    #[must_use]
    pub fn to_response(&self) -> Response<()> {
        let mut response = Response::new(());
        *response.status_mut() = self.status();
        if let Ok(value) = HeaderValue::from_str(&self.to_string()) {
            response.headers_mut().insert(ERROR_HEADER, value);
        }
        response
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::TargetNotFound { module, path_info } => {
                write!(f, "Module \"{module}\" not found, path: {path_info}")
            }
            DispatchError::NotDispatchable { module, path_info } => {
                write!(
                    f,
                    "Module \"{module}\" is not dispatchable, path: {path_info}"
                )
            }
            DispatchError::OperationNotFound {
                module,
                operation,
                path_info,
            } => {
                write!(
                    f,
                    "Operation \"{operation}\" not found on module \"{module}\", path: {path_info}"
                )
            }
            DispatchError::IllegalInvocation {
                operation,
                required,
                bound,
                path_info,
            } => {
                write!(
                    f,
                    "Operation \"{operation}\" is not public static or has too few parameters \
                    ({bound} bound, {required} required), path: {path_info}"
                )
            }
        }
    }
}

impl std::error::Error for DispatchError {}
