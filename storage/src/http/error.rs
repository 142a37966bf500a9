use std::error::Error;
use std::fmt;

/// The closed set of error kinds reported by this crate.
///
/// Every [`crate::http::Error`] maps to exactly one `Code`, regardless of whether the failure came
/// from the service, from libcurl, or from local validation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Code {
    /// Malformed JSON input, missing required field, unencodable value.
    InvalidArgument,
    /// Missing key lookups and HTTP 404.
    NotFound,
    /// HTTP 412, a precondition header or query parameter did not match.
    FailedPrecondition,
    /// HTTP 401 and 403.
    PermissionDenied,
    /// HTTP 409.
    AlreadyExists,
    /// HTTP 429.
    ResourceExhausted,
    /// HTTP 503 and transport connect failures.
    Unavailable,
    /// Everything else.
    Unknown,
}

impl Code {
    /// Maps an HTTP status code to an error kind. 2xx codes are not errors and map to `Unknown`
    /// if they ever reach this function.
    pub fn from_http_status(status: u32) -> Self {
        match status {
            401 | 403 => Code::PermissionDenied,
            404 => Code::NotFound,
            409 => Code::AlreadyExists,
            412 => Code::FailedPrecondition,
            429 => Code::ResourceExhausted,
            503 => Code::Unavailable,
            _ => Code::Unknown,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::NotFound => "NOT_FOUND",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Code::Unavailable => "UNAVAILABLE",
            Code::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Error bodies longer than this are truncated in messages.
const BODY_SNIPPET_LIMIT: usize = 256;

/// An error response returned from Google Cloud Storage.
///
/// See the [`HTTP status and error codes for JSON`][1] documentation for more details.
///
/// [1]: https://cloud.google.com/storage/docs/json_api/v1/status-codes
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// An HTTP status value, without the textual description.
    ///
    /// Example values include: `400` (Bad Request), `401` (Unauthorized), and `404` (Not Found).
    pub code: u32,

    /// A container for the error details.
    #[serde(default)]
    pub errors: Vec<ErrorResponseItem>,

    /// Description of the error. Same as `errors.message`.
    #[serde(default)]
    pub message: String,
}

impl ErrorResponse {
    /// Builds an error from a non-2xx response. The body is parsed as a GCS error document when
    /// possible, otherwise a snippet of the raw body becomes the message.
    pub fn from_http_response(status: u32, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorWrapper>(body) {
            Ok(wrapper) => ErrorResponse {
                // the HTTP status wins over whatever the body claims
                code: status,
                ..wrapper.error
            },
            Err(_) => ErrorResponse {
                code: status,
                errors: vec![],
                message: body_snippet(body),
            },
        }
    }

    /// The error kind for this response.
    pub fn status(&self) -> Code {
        Code::from_http_status(self.code)
    }

    /// Returns `true` if the error is retriable according to the [GCS documentation][1].
    ///
    /// [1]: https://cloud.google.com/storage/docs/retry-strategy#retryable
    pub fn is_retriable(&self) -> bool {
        matches!(self.code, 408 | 429 | 500..=599)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HTTP {} [{}]: {}", self.code, self.status(), self.message)
    }
}

impl Error for ErrorResponse {}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponseItem {
    /// The scope of the error. Example values include: `global` and `push`.
    #[serde(default)]
    pub domain: String,

    /// The specific item within the `locationType` that caused the error. For example, if you
    /// specify an invalid value for a parameter, the `location` will be the name of the parameter.
    ///
    /// Example values include: `Authorization`, `project`, and `projection`.
    pub location: Option<String>,

    /// The location or part of the request that caused the error. Use with `location` to pinpoint
    /// the error. For example, if you specify an invalid value for a parameter, the `locationType`
    /// will be `parameter` and the `location` will be the name of the parameter.
    ///
    /// Example values include `header` and `parameter`.
    pub location_type: Option<String>,

    /// Description of the error.
    ///
    /// Example values include `Invalid argument`, `Login required`, and
    /// `Required parameter: project`.
    #[serde(default)]
    pub message: String,

    /// Example values include `invalid`, `invalidParameter`, and `required`.
    #[serde(default)]
    pub reason: String,
}

impl fmt::Display for ErrorResponseItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.message.fmt(f)
    }
}

/// The GCS error response JSON format contains an extra object level that is inconvenient to include in our
/// error.
#[derive(serde::Deserialize)]
pub(crate) struct ErrorWrapper {
    pub(crate) error: ErrorResponse,
}

fn body_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= BODY_SNIPPET_LIMIT {
        return text.into_owned();
    }
    let mut end = BODY_SNIPPET_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(Code::from_http_status(404), Code::NotFound);
        assert_eq!(Code::from_http_status(412), Code::FailedPrecondition);
        assert_eq!(Code::from_http_status(401), Code::PermissionDenied);
        assert_eq!(Code::from_http_status(403), Code::PermissionDenied);
        assert_eq!(Code::from_http_status(409), Code::AlreadyExists);
        assert_eq!(Code::from_http_status(429), Code::ResourceExhausted);
        assert_eq!(Code::from_http_status(503), Code::Unavailable);
        assert_eq!(Code::from_http_status(302), Code::Unknown);
        assert_eq!(Code::from_http_status(500), Code::Unknown);
    }

    #[test]
    fn parse_error_document() {
        let body = r#"{"error": {"code": 404, "message": "No such object: b/o",
            "errors": [{"domain": "global", "reason": "notFound", "message": "No such object: b/o"}]}}"#;
        let err = ErrorResponse::from_http_response(404, body.as_bytes());
        assert_eq!(err.status(), Code::NotFound);
        assert_eq!(err.message, "No such object: b/o");
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].reason, "notFound");
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn raw_body_is_truncated() {
        let body = "x".repeat(1000);
        let err = ErrorResponse::from_http_response(503, body.as_bytes());
        assert_eq!(err.status(), Code::Unavailable);
        assert!(err.is_retriable());
        assert_eq!(err.message.len(), BODY_SNIPPET_LIMIT + 3);
    }
}
