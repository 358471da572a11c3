use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{HeaderMap, StatusCode};
use serde_json::Value;
use std::error::Error;
use std::fmt;

use super::chain;
use super::response::{parse_header, BuildError, ErrorResponse};
use crate::problem::ProblemDetail;
use crate::status;

/// Boxed cause carried by a [`StructuredError`]
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Error carrying an HTTP status, response headers and a problem body
///
/// Can be returned as is, or wrapped by a more specific error that fills in the
/// problem `type`, `detail` or extension members. The cause is kept for diagnostics
/// only: it shows up in [`Display`](fmt::Display) and [`Error::source`], never in the
/// body unless copied there explicitly.
///
/// By default the body's `status` comes from the status passed in, and its `title`
/// from that status' reason phrase when the status is well-known. `instance` is left
/// unset so the rendering layer can fill it from the request path.
#[derive(Debug)]
pub struct StructuredError {
    status: u16,
    headers: HeaderMap,
    body: ProblemDetail,
    cause: Option<BoxError>,
}

impl StructuredError {
    /// Error for a well-known status, without a cause
    pub fn new(status: StatusCode) -> Self {
        Self::from_raw(status.as_u16(), None)
    }

    /// Error for a well-known status, caused by `cause`
    pub fn with_cause(status: StatusCode, cause: impl Into<BoxError>) -> Self {
        Self::from_raw(status.as_u16(), Some(cause.into()))
    }

    /// Error for any status value, including ones that aren't registered
    pub fn from_raw(status: u16, cause: Option<BoxError>) -> Self {
        Self::with_body(status, ProblemDetail::for_raw_status_code(status), cause)
    }

    /// Error with a caller-built body, used as given
    ///
    /// Nothing in `body` is re-derived from `status`; keeping the two consistent is up
    /// to the caller.
    pub fn with_body(status: u16, body: ProblemDetail, cause: Option<BoxError>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
            cause,
        }
    }

    /// Locate a [`StructuredError`] anywhere in `error`'s source chain, including `error` itself
    pub fn find<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a StructuredError> {
        chain::find_in_chain::<StructuredError>(error)
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Append a header given as strings, failing on invalid input
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), BuildError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.append(name, value);
        Ok(())
    }

    pub fn body_mut(&mut self) -> &mut ProblemDetail {
        &mut self.body
    }

    pub fn set_type(&mut self, problem_type: impl Into<String>) {
        self.body.set_type(problem_type);
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.body.set_title(title);
    }

    pub fn set_detail(&mut self, detail: Option<String>) {
        self.body.set_detail(detail);
    }

    pub fn set_instance(&mut self, instance: Option<String>) {
        self.body.set_instance(instance);
    }

    /// Add an extension member; standard member names are refused
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) -> bool {
        self.body.set_property(name, value)
    }

    pub fn with_type(mut self, problem_type: impl Into<String>) -> Self {
        self.set_type(problem_type);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(Some(title.into()));
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.set_detail(Some(detail.into()));
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.set_instance(Some(instance.into()));
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(name, value);
        self
    }

    /// The underlying cause, if any
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// This error's own message, without its causes
    ///
    /// `<status>[, headers=<headers>], <body>`, where the status is rendered with its
    /// reason phrase when well-known and as the bare number otherwise.
    pub fn message(&self) -> String {
        let mut message = status::describe(self.status);
        if !self.headers.is_empty() {
            message.push_str(&format!(", headers={:?}", self.headers));
        }
        message.push_str(&format!(", {}", self.body));
        message
    }
}

impl ErrorResponse for StructuredError {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn body(&self) -> &ProblemDetail {
        &self.body
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&chain::build_message(&self.message(), self.source()))
    }
}

impl Error for StructuredError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::RETRY_AFTER;
    use serde_json::json;

    #[derive(Debug, thiserror::Error)]
    enum OrderError {
        #[error("order rejected")]
        Rejected(#[source] StructuredError),
    }

    #[test]
    fn test_not_found_without_cause() {
        let err = StructuredError::new(StatusCode::NOT_FOUND);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.body().status(), 404);
        assert_eq!(err.body().title(), Some("Not Found"));
        assert_eq!(err.body().detail(), None);
        assert!(err.headers().is_empty());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_status_is_kept_verbatim() {
        for code in [100, 200, 404, 418, 499, 599, 999, 0, 1000, u16::MAX] {
            let err = StructuredError::from_raw(code, None);
            assert_eq!(err.status_code(), code);
            assert_eq!(err.body().status(), code);
        }
    }

    #[test]
    fn test_well_known_titles() {
        let cases = [
            (100, "Continue"),
            (200, "OK"),
            (400, "Bad Request"),
            (404, "Not Found"),
            (418, "I'm a teapot"),
            (429, "Too Many Requests"),
            (500, "Internal Server Error"),
            (503, "Service Unavailable"),
        ];
        for (code, title) in cases {
            let err = StructuredError::from_raw(code, None);
            assert_eq!(err.body().title(), Some(title), "title for {}", code);
        }
    }

    #[test]
    fn test_unresolvable_statuses_have_no_title() {
        for code in [499, 599, 999, 0, 1000] {
            let err = StructuredError::from_raw(code, None);
            assert_eq!(err.body().title(), None, "title for {}", code);
        }
    }

    #[test]
    fn test_extension_cannot_override_standard_members() {
        let mut err = StructuredError::new(StatusCode::NOT_FOUND);
        assert!(!err.set_property("status", 200));
        assert!(!err.set_property("title", "OK"));

        let json = serde_json::to_string(err.body()).unwrap();
        let reparsed: ProblemDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed.status(), 404);
        assert_eq!(reparsed.title(), Some("Not Found"));
        assert_eq!(json.matches("\"status\"").count(), 1);
    }

    #[test]
    fn test_unregistered_status_with_cause() {
        let err = StructuredError::from_raw(599, Some("timeout".into()));
        assert_eq!(err.status_code(), 599);
        assert_eq!(err.status(), None);
        assert_eq!(err.body().title(), None);

        let message = err.to_string();
        assert!(message.contains("599"));
        assert!(message.contains("timeout"));
        assert_eq!(
            message,
            "599, ProblemDetail[type='about:blank', status=599]; nested exception is timeout"
        );
    }

    #[test]
    fn test_custom_body_is_used_as_is() {
        let body = ProblemDetail::new(400).with_detail("bad field X");
        let err = StructuredError::with_body(400, body, None);
        assert_eq!(err.body().detail(), Some("bad field X"));
        assert_eq!(err.body().title(), None);

        let body = ProblemDetail::new(400).with_title("Invalid order");
        let err = StructuredError::with_body(400, body, None);
        assert_eq!(err.body().title(), Some("Invalid order"));
    }

    #[test]
    fn test_setters_pass_through_to_body() {
        let mut err = StructuredError::new(StatusCode::CONFLICT);
        err.set_type("https://example.com/probs/out-of-stock");
        err.set_title(Some("Out of stock".to_string()));
        err.set_detail(Some("x".to_string()));
        err.set_instance(Some("/orders/42".to_string()));
        err.set_property("sku", "A-100");

        let body = err.body();
        assert_eq!(body.problem_type(), "https://example.com/probs/out-of-stock");
        assert_eq!(body.title(), Some("Out of stock"));
        assert_eq!(body.detail(), Some("x"));
        assert_eq!(body.instance(), Some("/orders/42"));
        assert_eq!(body.property("sku"), Some(&json!("A-100")));
        assert_eq!(body.status(), 409);

        err.set_title(None);
        assert_eq!(err.body().title(), None);
    }

    #[test]
    fn test_headers_round_trip() {
        let mut err = StructuredError::new(StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.headers().is_empty());

        err.headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from_static("120"));
        err.add_header("x-maintenance", "db").unwrap();
        err.add_header("x-maintenance", "cache").unwrap();

        assert_eq!(err.headers().get(RETRY_AFTER).unwrap(), "120");
        let values: Vec<_> = err.headers().get_all("x-maintenance").iter().collect();
        assert_eq!(values, vec!["db", "cache"]);
    }

    #[test]
    fn test_add_header_rejects_invalid_name() {
        let mut err = StructuredError::new(StatusCode::BAD_REQUEST);
        assert!(err.add_header("", "x").is_err());
        assert!(err.headers().is_empty());
    }

    #[test]
    fn test_message_includes_headers_only_when_present() {
        let err = StructuredError::new(StatusCode::NOT_FOUND);
        assert_eq!(
            err.to_string(),
            "404 Not Found, ProblemDetail[type='about:blank', title='Not Found', status=404]"
        );

        let err = StructuredError::new(StatusCode::TOO_MANY_REQUESTS)
            .with_header(RETRY_AFTER, HeaderValue::from_static("30"));
        let message = err.to_string();
        assert!(message.starts_with("429 Too Many Requests, headers="));
        assert!(message.contains("retry-after"));
        assert!(message.ends_with("status=429]"));
    }

    #[test]
    fn test_nested_structured_causes_are_unwrapped() {
        let inner = StructuredError::from_raw(504, Some("upstream timed out".into()));
        let outer = StructuredError::with_cause(StatusCode::BAD_GATEWAY, inner);

        assert_eq!(
            outer.to_string(),
            "502 Bad Gateway, ProblemDetail[type='about:blank', title='Bad Gateway', status=502]; \
             nested exception is 504 Gateway Timeout, ProblemDetail[type='about:blank', title='Gateway Timeout', status=504]; \
             nested exception is upstream timed out"
        );
    }

    #[test]
    fn test_cause_does_not_leak_into_body() {
        let err = StructuredError::with_cause(
            StatusCode::INTERNAL_SERVER_ERROR,
            "password authentication failed for user app",
        );
        let body = serde_json::to_string(err.body()).unwrap();
        assert!(!body.contains("password"));
        assert_eq!(err.cause().unwrap().to_string(), "password authentication failed for user app");
    }

    #[test]
    fn test_payload_survives_wrapping() {
        let err = StructuredError::new(StatusCode::UNPROCESSABLE_ENTITY)
            .with_detail("quantity must be positive")
            .with_header(RETRY_AFTER, HeaderValue::from_static("5"));
        let wrapped = OrderError::Rejected(err);

        let found = StructuredError::find(&wrapped).unwrap();
        assert_eq!(found.status_code(), 422);
        assert_eq!(found.body().detail(), Some("quantity must be positive"));
        assert_eq!(found.headers().get(RETRY_AFTER).unwrap(), "5");

        let any: anyhow::Error = wrapped.into();
        let found = StructuredError::find(&*any).unwrap();
        assert_eq!(found.status_code(), 422);
    }

    #[test]
    fn test_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<StructuredError>();
    }
}
