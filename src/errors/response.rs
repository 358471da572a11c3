use axum::http::header::{HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue};
use axum::http::{HeaderMap, StatusCode};
use serde_json::Value;

use crate::problem::ProblemDetail;
use crate::status;

lazy_static::lazy_static! {
    static ref EMPTY_HEADERS: HeaderMap = HeaderMap::new();
}

/// A failure that knows how it should be rendered as an HTTP error response
///
/// Implementors expose the status, extra response headers, and a problem body.
/// All accessors are plain reads; rendering infrastructure may call them any number
/// of times.
pub trait ErrorResponse {
    /// Raw status code, returned as given even if it isn't a registered status
    fn status_code(&self) -> u16;

    /// Headers to add to the response
    fn headers(&self) -> &HeaderMap {
        &EMPTY_HEADERS
    }

    /// Problem body for the response
    fn body(&self) -> &ProblemDetail;

    /// The status as a well-known [`StatusCode`], if it resolves to one
    fn status(&self) -> Option<StatusCode> {
        status::resolve(self.status_code())
    }
}

impl<T: ErrorResponse + ?Sized> ErrorResponse for &T {
    fn status_code(&self) -> u16 {
        (**self).status_code()
    }

    fn headers(&self) -> &HeaderMap {
        (**self).headers()
    }

    fn body(&self) -> &ProblemDetail {
        (**self).body()
    }
}

impl<T: ErrorResponse + ?Sized> ErrorResponse for Box<T> {
    fn status_code(&self) -> u16 {
        (**self).status_code()
    }

    fn headers(&self) -> &HeaderMap {
        (**self).headers()
    }

    fn body(&self) -> &ProblemDetail {
        (**self).body()
    }
}

/// Errors raised while assembling an error response from untyped input
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid header name {name:?}")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: InvalidHeaderName,
    },

    #[error("invalid value for header {name:?}")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: InvalidHeaderValue,
    },
}

/// Parse a header pair, failing on the first invalid part
pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), BuildError> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|source| BuildError::InvalidHeaderName {
            name: name.to_string(),
            source,
        })?;
    let header_value =
        HeaderValue::from_str(value).map_err(|source| BuildError::InvalidHeaderValue {
            name: name.to_string(),
            source,
        })?;
    Ok((header_name, header_value))
}

/// [`ErrorResponse`] without a cause, for failures that don't need to travel as errors
#[derive(Debug, Clone)]
pub struct SimpleErrorResponse {
    status: u16,
    headers: HeaderMap,
    body: ProblemDetail,
}

impl SimpleErrorResponse {
    pub fn builder(status: StatusCode, detail: impl Into<String>) -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(status, detail)
    }
}

impl ErrorResponse for SimpleErrorResponse {
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

/// Fluent construction of a [`SimpleErrorResponse`]
#[derive(Debug, Clone)]
pub struct ErrorResponseBuilder {
    status: u16,
    headers: HeaderMap,
    body: ProblemDetail,
}

impl ErrorResponseBuilder {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::from_raw(status.as_u16(), detail)
    }

    /// Start from any status code; the title is only defaulted for well-known codes
    pub fn from_raw(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ProblemDetail::for_raw_status_code(status).with_detail(detail),
        }
    }

    /// Append a header, failing immediately if the name or value is invalid
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, BuildError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.append(name, value);
        Ok(self)
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn problem_type(mut self, problem_type: impl Into<String>) -> Self {
        self.body.set_type(problem_type);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.body.set_title(Some(title.into()));
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.body.set_detail(Some(detail.into()));
        self
    }

    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.body.set_instance(Some(instance.into()));
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.set_property(name, value);
        self
    }

    pub fn build(self) -> SimpleErrorResponse {
        SimpleErrorResponse {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}
