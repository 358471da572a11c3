//! axum glue: turning [`ErrorResponse`] values into `application/problem+json` responses

pub mod middleware;
pub mod openapi;

use axum::http::header::{HeaderValue, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::errors::{ErrorResponse, SimpleErrorResponse, StructuredError};
use crate::problem::ProblemDetail;

/// Media type of RFC 9457 JSON problem bodies
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Problem attached to a rendered response's extensions
///
/// Lets later layers (see [`middleware::problem_middleware`]) enrich and log the problem
/// after the handler has returned. `diagnostic` holds the composed error message,
/// including causes; it is never written to the response body.
#[derive(Debug, Clone)]
pub struct RenderedProblem {
    pub body: ProblemDetail,
    pub diagnostic: String,
}

/// Wrapper giving any [`ErrorResponse`] an [`IntoResponse`] implementation
#[derive(Debug, Clone)]
pub struct ProblemResponse<E>(pub E);

impl<E: ErrorResponse> From<E> for ProblemResponse<E> {
    fn from(error: E) -> Self {
        Self(error)
    }
}

impl<E: ErrorResponse> IntoResponse for ProblemResponse<E> {
    fn into_response(self) -> Response {
        let diagnostic = self.0.body().to_string();
        into_problem_response(&self.0, diagnostic)
    }
}

impl IntoResponse for StructuredError {
    fn into_response(self) -> Response {
        let diagnostic = self.to_string();
        into_problem_response(&self, diagnostic)
    }
}

impl IntoResponse for SimpleErrorResponse {
    fn into_response(self) -> Response {
        ProblemResponse(self).into_response()
    }
}

/// Render `error` as a problem response
///
/// `diagnostic` is the composed message (causes included) handed to later layers for
/// logging. Status codes that can't be a final response (outside 200..=999) are sent as
/// 500; the body keeps whatever status it carries.
pub fn into_problem_response<E>(error: &E, diagnostic: String) -> Response
where
    E: ErrorResponse + ?Sized,
{
    let status = StatusCode::from_u16(error.status_code())
        .ok()
        .filter(|status| !status.is_informational())
        .unwrap_or_else(|| {
            warn!(
                status = error.status_code(),
                "Status code cannot be a final response, responding with 500"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        });

    let body = error.body().clone();
    let bytes = encode_problem(&body);

    let mut response = (status, bytes).into_response();
    let headers = response.headers_mut();
    for (name, value) in error.headers() {
        headers.append(name.clone(), value.clone());
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_PROBLEM_JSON));

    response
        .extensions_mut()
        .insert(RenderedProblem { body, diagnostic });
    response
}

/// Serialize a problem body; an empty body is sent if that somehow fails
pub(crate) fn encode_problem(body: &ProblemDetail) -> Vec<u8> {
    match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to encode problem body: {}", e);
            Vec::new()
        }
    }
}
