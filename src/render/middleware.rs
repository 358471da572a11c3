use axum::{
    body::Body,
    extract::{OriginalUri, Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::{encode_problem, RenderedProblem};
use crate::config::ProblemConfig;

/// Middleware that finishes and logs problem responses
///
/// Runs after the handler. If the response carries a [`RenderedProblem`] whose body has
/// no `instance`, the request path is filled in and the body re-encoded. The composed
/// diagnostic (causes included) is logged here, never sent to the client.
///
/// Install with `axum::middleware::from_fn_with_state(config, problem_middleware)`.
pub async fn problem_middleware(
    State(config): State<ProblemConfig>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();
    // Nested routers strip their prefix from the request URI
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let mut response = next.run(request).await;

    let Some(mut rendered) = response.extensions_mut().remove::<RenderedProblem>() else {
        return response;
    };

    let status = response.status();
    if status.is_server_error() {
        error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            problem_type = %rendered.body.problem_type(),
            error = %rendered.diagnostic,
            "Request failed with problem response"
        );
    } else if config.log_client_errors {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            problem_type = %rendered.body.problem_type(),
            error = %rendered.diagnostic,
            "Request failed with problem response"
        );
    } else {
        debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            problem_type = %rendered.body.problem_type(),
            error = %rendered.diagnostic,
            "Request failed with problem response"
        );
    }

    if config.fill_instance_from_path && rendered.body.set_instance_if_absent(path) {
        *response.body_mut() = Body::from(encode_problem(&rendered.body));
        response.headers_mut().remove(CONTENT_LENGTH);
    }

    response.extensions_mut().insert(rendered);
    response
}
