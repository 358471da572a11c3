use utoipa::OpenApi;

use crate::problem::ProblemDetail;

/// OpenAPI components for problem responses, for merging into a service's own document
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Problem Responses",
        version = "0.1.0",
        description = "RFC 9457 problem details returned by failing requests, served as application/problem+json."
    ),
    components(schemas(ProblemDetail))
)]
pub struct ProblemApiDoc;
