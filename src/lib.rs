//! HTTP error values that render as RFC 9457 problem details

pub mod config;
pub mod errors;
pub mod problem;
pub mod render;
pub mod status;

pub use errors::{
    BuildError, ErrorResponse, ErrorResponseBuilder, SimpleErrorResponse, StructuredError,
};
pub use problem::{ProblemDetail, BLANK_TYPE};
pub use render::{ProblemResponse, APPLICATION_PROBLEM_JSON};
