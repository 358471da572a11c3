//! Errors that render as HTTP problem responses

pub mod chain;
pub mod response;
pub mod structured;

pub use response::{BuildError, ErrorResponse, ErrorResponseBuilder, SimpleErrorResponse};
pub use structured::{BoxError, StructuredError};
