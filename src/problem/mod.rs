//! RFC 9457 problem details body

pub mod detail;
mod schema;

pub use detail::{ProblemDetail, BLANK_TYPE};
