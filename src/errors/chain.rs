//! Walking `source()` chains
//!
//! All walks are explicit loops capped at [`MAX_CAUSE_DEPTH`] so that a misbehaving
//! `source()` implementation can't make diagnostics spin forever.

use std::error::Error;

use super::structured::StructuredError;

/// Maximum number of `source()` hops followed by any walk in this module
pub const MAX_CAUSE_DEPTH: usize = 32;

/// Compose a diagnostic message from `message` and its cause chain.
///
/// Each cause is appended as `; nested exception is <cause>`. A [`StructuredError`] cause
/// contributes only its own message and the walk continues into its cause; any other
/// error contributes its display text and ends the walk, since that text usually
/// already covers whatever it wraps.
pub fn build_message(message: &str, cause: Option<&(dyn Error + 'static)>) -> String {
    let mut composed = message.to_string();
    let mut next = cause;
    let mut depth = 0;

    while let Some(cause) = next {
        if depth == MAX_CAUSE_DEPTH {
            break;
        }
        depth += 1;

        composed.push_str("; nested exception is ");
        match cause.downcast_ref::<StructuredError>() {
            Some(structured) => {
                composed.push_str(&structured.message());
                next = structured.source();
            }
            None => {
                composed.push_str(&plain_message(cause));
                next = None;
            }
        }
    }

    composed
}

/// Display text of an error, falling back to its debug form when the display is empty
fn plain_message(error: &(dyn Error + 'static)) -> String {
    let message = error.to_string();
    if message.is_empty() {
        format!("{:?}", error)
    } else {
        message
    }
}

/// Innermost cause of `error`, or `None` if it has no cause at all
pub fn root_cause<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    let mut root = None;
    let mut current = error;
    for _ in 0..MAX_CAUSE_DEPTH {
        match current.source() {
            Some(cause) => {
                root = Some(cause);
                current = cause;
            }
            None => break,
        }
    }
    root
}

/// Root cause if there is one, otherwise `error` itself
pub fn most_specific_cause<'a>(error: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    root_cause(error).unwrap_or(error)
}

/// First error of type `T` in the chain starting at `error` (inclusive)
pub fn find_in_chain<'a, T>(error: &'a (dyn Error + 'static)) -> Option<&'a T>
where
    T: Error + 'static,
{
    let mut current = error;
    for _ in 0..=MAX_CAUSE_DEPTH {
        if let Some(found) = current.downcast_ref::<T>() {
            return Some(found);
        }
        current = current.source()?;
    }
    None
}
