//! Best-effort resolution of raw status codes to well-known HTTP statuses

use axum::http::StatusCode;

/// Resolve a raw code to a [`StatusCode`], but only if it has a registered reason phrase.
///
/// Codes that `http` can represent but that carry no canonical reason (e.g. 499, 599)
/// resolve to `None`, the same as codes outside 100..=999.
pub fn resolve(code: u16) -> Option<StatusCode> {
    StatusCode::from_u16(code)
        .ok()
        .filter(|status| status.canonical_reason().is_some())
}

/// Canonical reason phrase for a well-known code
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    resolve(code).and_then(|status| status.canonical_reason())
}

/// Human-readable status used in diagnostics: `"404 Not Found"` or just `"599"`.
pub fn describe(code: u16) -> String {
    match reason_phrase(code) {
        Some(reason) => format!("{} {}", code, reason),
        None => code.to_string(),
    }
}
