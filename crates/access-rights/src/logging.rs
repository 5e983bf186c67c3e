//! Helpers for log messages built from remote or user-supplied text.

use std::borrow::Cow;

/// Maximum number of payload bytes quoted in a parse-failure log entry.
pub const PREVIEW_BYTES: usize = 500;

/// Escape `%` as `%%` so downstream log backends never read it as a format
/// directive.
pub fn log_safe(msg: &str) -> Cow<'_, str> {
    if msg.contains('%') {
        Cow::Owned(msg.replace('%', "%%"))
    } else {
        Cow::Borrowed(msg)
    }
}

/// Lossy UTF-8 rendering of at most [`PREVIEW_BYTES`] bytes of `payload`.
pub fn preview(payload: &[u8]) -> String {
    let end = payload.len().min(PREVIEW_BYTES);
    String::from_utf8_lossy(&payload[..end]).into_owned()
}
