pub mod health_handlers;
pub mod user_handlers;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Parses a JSON request body, treating an empty body as `{}`.
///
/// Bodies are read as raw bytes rather than through the `Json` extractor so that
/// a missing `Content-Type` is accepted and a malformed body still produces the
/// JSON error envelope.
pub fn parse_json_body<T>(body: &Bytes) -> Result<T>
where
    T: DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_str("{}")?);
    }

    match serde_json::from_slice(body) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!("Failed to parse request body: {}", err);
            Err(err.into())
        }
    }
}
