//! Data-URI codec for cropped image payloads.
//!
//! The client sends the cropped image as `data:<mime>;base64,<payload>` or,
//! in degenerate cases, as a bare base64 string. Decoding strips the prefix
//! when present and base64-decodes the rest; no image-format validation
//! happens here, bytes come back exactly as encoded.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed base64 payload in cropped image data URI: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Decode a data URI (or bare base64 string) into raw bytes.
///
/// A blank input is the documented empty case — nothing was cropped yet —
/// and returns `Ok(None)` rather than an error. When the string contains
/// the `base64,` marker, the payload is everything after the first comma;
/// the split is deliberately this lenient (the prefix MIME type is never
/// inspected). Invalid base64 is a hard error, never partial bytes.
pub fn decode(uri: &str) -> Result<Option<Vec<u8>>, DecodeError> {
    if uri.trim().is_empty() {
        return Ok(None);
    }

    let payload = if uri.contains("base64,") {
        uri.split_once(',').map_or(uri, |(_, rest)| rest)
    } else {
        uri
    };

    let bytes = STANDARD.decode(payload)?;
    Ok(Some(bytes))
}

/// Embed raw bytes as a `data:<mime>;base64,` URI.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
