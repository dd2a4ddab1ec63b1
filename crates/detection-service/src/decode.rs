//! Embedded-image payload decoding.

use base64::Engine;
use image::DynamicImage;
use thiserror::Error;

/// Payloads must carry the browser data-URL prefix, e.g.
/// `data:image/png;base64,<payload>`.
const EMBEDDED_IMAGE_PREFIX: &str = "data:image";

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload does not declare the embedded-image prefix.
    #[error("invalid image format")]
    InvalidFormat,

    /// The payload did not decode into a supported compressed image.
    #[error("could not decode image: {0}")]
    DecodeFailure(String),
}

/// Decode a base64 data-URL into a pixel buffer.
pub fn decode_embedded_image(payload: &str) -> Result<DynamicImage, DecodeError> {
    if !payload.starts_with(EMBEDDED_IMAGE_PREFIX) {
        return Err(DecodeError::InvalidFormat);
    }

    let encoded = payload
        .split_once(',')
        .map(|(_, rest)| rest)
        .ok_or(DecodeError::InvalidFormat)?;

    let bytes = base64::prelude::BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| DecodeError::DecodeFailure(e.to_string()))?;

    image::load_from_memory(&bytes).map_err(|e| DecodeError::DecodeFailure(e.to_string()))
}
