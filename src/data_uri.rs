use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// Byte payload plus mime type recovered from an encoded image string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("missing ',' separator between header and payload")]
    MissingPayloadSeparator,
    #[error("missing 'data:' scheme prefix")]
    MissingScheme,
    #[error("header must end with a single ';base64' marker")]
    BadBase64Marker,
    #[error("mime type is empty")]
    EmptyMime,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

pub fn encode(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Reverses [`encode`]: splits on the first `,`, takes the mime between
/// `data:` and `;base64`, and decodes the payload byte-for-byte.
pub fn decode(value: &str) -> Result<DecodedImage, DataUriError> {
    let (header, payload) = value
        .split_once(',')
        .ok_or(DataUriError::MissingPayloadSeparator)?;
    let rest = header
        .strip_prefix("data:")
        .ok_or(DataUriError::MissingScheme)?;
    let (mime, marker) = rest.split_once(';').ok_or(DataUriError::BadBase64Marker)?;
    if marker != "base64" {
        return Err(DataUriError::BadBase64Marker);
    }
    if mime.is_empty() {
        return Err(DataUriError::EmptyMime);
    }
    let bytes = BASE64.decode(payload)?;
    Ok(DecodedImage {
        bytes,
        mime: mime.to_string(),
    })
}
