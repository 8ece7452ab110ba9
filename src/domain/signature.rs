use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Signature is empty")]
    Empty,
    #[error("Signature must be an embedded image data URI")]
    NotImageDataUri,
    #[error("Signature payload is not valid base64")]
    InvalidBase64,
}

/// A decoded `data:image/<type>;base64,<payload>` signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureData {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Split a data URI into media type and payload without decoding.
fn split_data_uri(uri: &str) -> Result<(&str, &str), SignatureError> {
    let uri = uri.trim();
    if uri.is_empty() || uri == "data:," {
        return Err(SignatureError::Empty);
    }

    let rest = uri
        .strip_prefix("data:")
        .ok_or(SignatureError::NotImageDataUri)?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or(SignatureError::NotImageDataUri)?;
    let media_type = header
        .strip_suffix(";base64")
        .filter(|m| m.starts_with("image/") && m.len() > "image/".len())
        .ok_or(SignatureError::NotImageDataUri)?;

    if payload.is_empty() {
        return Err(SignatureError::Empty);
    }
    Ok((media_type, payload))
}

/// Shape check done at submission time.
pub fn validate_signature_uri(uri: &str) -> Result<(), SignatureError> {
    split_data_uri(uri).map(|_| ())
}

pub fn decode_signature_uri(uri: &str) -> Result<SignatureData, SignatureError> {
    let (media_type, payload) = split_data_uri(uri)?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| SignatureError::InvalidBase64)?;

    Ok(SignatureData {
        media_type: media_type.to_string(),
        bytes,
    })
}
