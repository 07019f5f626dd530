//! Conversion between raw bodies and values, driven by request headers.
//!
//! Decoding picks a codec from the request `Content-Type`, encoding from the
//! ranked `Accept` candidates. Nothing here writes a response; callers decide
//! what a [`NegotiationError`] turns into.

use http::header::{ACCEPT, CONTENT_TYPE};
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::NegotiationError;
use super::media_type::{parse_media_type, ranked_accept, MediaTypeCandidate};
use super::registry::CodecRegistry;
use crate::config::DispatchConfig;

/// An encoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// The `Accept` candidate that selected the codec, possibly a wildcard
    pub media_type: String,
    /// Concrete media type to send as `Content-Type`
    pub content_type: String,
    /// Name of the codec that produced the bytes
    pub codec: &'static str,
    pub bytes: Vec<u8>,
}

/// Media type of the request body: first `Content-Type` value without
/// parameters, or `default` when the header is absent.
///
/// # Errors
///
/// [`NegotiationError::UnsupportedMediaType`] when the header is not a valid
/// media type.
pub fn resolve_content_type(
    headers: &HeaderMap,
    default: &str,
) -> Result<String, NegotiationError> {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return Ok(default.to_string());
    };
    let unsupported = || NegotiationError::UnsupportedMediaType {
        content_type: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    };
    let text = value.to_str().map_err(|_| unsupported())?;
    parse_media_type(text)
        .map(|(media_type, _)| media_type)
        .map_err(|_| unsupported())
}

/// Ranked `Accept` candidates of a request; `config.default_accept` stands in
/// for an absent header.
///
/// Values that are not visible ASCII are skipped, so a header made only of
/// such values yields no candidates.
pub fn resolve_accept(headers: &HeaderMap, config: &DispatchConfig) -> Vec<MediaTypeCandidate> {
    if !headers.contains_key(ACCEPT) {
        return ranked_accept([config.default_accept.as_str()], config.quality_parsing);
    }
    let values = headers.get_all(ACCEPT).iter().filter_map(|v| v.to_str().ok());
    ranked_accept(values, config.quality_parsing)
}

/// Decode `body` with the codec selected by the request `Content-Type`.
///
/// # Errors
///
/// [`NegotiationError::UnsupportedMediaType`] when no codec consumes the
/// content type, [`NegotiationError::Codec`] when the codec rejects the body.
pub fn decode_body(
    registry: &CodecRegistry,
    config: &DispatchConfig,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Value, NegotiationError> {
    let content_type = resolve_content_type(headers, &config.default_content_type)?;
    let codec = registry.select_for_decode(&content_type).inspect_err(|e| {
        warn!(content_type = %content_type, error = %e, "No codec for request body");
    })?;
    debug!(codec = codec.name(), content_type = %content_type, "Decoding request body");
    Ok(codec.decode(body)?)
}

/// [`decode_body`] followed by conversion into `T`.
///
/// # Errors
///
/// As [`decode_body`], plus [`NegotiationError::Payload`] when the decoded
/// value does not fit `T`.
pub fn decode_body_as<T: DeserializeOwned>(
    registry: &CodecRegistry,
    config: &DispatchConfig,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<T, NegotiationError> {
    let value = decode_body(registry, config, headers, body)?;
    serde_json::from_value(value).map_err(NegotiationError::Payload)
}

/// Encode `value` with the codec selected by the request `Accept` header.
///
/// # Errors
///
/// [`NegotiationError::NotAcceptable`] when no codec produces any acceptable
/// media type, [`NegotiationError::Codec`] when the codec fails.
pub fn encode_body(
    registry: &CodecRegistry,
    config: &DispatchConfig,
    headers: &HeaderMap,
    value: &Value,
) -> Result<Encoded, NegotiationError> {
    let candidates = resolve_accept(headers, config);
    let (codec, matched) = registry.select_for_encode(&candidates).inspect_err(|e| {
        warn!(error = %e, "No codec for response body");
    })?;
    debug!(codec = codec.name(), media_type = matched, "Encoding response body");
    let bytes = codec.encode(value)?;
    Ok(Encoded {
        media_type: matched.to_string(),
        content_type: codec.content_type_for(matched),
        codec: codec.name(),
        bytes,
    })
}

/// Convert `value` into a [`Value`] and [`encode_body`] it.
///
/// # Errors
///
/// As [`encode_body`], plus [`NegotiationError::Serialize`] when `value`
/// cannot be represented as JSON.
pub fn encode_body_from<T: Serialize + ?Sized>(
    registry: &CodecRegistry,
    config: &DispatchConfig,
    headers: &HeaderMap,
    value: &T,
) -> Result<Encoded, NegotiationError> {
    let value = serde_json::to_value(value).map_err(NegotiationError::Serialize)?;
    encode_body(registry, config, headers, &value)
}
