//! # Codec Module
//!
//! Pluggable body codecs. A codec declares the media types it can parse
//! (`consumes`) and produce (`produces`) and converts between raw body bytes
//! and a [`serde_json::Value`], which is the interchange representation used by
//! the negotiation layer. Typed helpers (`decode_body_as`, `encode_body_from`)
//! sit on top of it.
//!
//! Declared media types are compared as literal strings. A codec that wants to
//! answer `*/*` or `application/*` has to list those entries itself; the
//! [`CodecRegistry`](crate::negotiation::CodecRegistry) never expands
//! wildcards.
//!
//! Two codecs ship with the crate:
//!
//! - [`JsonCodec`] - `*/*`, `application/*`, `application/json`
//! - [`XmlCodec`] - `application/xml`

mod json;
mod xml;

use std::fmt;

use serde_json::Value;

pub use json::JsonCodec;
pub use xml::XmlCodec;

/// Decode/encode capability for a set of media types.
pub trait Codec: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Media types this codec can decode, compared literally
    fn consumes(&self) -> &[&'static str];

    /// Media types this codec can encode, compared literally
    fn produces(&self) -> &[&'static str];

    /// Parse a request body.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] when the body is not valid for this format.
    fn decode(&self, body: &[u8]) -> Result<Value, CodecError>;

    /// Serialize a response body.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] when the value cannot be represented.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Whether `media_type` is listed in [`Codec::consumes`].
    fn can_decode(&self, media_type: &str) -> bool {
        self.consumes().iter().any(|c| *c == media_type)
    }

    /// Whether `media_type` is listed in [`Codec::produces`].
    fn can_encode(&self, media_type: &str) -> bool {
        self.produces().iter().any(|p| *p == media_type)
    }

    /// Concrete media type to announce in `Content-Type` after a match on
    /// `matched`. Wildcard matches fall back to the first non-wildcard entry
    /// in [`Codec::produces`].
    fn content_type_for(&self, matched: &str) -> String {
        if !matched.contains('*') {
            return matched.to_string();
        }
        self.produces()
            .iter()
            .find(|p| !p.contains('*'))
            .map_or_else(|| matched.to_string(), |p| (*p).to_string())
    }
}

/// Codec-level failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The body could not be parsed
    Decode {
        /// Name of the failing codec
        codec: &'static str,
        /// Parser message
        message: String,
    },
    /// The value could not be serialized
    Encode {
        /// Name of the failing codec
        codec: &'static str,
        /// Serializer message
        message: String,
    },
}

impl CodecError {
    pub fn decode(codec: &'static str, message: impl Into<String>) -> Self {
        CodecError::Decode {
            codec,
            message: message.into(),
        }
    }

    pub fn encode(codec: &'static str, message: impl Into<String>) -> Self {
        CodecError::Encode {
            codec,
            message: message.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Decode { codec, message } => {
                write!(f, "{codec} codec failed to decode body: {message}")
            }
            CodecError::Encode { codec, message } => {
                write!(f, "{codec} codec failed to encode body: {message}")
            }
        }
    }
}

impl std::error::Error for CodecError {}
