use std::fmt;

use http::StatusCode;

use crate::codec::CodecError;

/// A header value that is not a valid media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    /// No media type given
    Empty,
    /// Not of the form `type/subtype`
    InvalidMediaType(String),
    /// A parameter is not of the form `name=value`
    InvalidParameter(String),
    /// The same parameter name appears twice
    DuplicateParameter(String),
}

impl fmt::Display for MediaTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaTypeError::Empty => write!(f, "no media type"),
            MediaTypeError::InvalidMediaType(value) => {
                write!(f, "invalid media type '{value}': expected type/subtype")
            }
            MediaTypeError::InvalidParameter(value) => {
                write!(f, "invalid media type parameter '{value}'")
            }
            MediaTypeError::DuplicateParameter(name) => {
                write!(f, "duplicate media type parameter '{name}'")
            }
        }
    }
}

impl std::error::Error for MediaTypeError {}

/// Failure to decode a request body or encode a response body.
///
/// Negotiation errors are returned to the handler code that asked for the
/// conversion; the dispatcher never turns them into responses by itself.
/// [`NegotiationError::status`] gives the conventional status code.
#[derive(Debug)]
pub enum NegotiationError {
    /// No registered codec consumes the request's `Content-Type`
    UnsupportedMediaType {
        /// The `Content-Type` value as received (or the default)
        content_type: String,
    },
    /// No registered codec produces any media type listed in `Accept`
    NotAcceptable {
        /// The ranked media types that were tried, comma-joined
        accept: String,
    },
    /// The selected codec failed
    Codec(CodecError),
    /// The decoded body does not fit the requested type
    Payload(serde_json::Error),
    /// The value to encode could not be turned into a JSON value
    Serialize(serde_json::Error),
}

impl NegotiationError {
    /// Status code a handler would usually answer with.
    ///
    /// 415 and 406 for negotiation misses, 400 for bodies that fail to decode,
    /// 500 for values that fail to encode.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            NegotiationError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            NegotiationError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            NegotiationError::Codec(CodecError::Decode { .. }) => StatusCode::BAD_REQUEST,
            NegotiationError::Codec(CodecError::Encode { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            NegotiationError::Payload(_) => StatusCode::BAD_REQUEST,
            NegotiationError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for NegotiationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegotiationError::UnsupportedMediaType { content_type } => write!(
                f,
                "unmarshalling failed, no codec for content type '{content_type}'"
            ),
            NegotiationError::NotAcceptable { accept } => write!(
                f,
                "no codec found for acceptable content types '{accept}'"
            ),
            NegotiationError::Codec(e) => write!(f, "{e}"),
            NegotiationError::Payload(e) => {
                write!(f, "body does not match the expected shape: {e}")
            }
            NegotiationError::Serialize(e) => write!(f, "value cannot be serialized: {e}"),
        }
    }
}

impl std::error::Error for NegotiationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NegotiationError::Codec(e) => Some(e),
            NegotiationError::Payload(e) | NegotiationError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for NegotiationError {
    fn from(e: CodecError) -> Self {
        NegotiationError::Codec(e)
    }
}
