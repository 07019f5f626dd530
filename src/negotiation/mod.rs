//! # Negotiation Module
//!
//! Content negotiation for request and response bodies.
//!
//! - [`media_type`] parses media types and ranks `Accept` candidates by quality
//! - [`CodecRegistry`] selects a [`Codec`](crate::codec::Codec) for a media type
//! - [`convert`] ties both to request headers: decode by `Content-Type`,
//!   encode by `Accept`
//!
//! ```text
//! Accept: application/json;q=0.1, application/xml
//!         │
//!         ▼ parse_accept + rank_by_quality
//! [application/xml (1.0), application/json (0.1)]
//!         │
//!         ▼ CodecRegistry::select_for_encode
//! XmlCodec, "application/xml"
//! ```

pub mod convert;
mod error;
pub mod media_type;
mod registry;

pub use convert::{
    decode_body, decode_body_as, encode_body, encode_body_from, resolve_accept,
    resolve_content_type, Encoded,
};
pub use error::{MediaTypeError, NegotiationError};
pub use media_type::{
    parse_accept, parse_media_type, rank_by_quality, ranked_accept, MediaTypeCandidate,
    QualityParsing, DEFAULT_QUALITY,
};
pub use registry::CodecRegistry;
