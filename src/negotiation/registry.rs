use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::error::NegotiationError;
use super::media_type::MediaTypeCandidate;
use crate::codec::{Codec, JsonCodec, XmlCodec};

/// Ordered set of codecs consulted during content negotiation.
///
/// Codecs are registered at startup and never mutated afterwards; the
/// registry is shared with the dispatcher behind an `Arc`. Selection walks
/// codecs in registration order and tests literal membership in each codec's
/// declared media types.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: Vec<Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// Registry without any codec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with [`JsonCodec`] followed by [`XmlCodec`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonCodec));
        registry.register(Arc::new(XmlCodec::new()));
        registry
    }

    /// Append a codec. Earlier registrations win ties.
    pub fn register(&mut self, codec: Arc<dyn Codec>) {
        debug!(
            codec = codec.name(),
            consumes = ?codec.consumes(),
            produces = ?codec.produces(),
            "Registering codec"
        );
        self.codecs.push(codec);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Codec> {
        self.codecs.iter().map(AsRef::as_ref)
    }

    /// First codec whose consume list contains `media_type`.
    ///
    /// # Errors
    ///
    /// [`NegotiationError::UnsupportedMediaType`] when no codec consumes it.
    pub fn select_for_decode(&self, media_type: &str) -> Result<&dyn Codec, NegotiationError> {
        self.iter()
            .find(|codec| codec.can_decode(media_type))
            .ok_or_else(|| NegotiationError::UnsupportedMediaType {
                content_type: media_type.to_string(),
            })
    }

    /// Codec for the highest ranked candidate any codec produces, together
    /// with the candidate media type it matched.
    ///
    /// `candidates` must already be ranked; see
    /// [`rank_by_quality`](super::media_type::rank_by_quality).
    ///
    /// # Errors
    ///
    /// [`NegotiationError::NotAcceptable`] when no codec produces any candidate.
    pub fn select_for_encode<'c>(
        &self,
        candidates: &'c [MediaTypeCandidate],
    ) -> Result<(&dyn Codec, &'c str), NegotiationError> {
        candidates
            .iter()
            .find_map(|candidate| {
                self.iter()
                    .find(|codec| codec.can_encode(&candidate.media_type))
                    .map(|codec| (codec, candidate.media_type.as_str()))
            })
            .ok_or_else(|| NegotiationError::NotAcceptable {
                accept: candidates
                    .iter()
                    .map(|c| c.media_type.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            })
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.codecs.iter().map(|c| c.name()))
            .finish()
    }
}
