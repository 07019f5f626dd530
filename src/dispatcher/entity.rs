use std::sync::Arc;

use http::header::{ALLOW, CONTENT_TYPE};
use http::request::Parts;
use http::{
    Extensions, HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode, Uri,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::DispatchConfig;
use crate::ids::RequestId;
use crate::negotiation::{self, CodecRegistry, Encoded, MediaTypeCandidate, NegotiationError};

/// Read-only view of the request handed to filters and handlers.
///
/// Besides the raw request it carries the codec registry and configuration
/// of the dispatcher that received it, so handler code can decode and encode
/// bodies without holding on to the dispatcher.
#[derive(Debug)]
pub struct RequestEntity {
    parts: Parts,
    body: Vec<u8>,
    request_id: RequestId,
    codecs: Arc<CodecRegistry>,
    config: Arc<DispatchConfig>,
}

impl RequestEntity {
    /// Wrap a request using the default codecs and configuration.
    ///
    /// The dispatcher builds entities itself; this is for exercising handlers
    /// and filters directly.
    #[must_use]
    pub fn new(request: Request<Vec<u8>>) -> Self {
        Self::with_context(
            request,
            Arc::new(CodecRegistry::with_defaults()),
            Arc::new(DispatchConfig::default()),
        )
    }

    pub(crate) fn with_context(
        request: Request<Vec<u8>>,
        codecs: Arc<CodecRegistry>,
        config: Arc<DispatchConfig>,
    ) -> Self {
        let (parts, body) = request.into_parts();
        let request_id = RequestId::from_headers(&parts.headers);
        Self {
            parts,
            body,
            request_id,
            codecs,
            config,
        }
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    #[inline]
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Request path without the query string
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// First value of header `name`, if it is visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Extensions set by the hosting server
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Id of this dispatch, taken from `x-request-id` when present
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Media type of the body as used for decoding.
    ///
    /// # Errors
    ///
    /// Fails when `Content-Type` is not a valid media type.
    pub fn content_type(&self) -> Result<String, NegotiationError> {
        negotiation::resolve_content_type(self.headers(), &self.config.default_content_type)
    }

    /// `Accept` candidates, best first.
    #[must_use]
    pub fn accept(&self) -> Vec<MediaTypeCandidate> {
        negotiation::resolve_accept(self.headers(), &self.config)
    }

    /// Decode the body according to `Content-Type`.
    ///
    /// # Errors
    ///
    /// See [`negotiation::decode_body`].
    pub fn decode_body(&self) -> Result<Value, NegotiationError> {
        negotiation::decode_body(&self.codecs, &self.config, self.headers(), &self.body)
    }

    /// Decode the body according to `Content-Type` into `T`.
    ///
    /// # Errors
    ///
    /// See [`negotiation::decode_body_as`].
    pub fn decode_body_as<T: DeserializeOwned>(&self) -> Result<T, NegotiationError> {
        negotiation::decode_body_as(&self.codecs, &self.config, self.headers(), &self.body)
    }

    /// Encode `value` according to `Accept`.
    ///
    /// # Errors
    ///
    /// See [`negotiation::encode_body`].
    pub fn encode_body(&self, value: &Value) -> Result<Encoded, NegotiationError> {
        negotiation::encode_body(&self.codecs, &self.config, self.headers(), value)
    }

    /// Encode `value` according to `Accept`.
    ///
    /// # Errors
    ///
    /// See [`negotiation::encode_body_from`].
    pub fn encode_body_from<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Encoded, NegotiationError> {
        negotiation::encode_body_from(&self.codecs, &self.config, self.headers(), value)
    }
}

/// Response accumulated by a handler, or returned by a filter that answers
/// the request itself.
///
/// A status left unset is sent as `200 OK`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseEntity {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseEntity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Response with `status` and an empty body.
    #[must_use]
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Plain text response.
    #[must_use]
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut response = Self::with_status(status);
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
        response.body = body.into().into_bytes();
        response
    }

    /// Status as set by the handler, `None` when untouched
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Builder form of [`ResponseEntity::set_header`].
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.set_header(name, value);
        self
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Builder form of [`ResponseEntity::set_body`].
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.set_body(body);
        self
    }

    /// Take the bytes of an [`Encoded`] body and announce its media type.
    pub fn set_negotiated_body(&mut self, encoded: Encoded) {
        match HeaderValue::from_str(&encoded.content_type) {
            Ok(value) => {
                self.headers.insert(CONTENT_TYPE, value);
            }
            Err(_) => {
                self.headers.remove(CONTENT_TYPE);
            }
        }
        self.body = encoded.bytes;
    }

    /// Convert into the wire response, with `200 OK` for an unset status.
    #[must_use]
    pub fn into_response(self) -> Response<Vec<u8>> {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }

    /// As [`ResponseEntity::into_response`], adding `Allow` when given.
    pub(crate) fn into_response_with_allow(self, allow: Option<&str>) -> Response<Vec<u8>> {
        let mut response = self.into_response();
        if let Some(value) = allow.and_then(|a| HeaderValue::from_str(a).ok()) {
            response.headers_mut().insert(ALLOW, value);
        }
        response
    }
}

/// Callback that answers a routed request by filling in the response.
///
/// Implemented for every `Fn(&RequestEntity, &mut ResponseEntity)` closure.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &RequestEntity, response: &mut ResponseEntity);
}

impl<F> Handler for F
where
    F: Fn(&RequestEntity, &mut ResponseEntity) + Send + Sync,
{
    fn handle(&self, request: &RequestEntity, response: &mut ResponseEntity) {
        self(request, response);
    }
}
