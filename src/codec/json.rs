use serde_json::Value;

use super::{Codec, CodecError};

const JSON_MEDIA_TYPES: &[&str] = &["*/*", "application/*", "application/json"];

/// JSON codec backed by `serde_json`.
///
/// Also answers the `*/*` and `application/*` wildcards, which makes it the
/// fallback for clients that accept anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn consumes(&self) -> &[&'static str] {
        JSON_MEDIA_TYPES
    }

    fn produces(&self) -> &[&'static str] {
        JSON_MEDIA_TYPES
    }

    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        serde_json::from_slice(body).map_err(|e| CodecError::decode(self.name(), e.to_string()))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::encode(self.name(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip() {
        let value = json!({"firstName": "Mario", "secondName": "Micelli", "tags": [1, 2]});
        let bytes = JsonCodec.encode(&value).unwrap();
        assert_eq!(JsonCodec.decode(&bytes).unwrap(), value);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(JsonCodec.encode(&json!([])).unwrap(), b"[]");
    }

    #[test]
    fn test_invalid_body() {
        let err = JsonCodec.decode(b"{not json").unwrap_err();
        assert!(matches!(err, CodecError::Decode { codec: "json", .. }));
    }

    #[test]
    fn test_wildcard_content_type_resolves_to_json() {
        assert_eq!(JsonCodec.content_type_for("*/*"), "application/json");
        assert_eq!(JsonCodec.content_type_for("application/*"), "application/json");
        assert_eq!(JsonCodec.content_type_for("application/json"), "application/json");
    }
}
