//! XML codec built on `quick-xml` events.
//!
//! Mapping between documents and [`Value`]s:
//!
//! | XML                                   | Value                         |
//! |---------------------------------------|-------------------------------|
//! | root element                          | dropped on decode, [`XmlCodec::root`] on encode |
//! | child elements                        | object members                |
//! | repeated sibling elements             | array                         |
//! | text-only element                     | string, whitespace kept       |
//! | text between child elements           | ignored                       |
//! | empty element (`<a/>`, `<a></a>`)     | empty string                  |
//! | attributes, comments, PIs, declaration | ignored                      |
//!
//! On encode numbers and booleans are written as text, `null` as an empty
//! element and arrays as repeated elements. Objects whose leaves are strings
//! round-trip exactly, with two limits:
//!
//! - a top-level array is written as `<item>` children of the root, so it
//!   decodes as `{"item": [...]}`;
//! - an array member with a single element is a single element in the
//!   document, so it decodes as that element's value, not as an array.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

use super::{Codec, CodecError};

const XML_MEDIA_TYPES: &[&str] = &["application/xml"];
const DEFAULT_ROOT: &str = "root";
/// Element name used for items of a top-level array
const ARRAY_ITEM: &str = "item";

/// XML codec.
#[derive(Debug, Clone)]
pub struct XmlCodec {
    root: String,
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlCodec {
    /// XML codec writing `<root>` as document element.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(DEFAULT_ROOT)
    }

    /// XML codec writing `root` as document element.
    #[must_use]
    pub fn with_root(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    /// Name of the document element written on encode.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    fn write_value(
        &self,
        writer: &mut Writer<Vec<u8>>,
        name: &str,
        value: &Value,
    ) -> Result<(), CodecError> {
        if !is_xml_name(name) {
            return Err(CodecError::encode(
                self.name(),
                format!("'{name}' is not a valid element name"),
            ));
        }

        match value {
            Value::Array(items) => {
                for item in items {
                    self.write_value(writer, name, item)?;
                }
                Ok(())
            }
            Value::Null => self.write_event(writer, Event::Empty(BytesStart::new(name))),
            Value::Object(members) => {
                self.write_event(writer, Event::Start(BytesStart::new(name)))?;
                for (key, member) in members {
                    self.write_value(writer, key, member)?;
                }
                self.write_event(writer, Event::End(BytesEnd::new(name)))
            }
            scalar => {
                let text = match scalar {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                self.write_event(writer, Event::Start(BytesStart::new(name)))?;
                self.write_event(writer, Event::Text(BytesText::new(&text)))?;
                self.write_event(writer, Event::End(BytesEnd::new(name)))
            }
        }
    }

    fn write_event(
        &self,
        writer: &mut Writer<Vec<u8>>,
        event: Event<'_>,
    ) -> Result<(), CodecError> {
        writer
            .write_event(event)
            .map_err(|e| CodecError::encode(self.name(), e.to_string()))
    }
}

/// An element whose end tag has not been read yet.
struct OpenElement {
    name: String,
    members: Map<String, Value>,
    text: String,
}

impl OpenElement {
    fn new(name: String) -> Self {
        Self {
            name,
            members: Map::new(),
            text: String::new(),
        }
    }

    /// Text mixed with child elements (indentation included) is dropped.
    fn close(self) -> (String, Value) {
        let value = if self.members.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.members)
        };
        (self.name, value)
    }

    fn add_member(&mut self, name: String, value: Value) {
        match self.members.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.members.insert(name, value);
            }
        }
    }
}

impl Codec for XmlCodec {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn consumes(&self) -> &[&'static str] {
        XML_MEDIA_TYPES
    }

    fn produces(&self) -> &[&'static str] {
        XML_MEDIA_TYPES
    }

    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        let mut reader = Reader::from_reader(body);

        let mut buf = Vec::new();
        let mut open: Vec<OpenElement> = Vec::new();
        let mut document: Option<Value> = None;

        loop {
            let closed = match reader.read_event_into(&mut buf) {
                Ok(Event::Start(start)) => {
                    open.push(OpenElement::new(element_name(self.name(), &start)?));
                    None
                }
                Ok(Event::Empty(start)) => Some((
                    element_name(self.name(), &start)?,
                    Value::String(String::new()),
                )),
                Ok(Event::End(_)) => open.pop().map(OpenElement::close),
                Ok(Event::Text(text)) => {
                    if let Some(current) = open.last_mut() {
                        let text = text
                            .unescape()
                            .map_err(|e| CodecError::decode(self.name(), e.to_string()))?;
                        current.text.push_str(&text);
                    }
                    None
                }
                Ok(Event::CData(data)) => {
                    if let Some(current) = open.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data));
                    }
                    None
                }
                Ok(Event::Eof) => break,
                Ok(_) => None,
                Err(e) => {
                    return Err(CodecError::decode(
                        self.name(),
                        format!("{e} at position {}", reader.buffer_position()),
                    ))
                }
            };

            if let Some((name, value)) = closed {
                match open.last_mut() {
                    Some(parent) => parent.add_member(name, value),
                    None if document.is_some() => {
                        return Err(CodecError::decode(
                            self.name(),
                            "document has more than one root element",
                        ))
                    }
                    None => document = Some(value),
                }
            }
            buf.clear();
        }

        if let Some(unclosed) = open.last() {
            return Err(CodecError::decode(
                self.name(),
                format!("element <{}> is not closed", unclosed.name),
            ));
        }
        document.ok_or_else(|| CodecError::decode(self.name(), "document has no root element"))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let mut writer = Writer::new(Vec::new());
        match value {
            Value::Array(items) => {
                let root = Value::Object(Map::from_iter([(
                    ARRAY_ITEM.to_string(),
                    Value::Array(items.clone()),
                )]));
                self.write_value(&mut writer, &self.root, &root)?;
            }
            other => self.write_value(&mut writer, &self.root, other)?,
        }
        Ok(writer.into_inner())
    }
}

fn element_name(codec: &'static str, start: &BytesStart<'_>) -> Result<String, CodecError> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|e| CodecError::decode(codec, e.to_string()))
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PERSON_XML: &str =
        "<Person><FirstName>Mario</FirstName><SecondName>Micelli</SecondName></Person>";

    fn person() -> Value {
        json!({"FirstName": "Mario", "SecondName": "Micelli"})
    }

    #[test]
    fn test_encode_person() {
        let codec = XmlCodec::with_root("Person");
        let bytes = codec.encode(&person()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), PERSON_XML);
    }

    #[test]
    fn test_decode_person() {
        let codec = XmlCodec::new();
        assert_eq!(codec.decode(PERSON_XML.as_bytes()).unwrap(), person());
    }

    #[test]
    fn test_round_trip_nested() {
        let codec = XmlCodec::with_root("Order");
        let value = json!({
            "id": "42",
            "customer": {"name": "Ann & Bob", "city": "<Rome>"},
            "lines": [{"sku": "a"}, {"sku": "b"}],
            "note": ""
        });
        let bytes = codec.encode(&value).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), value);
    }

    #[test]
    fn test_scalars_become_text() {
        let codec = XmlCodec::with_root("r");
        let bytes = codec
            .encode(&json!({"n": 3, "b": true, "z": null}))
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "<r><b>true</b><n>3</n><z/></r>"
        );
    }

    #[test]
    fn test_top_level_array() {
        let codec = XmlCodec::with_root("list");
        let bytes = codec.encode(&json!(["a", "b"])).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "<list><item>a</item><item>b</item></list>"
        );
    }

    #[test]
    fn test_top_level_array_decodes_under_item() {
        let codec = XmlCodec::with_root("list");
        let bytes = codec.encode(&json!(["a", "b"])).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), json!({"item": ["a", "b"]}));

        let bytes = codec.encode(&json!([{"sku": "a"}])).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), json!({"item": {"sku": "a"}}));
    }

    #[test]
    fn test_leaf_whitespace_round_trips() {
        let codec = XmlCodec::with_root("Person");
        let value = json!({"name": "  Mario  ", "city": "Rome", "blank": "   "});
        let bytes = codec.encode(&value).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), value);
    }

    #[test]
    fn test_indentation_between_elements_is_ignored() {
        let doc = concat!(
            "<?xml version=\"1.0\"?>\n",
            "<p>\n",
            "  <name> Mario </name>\n",
            "  <tags>\n    <t>a</t>\n  </tags>\n",
            "</p>\n",
        );
        assert_eq!(
            XmlCodec::new().decode(doc.as_bytes()).unwrap(),
            json!({"name": " Mario ", "tags": {"t": "a"}})
        );
    }

    #[test]
    fn test_declaration_and_attributes_are_ignored() {
        let doc = r#"<?xml version="1.0"?><!-- c --><p id="1"><name lang="it">Mario</name></p>"#;
        assert_eq!(
            XmlCodec::new().decode(doc.as_bytes()).unwrap(),
            json!({"name": "Mario"})
        );
    }

    #[test]
    fn test_cdata_is_text() {
        let doc = "<p><code><![CDATA[a < b]]></code></p>";
        assert_eq!(
            XmlCodec::new().decode(doc.as_bytes()).unwrap(),
            json!({"code": "a < b"})
        );
    }

    #[test]
    fn test_malformed_documents() {
        let codec = XmlCodec::new();
        assert!(codec.decode(b"<a><b></a>").is_err());
        assert!(codec.decode(b"<a>").is_err());
        assert!(codec.decode(b"").is_err());
        assert!(codec.decode(b"<a/><b/>").is_err());
    }

    #[test]
    fn test_invalid_element_name() {
        let err = XmlCodec::new().encode(&json!({"1st": "x"})).unwrap_err();
        assert!(matches!(err, CodecError::Encode { codec: "xml", .. }));
    }
}
