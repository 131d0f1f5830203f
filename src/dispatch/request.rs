//! Dispatcher request representation
//!
//! A [`Request`] is the bag of named parameters the dispatcher extracts from
//! a matched syntax template or endpoint. A parameter arrives either as raw
//! text (captured from a template segment) or as an already-structured JSON
//! value (supplied by a caller that parsed its own input).
//!
//! Document-like parameters are surfaced as a [`DocumentParam`], a tagged
//! union of raw-text-pending-parse and already-structured, resolved into a
//! BSON document by one explicit coercion step before any driver call.

use std::collections::HashMap;

use mongodb::bson::Document;
use serde_json::Value;

use crate::error::{RequestError, Result};

/// A single named parameter as stored in a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Raw text captured from a matched syntax segment.
    Text(String),

    /// Structured value supplied by a caller that already parsed its input.
    Structured(Value),
}

impl From<&str> for ParamValue {
    fn from(text: &str) -> Self {
        ParamValue::Text(text.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(text: String) -> Self {
        ParamValue::Text(text)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue::Structured(value)
    }
}

/// Named parameters for one command invocation.
///
/// The dispatcher builds one of these per matched request; command handlers
/// only ever read from it.
#[derive(Debug, Clone, Default)]
pub struct Request {
    params: HashMap<String, ParamValue>,
}

impl Request {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder-style
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a parameter
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(name.into(), value.into());
    }

    /// Get a raw parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Read a required text parameter
    ///
    /// # Arguments
    /// * `name` - Parameter name
    ///
    /// # Returns
    /// * `Result<String>` - Parameter text or a decoding error
    pub fn text(&self, name: &str) -> Result<String> {
        match self.params.get(name) {
            Some(ParamValue::Text(text)) => Ok(text.clone()),
            Some(ParamValue::Structured(Value::String(text))) => Ok(text.clone()),
            Some(_) => Err(RequestError::NotText(name.to_string()).into()),
            None => Err(RequestError::Missing(name.to_string()).into()),
        }
    }

    /// Read an optional text parameter
    ///
    /// # Returns
    /// * `Option<String>` - Parameter text, or `None` when absent or not text
    pub fn text_opt(&self, name: &str) -> Option<String> {
        match self.params.get(name) {
            Some(ParamValue::Text(text)) => Some(text.clone()),
            Some(ParamValue::Structured(Value::String(text))) => Some(text.clone()),
            _ => None,
        }
    }

    /// Read a required document-like parameter
    ///
    /// The returned [`DocumentParam`] still carries the raw-vs-structured
    /// distinction; call [`DocumentParam::resolve`] to coerce it.
    pub fn document(&self, name: &str) -> Result<DocumentParam> {
        match self.params.get(name) {
            Some(ParamValue::Text(text)) => Ok(DocumentParam::Raw(text.clone())),
            Some(ParamValue::Structured(value)) => Ok(DocumentParam::Parsed(value.clone())),
            None => Err(RequestError::Missing(name.to_string()).into()),
        }
    }
}

/// A document-like parameter at the coercion boundary.
///
/// The same command can be invoked from a structured caller (mapping already
/// parsed) or from a syntax-matched caller (raw string capture); this union
/// makes the two states explicit instead of sniffing runtime types.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentParam {
    /// Raw text pending a JSON parse.
    Raw(String),

    /// Already structured by the caller.
    Parsed(Value),
}

impl DocumentParam {
    /// Resolve into a BSON document ready for the driver.
    ///
    /// Raw text is parsed as JSON first; a parse failure is a fatal input
    /// error. Either way the value must be a JSON object.
    ///
    /// # Arguments
    /// * `name` - Parameter name, for error reporting
    ///
    /// # Returns
    /// * `Result<Document>` - Coerced document or a decoding error
    pub fn resolve(self, name: &str) -> Result<Document> {
        let value = match self {
            DocumentParam::Raw(text) => {
                serde_json::from_str::<Value>(&text).map_err(|err| RequestError::Json {
                    name: name.to_string(),
                    message: err.to_string(),
                })?
            }
            DocumentParam::Parsed(value) => value,
        };

        match value {
            Value::Object(map) => bson::to_document(&map).map_err(|err| {
                RequestError::Json {
                    name: name.to_string(),
                    message: err.to_string(),
                }
                .into()
            }),
            other => Err(RequestError::NotDocument {
                name: name.to_string(),
                found: json_type_name(&other),
            }
            .into()),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectorError;
    use serde_json::json;

    #[test]
    fn test_text_extraction() {
        let request = Request::new()
            .with_param("collectionName", "people")
            .with_param("field", json!("name"));

        assert_eq!(request.text("collectionName").unwrap(), "people");
        // A structured string still reads as text
        assert_eq!(request.text("field").unwrap(), "name");
    }

    #[test]
    fn test_missing_text_parameter() {
        let request = Request::new();
        let err = request.text("collectionName").unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Request(RequestError::Missing(name)) if name == "collectionName"
        ));
    }

    #[test]
    fn test_structured_non_string_is_not_text() {
        let request = Request::new().with_param("field", json!({"nested": true}));
        let err = request.text("field").unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Request(RequestError::NotText(_))
        ));
    }

    #[test]
    fn test_text_opt() {
        let request = Request::new().with_param("dbname", "test");
        assert_eq!(request.text_opt("dbname"), Some("test".to_string()));
        assert_eq!(request.text_opt("absent"), None);
    }

    #[test]
    fn test_document_param_raw_parses_json() {
        let request = Request::new().with_param("doc", r#"{"name": "Ann", "age": 32}"#);

        let doc = request.document("doc").unwrap().resolve("doc").unwrap();
        assert_eq!(doc.get_str("name").unwrap(), "Ann");
        assert!(doc.contains_key("age"));
    }

    #[test]
    fn test_document_param_structured_passes_through() {
        let request = Request::new().with_param("doc", json!({"name": "Ann"}));

        let doc = request.document("doc").unwrap().resolve("doc").unwrap();
        assert_eq!(doc.get_str("name").unwrap(), "Ann");
    }

    #[test]
    fn test_coercion_equivalence() {
        // The same logical document produces the same BSON whether it
        // arrives pre-parsed or as raw text.
        let raw = DocumentParam::Raw(r#"{"name": "Ann", "tags": ["a", "b"]}"#.to_string())
            .resolve("doc")
            .unwrap();
        let parsed = DocumentParam::Parsed(json!({"name": "Ann", "tags": ["a", "b"]}))
            .resolve("doc")
            .unwrap();
        assert_eq!(raw, parsed);
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let err = DocumentParam::Raw("{not json".to_string())
            .resolve("query")
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Request(RequestError::Json { name, .. }) if name == "query"
        ));
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        let err = DocumentParam::Raw("[1, 2, 3]".to_string())
            .resolve("doc")
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Request(RequestError::NotDocument { found: "array", .. })
        ));
    }
}
