//! JSON request and response bodies exchanged with the hosting platform.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::DecodeError;

/// Standard alphabet with padding that, like Python's `b64decode`, ignores
/// non-zero trailing bits.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoreRequest {
    /// Base64 of the encoded image file.
    pub data: String,
}

impl ScoreRequest {
    /// Only a JSON object is a request; arrays are rejected even when their
    /// first element is a string.
    pub fn parse(raw: &str) -> Result<Self, DecodeError> {
        let fields: Map<String, Value> = serde_json::from_str(raw)?;
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Decodes `data`, ignoring the line breaks some encoders insert.
    pub fn image_bytes(&self) -> Result<Vec<u8>, DecodeError> {
        let compact: String = self
            .data
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        Ok(BASE64.decode(compact)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResponse {
    pub class_name: String,
}

impl ScoreResponse {
    pub fn to_json(&self) -> String {
        json!({ "class_name": self.class_name }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_decode() {
        let request = ScoreRequest::parse(r#"{"data": "aGVsbG8="}"#).unwrap();
        assert_eq!(request.image_bytes().unwrap(), b"hello");
    }

    #[test]
    fn wrapped_base64_is_accepted() {
        let request = ScoreRequest {
            data: "aGVs\r\nbG8g\nd29y bGQ=".to_owned(),
        };
        assert_eq!(request.image_bytes().unwrap(), b"hello world");
    }

    #[test]
    fn trailing_bits_are_tolerated() {
        let request = ScoreRequest::parse(r#"{"data": "aGVsbG9="}"#).unwrap();
        assert_eq!(request.image_bytes().unwrap(), b"hello");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let request = ScoreRequest::parse(r#"{"data": "", "filename": "rose.jpg"}"#).unwrap();
        assert!(request.data.is_empty());
    }

    #[test]
    fn schema_violations_are_decode_errors() {
        for raw in [
            "not json",
            "",
            r#"{"image": "aGVsbG8="}"#,
            r#"{"data": 42}"#,
            r#"{"data": null}"#,
            r#""aGVsbG8=""#,
            r#"["aGVsbG8="]"#,
            r#"[["data", "aGVsbG8="]]"#,
        ] {
            assert!(
                matches!(ScoreRequest::parse(raw), Err(DecodeError::Json(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_base64() {
        let request = ScoreRequest::parse(r#"{"data": "not-valid-base64!!"}"#).unwrap();
        assert!(matches!(request.image_bytes(), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn response_has_exactly_one_field() {
        let body = ScoreResponse {
            class_name: "rose \"red\"".to_owned(),
        }
        .to_json();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["class_name"], "rose \"red\"");
    }
}
