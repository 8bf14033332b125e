use crate::codec::{self, CodecError};
use prost_reflect::{DynamicMessage, ReflectMessage, Value};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Error summary nested inside a failed response envelope.
///
/// Field names deserialize from both `PascalCase` envelopes and the `camelCase`
/// JSON mapping of `pobla.ResponseStatus`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseStatus {
    #[serde(default, alias = "errorCode")]
    pub error_code: Option<String>,
    #[serde(default, alias = "message")]
    pub message: Option<String>,
    #[serde(default, alias = "stackTrace")]
    pub stack_trace: Option<String>,
    #[serde(default, alias = "errors")]
    pub errors: Option<Vec<ResponseError>>,
}

/// A validation error bound to a single request field.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseError {
    #[serde(default, alias = "errorCode")]
    pub error_code: String,
    #[serde(default, alias = "fieldName")]
    pub field_name: String,
    #[serde(default, alias = "message")]
    pub message: String,
}

/// Capability of payloads that expose their [`ResponseStatus`] directly.
pub trait HasResponseStatus {
    fn response_status(&self) -> Option<&ResponseStatus>;
}

/// The deserialized body of a failed response.
pub trait ResponsePayload: Debug + Send + Sync {
    /// Serializes the payload to JSON text.
    fn to_text(&self) -> Result<String, CodecError>;

    /// Reads the top-level member called `name`, as JSON.
    ///
    /// Returns `None` when there is no such member or it holds no value.
    fn member(&self, name: &str) -> Option<serde_json::Value>;

    /// Returns the payload as a [`HasResponseStatus`] if it has that capability.
    fn as_has_response_status(&self) -> Option<&dyn HasResponseStatus> {
        None
    }
}

impl ResponsePayload for serde_json::Value {
    fn to_text(&self) -> Result<String, CodecError> {
        codec::to_text(self)
    }

    fn member(&self, name: &str) -> Option<serde_json::Value> {
        self.as_object()?
            .get(name)
            .filter(|value| !value.is_null())
            .cloned()
    }
}

impl ResponsePayload for DynamicMessage {
    fn to_text(&self) -> Result<String, CodecError> {
        codec::to_text(self)
    }

    /// Protobuf fields are `snake_case`, so `ResponseStatus` also finds `response_status`.
    fn member(&self, name: &str) -> Option<serde_json::Value> {
        let field = self
            .descriptor()
            .fields()
            .find(|field| member_name_matches(field.name(), name))?;

        if !self.has_field(&field) {
            return None;
        }

        match self.get_field(&field).as_ref() {
            Value::Message(message) => serde_json::to_value(message).ok(),
            _ => None,
        }
    }
}

fn member_name_matches(field_name: &str, name: &str) -> bool {
    field_name == name || field_name.replace('_', "").eq_ignore_ascii_case(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_reads_pascal_and_camel_case() {
        let pascal: ResponseStatus = serde_json::from_value(json!({
            "ErrorCode": "VAL01",
            "Errors": [{ "FieldName": "Email" }]
        }))
        .unwrap();

        let camel: ResponseStatus = serde_json::from_value(json!({
            "errorCode": "VAL01",
            "errors": [{ "fieldName": "Email" }]
        }))
        .unwrap();

        assert_eq!(pascal, camel);
        assert_eq!(pascal.error_code.as_deref(), Some("VAL01"));
        assert_eq!(pascal.errors.unwrap()[0].field_name, "Email");
    }

    #[test]
    fn test_json_member_lookup_is_exact() {
        let payload = json!({ "ResponseStatus": { "ErrorCode": "E" }, "Empty": null });

        assert!(payload.member("ResponseStatus").is_some());
        assert!(payload.member("responseStatus").is_none());
        assert!(payload.member("Empty").is_none());
        assert!(json!("text").member("ResponseStatus").is_none());
    }

    #[test]
    fn test_member_name_matching() {
        assert!(member_name_matches("ResponseStatus", "ResponseStatus"));
        assert!(member_name_matches("response_status", "ResponseStatus"));
        assert!(!member_name_matches("response_state", "ResponseStatus"));
    }
}
