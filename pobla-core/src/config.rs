//! # Envelope Configuration
//!
//! Names of the keys read from a failed response envelope. The defaults follow the
//! `ResponseStatus` convention; services using another vocabulary can load their own keys
//! from JSON.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvelopeKeys {
    /// Key of the status object inside the envelope.
    pub response_status: String,
    pub error_code: String,
    pub message: String,
    pub stack_trace: String,
}

impl Default for EnvelopeKeys {
    fn default() -> Self {
        Self {
            response_status: "ResponseStatus".to_string(),
            error_code: "ErrorCode".to_string(),
            message: "Message".to_string(),
            stack_trace: "StackTrace".to_string(),
        }
    }
}

impl EnvelopeKeys {
    /// Loads keys from a JSON object. Missing keys keep their default name.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
        serde_json::from_value(serde_json::Value::Object(object))
    }
}
