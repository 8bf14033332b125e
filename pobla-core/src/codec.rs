//! # JSON Text Codec
//!
//! The remote error envelope is read in two hops: the response payload is serialized to JSON
//! text, and that text is then read back as a **flat** map of strings. Nested objects are not
//! descended into; their JSON text becomes the value, ready to be read as a flat map again.
//!
//! 1. **Serialize (payload -> text)**: anything implementing `serde::Serialize`, including
//!    `prost_reflect::DynamicMessage` through its `serde` support.
//! 2. **Flatten (text -> [`FlatMap`])**: string values are kept verbatim, `null` values are
//!    dropped and every other value keeps its JSON text. Keys are compared ignoring case.
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Failed to serialize payload to JSON: '{0}'")]
    Serialize(#[source] serde_json::Error),

    #[error("Text is not a JSON object: '{0}'")]
    NotAnObject(#[source] serde_json::Error),
}

/// Serializes `value` to its JSON text form.
pub fn to_text<T>(value: &T) -> Result<String, CodecError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(CodecError::Serialize)
}

/// A string-keyed map of strings with case-insensitive key lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatMap {
    entries: HashMap<String, String>,
}

impl FlatMap {
    /// Parses a JSON object into a flat map.
    ///
    /// When two keys only differ by case, the first one in key order wins.
    ///
    /// # Returns
    ///
    /// * `Ok(FlatMap)` - The flattened object.
    /// * `Err(CodecError::NotAnObject)` - If the text is not a JSON object.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        let object: serde_json::Map<String, Value> =
            serde_json::from_str(text).map_err(CodecError::NotAnObject)?;

        let mut entries = HashMap::with_capacity(object.len());

        for (key, value) in object {
            let value = match value {
                Value::Null => continue,
                Value::String(text) => text,
                other => other.to_string(),
            };

            entries.entry(fold_key(&key)).or_insert(value);
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&fold_key(key)).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&fold_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_are_case_insensitive() {
        let map = FlatMap::parse(r#"{"ResponseStatus": "x"}"#).unwrap();

        assert_eq!(map.get("responsestatus"), Some("x"));
        assert_eq!(map.get("RESPONSESTATUS"), Some("x"));
        assert!(map.contains_key("ResponseStatus"));
    }

    #[test]
    fn test_nested_values_keep_their_json_text() {
        let text = to_text(&json!({
            "Nested": { "ErrorCode": "E1" },
            "Count": 3,
            "Flag": true,
            "Missing": null,
        }))
        .unwrap();

        let map = FlatMap::parse(&text).unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("count"), Some("3"));
        assert_eq!(map.get("flag"), Some("true"));
        assert_eq!(map.get("missing"), None);

        let nested = FlatMap::parse(map.get("nested").unwrap()).unwrap();
        assert_eq!(nested.get("errorCode"), Some("E1"));
    }

    #[test]
    fn test_non_object_text_is_rejected() {
        assert!(matches!(
            FlatMap::parse("[1, 2]"),
            Err(CodecError::NotAnObject(_))
        ));
        assert!(matches!(
            FlatMap::parse("plain text"),
            Err(CodecError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_case_collisions_collapse_into_one_entry() {
        let map = FlatMap::parse(r#"{"errorCode": "lower", "ErrorCode": "upper"}"#).unwrap();

        assert_eq!(map.len(), 1);
        assert!(map.get("ERRORCODE").is_some());
    }
}
