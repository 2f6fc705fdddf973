use alloc::vec::Vec;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use super::Transform;

/// Bytes as a standard base64 string.
///
/// ```
/// use mapkit_model::transform::{DataTransform, Transform};
/// use serde_json::json;
///
/// let bytes = DataTransform.from_document(&json!("aGk=")).unwrap();
/// assert_eq!(bytes, b"hi");
/// assert_eq!(DataTransform.to_document(&bytes), Some(json!("aGk=")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTransform;

impl Transform for DataTransform {
    type Object = Vec<u8>;

    fn from_document(&self, value: &Value) -> Option<Vec<u8>> {
        STANDARD.decode(value.as_str()?).ok()
    }

    fn to_document(&self, bytes: &Vec<u8>) -> Option<Value> {
        Some(Value::String(STANDARD.encode(bytes)))
    }
}

// -----------------------------------------------------------------------------
// Tests
