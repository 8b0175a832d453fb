use bytes::Bytes;
use serde_json::Value;
use slotlink_core::{Error, Result};

/// Converts application values to and from byte strings.
///
/// The engine treats the serializer as opaque. The one hard requirement is
/// determinism strong enough that byte-level XOR is meaningful:
/// `deserialize(serialize(v)) == v` and equal values serialize to equal
/// bytes.
pub trait Serializer {
    /// Serialize a value to its byte form.
    ///
    /// # Errors
    /// Returns `Error::Serialization` if the value cannot be represented.
    fn serialize(&self, value: &Value) -> Result<Bytes>;

    /// Deserialize a previously serialized byte string.
    ///
    /// # Errors
    /// Returns `Error::Deserialization` on any malformed input. By the
    /// time this is called the checksum has already passed, so a failure
    /// here is an application-level defect, not line noise.
    fn deserialize(&self, bytes: &[u8]) -> Result<Value>;
}

/// JSON serializer used by default.
///
/// `serde_json` maps are ordered (`BTreeMap`-backed), so equal values
/// produce identical bytes and the checksum contract holds.
///
/// # Examples
///
/// ```
/// use slotlink_protocol::{JsonSerializer, Serializer};
/// use serde_json::json;
///
/// let serializer = JsonSerializer;
/// let value = json!({"abc": {"def": {"v": 123}}});
/// let bytes = serializer.serialize(&value).unwrap();
/// assert_eq!(serializer.deserialize(&bytes).unwrap(), value);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<Bytes> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes).map_err(|e| Error::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_round_trip() {
        let serializer = JsonSerializer;
        let value = Value::String("1234567890".to_string());
        let bytes = serializer.serialize(&value).unwrap();
        assert_eq!(serializer.deserialize(&bytes).unwrap(), value);
    }

    #[test]
    fn test_nested_value_round_trip() {
        let serializer = JsonSerializer;
        let value = json!({"foo": "bar", "nested": {"list": [1, 2, 3], "flag": true}});
        let bytes = serializer.serialize(&value).unwrap();
        assert_eq!(serializer.deserialize(&bytes).unwrap(), value);
    }

    #[test]
    fn test_equal_values_serialize_identically() {
        let serializer = JsonSerializer;
        let a = json!({"z": 1, "a": 2});
        let b = json!({"a": 2, "z": 1});
        assert_eq!(a, b);
        assert_eq!(
            serializer.serialize(&a).unwrap(),
            serializer.serialize(&b).unwrap()
        );
    }

    #[test]
    fn test_deserialize_garbage_fails() {
        let serializer = JsonSerializer;
        assert!(serializer.deserialize(b"{not json").is_err());
    }
}
