use crate::{Error, Result};
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

/// Maximum nesting depth for values crossing the boundary.
pub const MAX_VALUE_DEPTH: usize = 64;

/// Maximum estimated serialized size for values crossing the boundary.
pub const MAX_VALUE_BYTES: usize = 32 * 1024 * 1024;

/// Validate that a value may cross the worker boundary.
///
/// JSON values cannot hold live sockets, streams, or executable references,
/// so the residual violations are structural: nesting past the depth limit
/// and payloads past the byte budget. Applied to every request's arguments
/// and every response's result.
pub fn check_value(value: &Value) -> Result<()> {
    let mut budget = MAX_VALUE_BYTES;
    walk(value, 0, &mut budget)
}

fn walk(value: &Value, depth: usize, budget: &mut usize) -> Result<()> {
    if depth > MAX_VALUE_DEPTH {
        return Err(Error::Boundary(format!(
            "nesting exceeds depth limit {}",
            MAX_VALUE_DEPTH
        )));
    }

    let cost = match value {
        Value::Null => 4,
        Value::Bool(_) => 5,
        Value::Number(_) => 24,
        Value::String(s) => s.len() + 2,
        Value::Array(_) | Value::Object(_) => 2,
    };

    if *budget < cost {
        return Err(Error::Boundary(format!(
            "value exceeds size limit {} bytes",
            MAX_VALUE_BYTES
        )));
    }
    *budget -= cost;

    match value {
        Value::Array(items) => {
            for item in items {
                walk(item, depth + 1, budget)?;
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                if *budget < key.len() {
                    return Err(Error::Boundary(format!(
                        "value exceeds size limit {} bytes",
                        MAX_VALUE_BYTES
                    )));
                }
                *budget -= key.len();
                walk(item, depth + 1, budget)?;
            }
        }
        _ => {}
    }

    Ok(())
}

/// Encode boundary-crossing bytes as base64.
pub fn encode_bytes_base64(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Decode base64 boundary payload to bytes.
pub fn decode_bytes_base64(value: &str) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(value)
        .map_err(|err| Error::Boundary(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested(depth: usize) -> Value {
        let mut value = json!(1);
        for _ in 0..depth {
            value = json!([value]);
        }
        value
    }

    #[test]
    fn test_flat_values_pass() {
        check_value(&json!({"a": 1, "b": "two", "c": [true, null]})).unwrap();
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let err = check_value(&nested(MAX_VALUE_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, Error::Boundary(_)));
    }

    #[test]
    fn test_nesting_at_limit_passes() {
        check_value(&nested(MAX_VALUE_DEPTH)).unwrap();
    }

    #[test]
    fn test_bytes_roundtrip() {
        let data = vec![0u8, 1, 2, 255];
        let encoded = encode_bytes_base64(&data);
        assert_eq!(decode_bytes_base64(&encoded).unwrap(), data);
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert!(decode_bytes_base64("not base64!").is_err());
    }
}
