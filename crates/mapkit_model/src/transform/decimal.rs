use alloc::string::ToString;
use core::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Value;

use super::Transform;

/// Arbitrary precision decimals, encoded as strings so no digit is lost.
///
/// Numbers are read from their JSON text rather than through `f64`.
///
/// ```
/// use mapkit_model::transform::{DecimalTransform, Transform};
/// use serde_json::json;
///
/// let price = DecimalTransform.from_document(&json!(19.99)).unwrap();
/// assert_eq!(DecimalTransform.to_document(&price), Some(json!("19.99")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalTransform;

impl Transform for DecimalTransform {
    type Object = BigDecimal;

    fn from_document(&self, value: &Value) -> Option<BigDecimal> {
        match value {
            Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
            Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }

    fn to_document(&self, decimal: &BigDecimal) -> Option<Value> {
        Some(Value::String(decimal.to_string()))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DecimalTransform, Transform};

    #[test]
    fn strings_and_numbers() {
        let big = DecimalTransform
            .from_document(&json!("12345678901234567890.000001"))
            .unwrap();
        assert_eq!(
            DecimalTransform.to_document(&big),
            Some(json!("12345678901234567890.000001"))
        );

        let small = DecimalTransform.from_document(&json!(-3)).unwrap();
        assert_eq!(DecimalTransform.to_document(&small), Some(json!("-3")));

        assert!(DecimalTransform.from_document(&json!("1.2.3")).is_none());
        assert!(DecimalTransform.from_document(&json!(null)).is_none());
    }
}
