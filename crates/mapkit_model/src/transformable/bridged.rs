use alloc::string::String;

use serde_json::{Map, Number, Value};

use crate::Context;
use crate::info::TransformKind;
use crate::transformable::Transformable;

crate::__impl_leaf_typed!(Bridged: Value, Number, Map<String, Value>);

// -----------------------------------------------------------------------------
// Value

impl Transformable for Value {
    const KIND: TransformKind = TransformKind::Bridged;

    #[inline]
    fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
        Some(value.clone())
    }

    #[inline]
    fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
        Some(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Number

fn number_from_str(s: &str) -> Option<Number> {
    match s {
        "true" => Some(Number::from(1)),
        "false" => Some(Number::from(0)),
        _ => s
            .parse::<i64>()
            .map(Number::from)
            .or_else(|_| s.parse::<u64>().map(Number::from))
            .ok()
            .or_else(|| s.parse::<f64>().ok().and_then(Number::from_f64)),
    }
}

impl Transformable for Number {
    const KIND: TransformKind = TransformKind::Bridged;

    fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
        match value {
            Value::Number(n) => Some(n.clone()),
            Value::Bool(b) => Some(Number::from(u8::from(*b))),
            Value::String(s) => number_from_str(s),
            _ => None,
        }
    }

    #[inline]
    fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
        Some(Value::Number(self.clone()))
    }
}

// -----------------------------------------------------------------------------
// Map

impl Transformable for Map<String, Value> {
    const KIND: TransformKind = TransformKind::Bridged;

    #[inline]
    fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
        value.as_object().cloned()
    }

    #[inline]
    fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
        Some(Value::Object(self.clone()))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::{Map, Number, Value, json};

    use crate::transformable::Transformable;
    use crate::{Context, MappingConfig};

    fn from<T: Transformable>(value: Value) -> Option<T> {
        let config = MappingConfig::new();
        T::transform_from(&value, &mut Context::new(&config))
    }

    #[test]
    fn number_bridge() {
        assert_eq!(from::<Number>(json!(3)), Some(Number::from(3)));
        assert_eq!(from::<Number>(json!("true")), Some(Number::from(1)));
        assert_eq!(from::<Number>(json!("false")), Some(Number::from(0)));
        assert_eq!(from::<Number>(json!("12")), Some(Number::from(12)));
        assert_eq!(from::<Number>(json!("1.5")).and_then(|n| n.as_f64()), Some(1.5));
        assert_eq!(from::<Number>(json!(true)), Some(Number::from(1)));
        assert_eq!(from::<Number>(json!("abc")), None);
        assert_eq!(from::<Number>(json!(null)), None);
    }

    #[test]
    fn value_and_map_pass_through() {
        let doc = json!({ "a": [1, { "b": null }] });
        assert_eq!(from::<Value>(doc.clone()), Some(doc.clone()));
        assert_eq!(
            from::<Map<String, Value>>(doc.clone()),
            doc.as_object().cloned()
        );
        assert_eq!(from::<Map<String, Value>>(json!([1])), None);
        assert_eq!(from::<Value>(json!(null)), Some(Value::Null));
    }
}
