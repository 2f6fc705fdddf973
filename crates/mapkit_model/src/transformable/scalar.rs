use alloc::string::{String, ToString};

use serde_json::{Number, Value};

use crate::Context;
use crate::info::TransformKind;
use crate::transformable::Transformable;

// -----------------------------------------------------------------------------
// Integers

// Integral numbers convert exactly, floats are truncated toward zero.
// Anything outside the target range yields `None`.
fn integer_from_number<T>(n: &Number) -> Option<T>
where
    T: TryFrom<i64> + TryFrom<u64> + TryFrom<i128>,
{
    if let Some(v) = n.as_i64() {
        <T as TryFrom<i64>>::try_from(v).ok()
    } else if let Some(v) = n.as_u64() {
        <T as TryFrom<u64>>::try_from(v).ok()
    } else {
        let f = n.as_f64().filter(|f| f.is_finite())?;
        // Saturates far outside the `i128` range, which every target rejects.
        <T as TryFrom<i128>>::try_from(f.trunc() as i128).ok()
    }
}

macro_rules! impl_integer {
    ($($ty:ty),+ $(,)?) => {
        crate::__impl_leaf_typed!(Scalar: $($ty),+);

        $(
            impl Transformable for $ty {
                const KIND: TransformKind = TransformKind::Scalar;

                fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
                    match value {
                        Value::Number(n) => integer_from_number(n),
                        Value::Bool(b) => Some(<$ty>::from(*b)),
                        Value::String(s) => s.parse().ok(),
                        _ => None,
                    }
                }

                #[inline]
                fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
                    Some(Value::from(*self))
                }
            }
        )+
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Floats

fn float_from_value(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    f.filter(|f| f.is_finite())
}

macro_rules! impl_float {
    ($($ty:ty),+ $(,)?) => {
        crate::__impl_leaf_typed!(Scalar: $($ty),+);

        $(
            impl Transformable for $ty {
                const KIND: TransformKind = TransformKind::Scalar;

                fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
                    // Narrowing saturates to infinity on overflow.
                    float_from_value(value)
                        .map(|f| f as $ty)
                        .filter(|f| f.is_finite())
                }

                // NaN and infinities have no JSON form.
                #[inline]
                fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
                    Number::from_f64(f64::from(*self)).map(Value::Number)
                }
            }
        )+
    };
}

impl_float!(f32, f64);

// -----------------------------------------------------------------------------
// bool

crate::__impl_leaf_typed!(Scalar: bool);

impl Transformable for bool {
    const KIND: TransformKind = TransformKind::Scalar;

    fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            Value::String(s) => {
                if s.eq_ignore_ascii_case("true") || s == "1" {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") || s == "0" {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    #[inline]
    fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
        Some(Value::Bool(*self))
    }
}

// -----------------------------------------------------------------------------
// String & char

crate::__impl_leaf_typed!(Scalar: String, char);

impl Transformable for String {
    const KIND: TransformKind = TransformKind::Scalar;

    fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => None,
            // Nested documents keep their JSON text.
            Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        }
    }

    #[inline]
    fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
        Some(Value::String(self.clone()))
    }
}

impl Transformable for char {
    const KIND: TransformKind = TransformKind::Scalar;

    fn transform_from(value: &Value, _: &mut Context<'_>) -> Option<Self> {
        let mut chars = value.as_str()?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    #[inline]
    fn plain_value(&self, _: &mut Context<'_>) -> Option<Value> {
        Some(Value::String(self.to_string()))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::transformable::Transformable;
    use crate::{Context, MappingConfig};

    fn from<T: Transformable>(value: Value) -> Option<T> {
        let config = MappingConfig::new();
        T::transform_from(&value, &mut Context::new(&config))
    }

    fn plain<T: Transformable>(value: T) -> Option<Value> {
        let config = MappingConfig::new();
        value.plain_value(&mut Context::new(&config))
    }

    #[test]
    fn integers() {
        assert_eq!(from::<i32>(json!(42)), Some(42));
        assert_eq!(from::<i32>(json!("42")), Some(42));
        assert_eq!(from::<i32>(json!("-7")), Some(-7));
        assert_eq!(from::<i32>(json!(true)), Some(1));
        assert_eq!(from::<u8>(json!(false)), Some(0));
        assert_eq!(from::<i64>(json!(3.9)), Some(3));
        assert_eq!(from::<i64>(json!(-3.9)), Some(-3));
        assert_eq!(from::<u64>(json!(u64::MAX)), Some(u64::MAX));

        assert_eq!(from::<u8>(json!(256)), None);
        assert_eq!(from::<u8>(json!(-1)), None);
        assert_eq!(from::<i8>(json!("300")), None);
        assert_eq!(from::<i32>(json!("4.2")), None);
        assert_eq!(from::<i32>(json!(" 42")), None);
        assert_eq!(from::<i32>(json!(null)), None);
        assert_eq!(from::<i32>(json!([1])), None);
        assert_eq!(from::<i32>(json!(1e20)), None);

        assert_eq!(plain(-5_i16), Some(json!(-5)));
        assert_eq!(plain(7_usize), Some(json!(7)));
    }

    #[test]
    fn floats() {
        assert_eq!(from::<f64>(json!(1.5)), Some(1.5));
        assert_eq!(from::<f64>(json!(2)), Some(2.0));
        assert_eq!(from::<f64>(json!("2.25")), Some(2.25));
        assert_eq!(from::<f32>(json!(0.5)), Some(0.5));
        assert_eq!(from::<f64>(json!("x")), None);

        assert_eq!(from::<f32>(json!("1e300")), None);
        assert_eq!(from::<f32>(json!(1e300)), None);
        assert_eq!(from::<f64>(json!("1e300")), Some(1e300));
        assert_eq!(from::<f64>(json!("1e400")), None);
        assert_eq!(from::<f64>(json!("NaN")), None);
        assert_eq!(from::<f32>(json!("-inf")), None);

        assert_eq!(plain(0.25_f64), Some(json!(0.25)));
        assert_eq!(plain(f64::NAN), None);
        assert_eq!(plain(f32::INFINITY), None);
    }

    #[test]
    fn booleans() {
        assert_eq!(from::<bool>(json!(true)), Some(true));
        assert_eq!(from::<bool>(json!(0)), Some(false));
        assert_eq!(from::<bool>(json!(2)), Some(true));
        assert_eq!(from::<bool>(json!("TRUE")), Some(true));
        assert_eq!(from::<bool>(json!("1")), Some(true));
        assert_eq!(from::<bool>(json!("False")), Some(false));
        assert_eq!(from::<bool>(json!("0")), Some(false));
        assert_eq!(from::<bool>(json!("yes")), None);
        assert_eq!(from::<bool>(json!(null)), None);
    }

    #[test]
    fn strings() {
        assert_eq!(from::<String>(json!("a")), Some("a".into()));
        assert_eq!(from::<String>(json!(12)), Some("12".into()));
        assert_eq!(from::<String>(json!(1.5)), Some("1.5".into()));
        assert_eq!(from::<String>(json!(false)), Some("false".into()));
        assert_eq!(from::<String>(json!(null)), None);
        assert_eq!(from::<String>(json!([1, 2])), Some("[1,2]".into()));
        assert_eq!(from::<String>(json!({"k": 1})), Some(r#"{"k":1}"#.into()));

        assert_eq!(from::<char>(json!("x")), Some('x'));
        assert_eq!(from::<char>(json!("xy")), None);
        assert_eq!(from::<char>(json!("")), None);
        assert_eq!(plain('z'), Some(json!("z")));
    }
}
