use alloc::boxed::Box;

use serde_json::Value;

use crate::Context;
use crate::info::{GenericTypeInfoCell, OptionInfo, TransformKind, TypeInfo, Typed};
use crate::transformable::Transformable;

// -----------------------------------------------------------------------------
// Option

impl<T: Transformable> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionInfo::new::<Self, T>()))
    }
}

/// `null` converts to `Some(None)`, the empty wrapper. Any other value is
/// converted by `T`, and a failure there is a failure of the wrapper.
impl<T: Transformable> Transformable for Option<T> {
    const KIND: TransformKind = TransformKind::Optional;

    fn transform_from(value: &Value, ctx: &mut Context<'_>) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            _ => T::transform_from(value, ctx).map(Some),
        }
    }

    #[inline]
    fn plain_value(&self, ctx: &mut Context<'_>) -> Option<Value> {
        self.as_ref()?.plain_value(ctx)
    }
}

// -----------------------------------------------------------------------------
// Box

/// A box shares the info of its content.
impl<T: Transformable> Typed for Box<T> {
    #[inline]
    fn type_info() -> &'static TypeInfo {
        T::type_info()
    }
}

impl<T: Transformable> Transformable for Box<T> {
    const KIND: TransformKind = T::KIND;

    #[inline]
    fn transform_from(value: &Value, ctx: &mut Context<'_>) -> Option<Self> {
        T::transform_from(value, ctx).map(Box::new)
    }

    #[inline]
    fn plain_value(&self, ctx: &mut Context<'_>) -> Option<Value> {
        T::plain_value(self, ctx)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use serde_json::{Value, json};

    use crate::info::{TransformKind, Typed};
    use crate::transformable::Transformable;
    use crate::{Context, MappingConfig};

    fn from<T: Transformable>(value: Value) -> Option<T> {
        let config = MappingConfig::new();
        T::transform_from(&value, &mut Context::new(&config))
    }

    #[test]
    fn optional() {
        assert_eq!(from::<Option<i32>>(json!(null)), Some(None));
        assert_eq!(from::<Option<i32>>(json!("5")), Some(Some(5)));
        assert_eq!(from::<Option<i32>>(json!("five")), None);
        assert_eq!(from::<Option<Option<i32>>>(json!(null)), Some(None));

        let config = MappingConfig::new();
        let mut ctx = Context::new(&config);
        assert_eq!(None::<i32>.plain_value(&mut ctx), None);
        assert_eq!(Some(3).plain_value(&mut ctx), Some(json!(3)));
    }

    #[test]
    fn boxed_is_transparent() {
        assert_eq!(from::<Box<u16>>(json!(9)), Some(Box::new(9)));
        assert_eq!(<Box<u16>>::KIND, TransformKind::Scalar);
        assert!(<Box<u16>>::type_info().ty().is::<u16>());
    }
}
