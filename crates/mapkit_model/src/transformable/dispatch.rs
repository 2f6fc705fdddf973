//! Entry points of the conversion dispatch.
//!
//! The strategy of a type is fixed by its [`Transformable`] impl, so
//! dispatch is resolved statically for typed values and through
//! [`DynTransformable`] for record fields.

use serde_json::Value;

use crate::Context;
use crate::transformable::{DynTransformable, Transformable};

/// Convert `value` to `T`, `None` if it does not fit.
///
/// ```
/// use mapkit_model::transformable::dispatch;
/// use mapkit_model::{Context, MappingConfig};
/// use serde_json::json;
///
/// let config = MappingConfig::new();
/// let mut ctx = Context::new(&config);
///
/// let v: Option<Vec<u8>> = dispatch::decode(&json!(["1", 2, "x"]), &mut ctx);
/// assert_eq!(v, Some(vec![1, 2]));
/// ```
#[inline]
pub fn decode<T: Transformable>(value: &Value, ctx: &mut Context<'_>) -> Option<T> {
    T::transform_from(value, ctx)
}

/// Convert a type-erased value to a document value.
#[inline]
pub fn encode(value: &dyn DynTransformable, ctx: &mut Context<'_>) -> Option<Value> {
    value.plain_value_dyn(ctx)
}
