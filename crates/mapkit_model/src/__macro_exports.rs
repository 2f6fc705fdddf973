//! Items used by the code that `#[derive(Model)]` and `#[derive(RawEnum)]`
//! generate. Not part of the public API.

pub use core::any::Any;
pub use core::marker::PhantomData;

pub use alloc::string::String;

pub use serde_json::Value;

use crate::de::populate;
use crate::ser::extract;
use crate::transformable::kind_of;
use crate::{Context, Model};

/// Decode a nested record. Anything but a map yields `None`.
pub fn decode_model<M: Model>(value: &Value, ctx: &mut Context<'_>) -> Option<M> {
    let Some(map) = value.as_object() else {
        if !value.is_null() {
            log::warn!(
                "expected a map for `{}`, found {}{}",
                core::any::type_name::<M>(),
                kind_of(value),
                ctx.trail
            );
        }
        return None;
    };
    let mut record = M::default();
    populate(M::model_info(), &mut record, map, ctx);
    Some(record)
}

/// Encode a nested record as a map.
pub fn encode_model<M: Model>(record: &M, ctx: &mut Context<'_>) -> Option<Value> {
    Some(Value::Object(extract(M::model_info(), record, ctx)))
}
